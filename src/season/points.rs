use super::rules::{season_rules, table_points, SeasonRules};

/// Points for positions 1-10 in a full-distance race. Identical across every
/// enumerated season.
pub const REGULAR_POINTS: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

pub fn regular_points(position: u8) -> u32 {
    table_points(&REGULAR_POINTS, position)
}

/// Base points for a finishing position, excluding any fastest-lap bonus.
pub fn points_for_position(position: u8, is_sprint: bool, year: u16) -> u32 {
    season_rules(year).points_for_position(position, is_sprint)
}

impl SeasonRules {
    pub fn points_for_position(&self, position: u8, is_sprint: bool) -> u32 {
        if is_sprint {
            self.sprint_points(position)
        } else {
            regular_points(position)
        }
    }
}
