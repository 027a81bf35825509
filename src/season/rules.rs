use serde::{Deserialize, Serialize};

/// First season with an enumerated ruleset.
pub const FIRST_KNOWN_SEASON: u16 = 2018;
/// Most recent enumerated ruleset; also used for any year outside the known range.
pub const LATEST_KNOWN_SEASON: u16 = 2026;

const LEGACY_SPRINT_POINTS: [u32; 3] = [3, 2, 1];
const MODERN_SPRINT_POINTS: [u32; 8] = [8, 7, 6, 5, 4, 3, 2, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintFormat {
    None,
    /// 2021 format: top three score 3-2-1.
    Legacy,
    /// 2022 onwards: top eight score 8 down to 1.
    Modern,
}

impl SprintFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No sprint races",
            Self::Legacy => "Sprint qualifying (top 3 score)",
            Self::Modern => "Sprint (top 8 score)",
        }
    }

    pub const fn points_table(self) -> &'static [u32] {
        match self {
            Self::None => &[],
            Self::Legacy => &LEGACY_SPRINT_POINTS,
            Self::Modern => &MODERN_SPRINT_POINTS,
        }
    }

    pub fn points_for(self, position: u8) -> u32 {
        table_points(self.points_table(), position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastestLapRule {
    pub bonus_points: u32,
    pub max_eligible_position: u8,
}

impl FastestLapRule {
    pub fn points_for(&self, position: u8) -> u32 {
        if (1..=self.max_eligible_position).contains(&position) {
            self.bonus_points
        } else {
            0
        }
    }
}

/// Scoring rules for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRules {
    /// The enumerated season these rules were taken from.
    pub ruleset_year: u16,
    pub sprint_format: SprintFormat,
    pub fastest_lap: Option<FastestLapRule>,
    /// Number of classified positions per race.
    pub grid_size: u8,
}

impl SeasonRules {
    pub fn sprint_points(&self, position: u8) -> u32 {
        self.sprint_format.points_for(position)
    }

    pub fn fastest_lap_points(&self, position: u8) -> u32 {
        self.fastest_lap
            .map(|rule| rule.points_for(position))
            .unwrap_or(0)
    }

    pub fn contains_position(&self, position: u8) -> bool {
        (1..=self.grid_size).contains(&position)
    }
}

const TOP_TEN_FASTEST_LAP: FastestLapRule = FastestLapRule {
    bonus_points: 1,
    max_eligible_position: 10,
};

/// Resolve the scoring rules for `year`. Never fails: years outside the known
/// range use the most recent ruleset.
pub fn season_rules(year: u16) -> SeasonRules {
    let ruleset_year = if (FIRST_KNOWN_SEASON..=LATEST_KNOWN_SEASON).contains(&year) {
        year
    } else {
        LATEST_KNOWN_SEASON
    };

    let (sprint_format, fastest_lap, grid_size) = match ruleset_year {
        2018 => (SprintFormat::None, None, 20),
        2019 | 2020 => (SprintFormat::None, Some(TOP_TEN_FASTEST_LAP), 20),
        2021 => (SprintFormat::Legacy, Some(TOP_TEN_FASTEST_LAP), 20),
        2022..=2024 => (SprintFormat::Modern, Some(TOP_TEN_FASTEST_LAP), 20),
        2025 => (SprintFormat::Modern, None, 20),
        _ => (SprintFormat::Modern, None, 22),
    };

    SeasonRules {
        ruleset_year,
        sprint_format,
        fastest_lap,
        grid_size,
    }
}

pub fn sprint_points(position: u8, year: u16) -> u32 {
    season_rules(year).sprint_points(position)
}

pub fn fastest_lap_points(position: u8, year: u16) -> u32 {
    season_rules(year).fastest_lap_points(position)
}

pub(crate) fn table_points(table: &[u32], position: u8) -> u32 {
    match position {
        0 => 0,
        p => table.get(usize::from(p) - 1).copied().unwrap_or(0),
    }
}
