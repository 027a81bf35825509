use crate::season::{DriverId, RaceId};
use serde::{Deserialize, Serialize};

/// A race/position address on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub race_id: RaceId,
    pub position: u8,
}

/// User intent against a season's grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridCommand {
    PlaceDriver {
        race_id: RaceId,
        position: u8,
        driver_id: DriverId,
    },
    MoveDriver {
        driver_id: DriverId,
        #[serde(default)]
        from: Option<SlotRef>,
        to: SlotRef,
    },
    ClearPosition {
        race_id: RaceId,
        position: u8,
    },
    FillRestOfSeason {
        driver_id: DriverId,
        position: u8,
        start_race_id: RaceId,
    },
    ResetGrid,
    ClearEverything,
    SetFastestLap {
        race_id: RaceId,
        #[serde(default)]
        driver_id: Option<DriverId>,
    },
    ShowOfficialResults {
        enabled: bool,
    },
}

impl GridCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlaceDriver { .. } => "place_driver",
            Self::MoveDriver { .. } => "move_driver",
            Self::ClearPosition { .. } => "clear_position",
            Self::FillRestOfSeason { .. } => "fill_rest_of_season",
            Self::ResetGrid => "reset_grid",
            Self::ClearEverything => "clear_everything",
            Self::SetFastestLap { .. } => "set_fastest_lap",
            Self::ShowOfficialResults { .. } => "show_official_results",
        }
    }

    /// Driver the command introduces onto the grid, if any.
    pub(crate) fn placed_driver(&self) -> Option<&DriverId> {
        match self {
            Self::PlaceDriver { driver_id, .. }
            | Self::MoveDriver { driver_id, .. }
            | Self::FillRestOfSeason { driver_id, .. } => Some(driver_id),
            _ => None,
        }
    }
}
