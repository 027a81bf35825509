use super::model::{Grid, GridError};
use crate::season::{DriverId, RaceId, Roster};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const SHARE_FORMAT_VERSION: u8 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ShareCodeError {
    #[error("share code is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("share code payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("share code format version {0} is not supported")]
    UnsupportedVersion(u8),
    #[error("share code is for season {found}, expected {expected}")]
    SeasonMismatch { expected: u16, found: u16 },
    #[error("share code references unknown race {0}")]
    UnknownRace(RaceId),
    #[error("share code references unknown driver {0}")]
    UnknownDriver(DriverId),
    #[error("share code places a driver at position {position} in {race_id}, outside the grid")]
    PositionOutOfRange { race_id: RaceId, position: u8 },
    #[error("share code places {driver_id} twice in {race_id}")]
    DuplicateDriver { race_id: RaceId, driver_id: DriverId },
    #[error("share code fills position {position} in {race_id} twice")]
    DuplicatePosition { race_id: RaceId, position: u8 },
    #[error("share code gives {0} more than one fastest lap")]
    MultipleFastestLaps(RaceId),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Serialize, Deserialize)]
struct SharePayload {
    version: u8,
    year: u16,
    picks: Vec<SharedPick>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SharedPick {
    race: RaceId,
    position: u8,
    driver: DriverId,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    fastest_lap: bool,
}

/// URL-safe encoding of a season's predictions. Official results are not
/// part of the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareCode(pub String);

impl ShareCode {
    pub fn encode(grid: &Grid, year: u16) -> Result<Self, ShareCodeError> {
        let picks = grid
            .positions()
            .into_iter()
            .filter(|position| !position.is_official_result)
            .filter_map(|position| {
                position.driver_id.map(|driver| SharedPick {
                    race: position.race_id,
                    position: position.position,
                    driver,
                    fastest_lap: position.has_fastest_lap,
                })
            })
            .collect();

        let payload = SharePayload {
            version: SHARE_FORMAT_VERSION,
            year,
            picks,
        };
        let bytes = serde_json::to_vec(&payload)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Replace the grid's predictions with the ones in this code. The code is
    /// validated in full first; on error the grid is untouched. Official
    /// results on the grid are preserved. Returns the number of picks applied.
    pub fn apply(&self, year: u16, roster: &Roster, grid: &mut Grid) -> Result<usize, ShareCodeError> {
        let payload = self.decode(year, roster, grid)?;

        grid.reset();
        let mut applied = 0;
        for pick in &payload.picks {
            if grid.place_prediction(&pick.race, pick.position, pick.driver.clone())? {
                applied += 1;
            }
        }

        for pick in payload.picks.iter().filter(|pick| pick.fastest_lap) {
            let official_holder = grid
                .fastest_lap_holder(&pick.race)
                .and_then(|(position, _)| grid.slot(&pick.race, position))
                .is_some_and(|slot| slot.is_official_result);
            let still_placed = grid
                .slot(&pick.race, pick.position)
                .is_some_and(|slot| slot.holds(&pick.driver));
            if !official_holder && still_placed {
                grid.set_fastest_lap(&pick.race, Some(&pick.driver))?;
            }
        }

        Ok(applied)
    }

    fn decode(&self, year: u16, roster: &Roster, grid: &Grid) -> Result<SharePayload, ShareCodeError> {
        let bytes = URL_SAFE_NO_PAD.decode(self.0.trim())?;
        let payload: SharePayload = serde_json::from_slice(&bytes)?;

        validate(&payload, year, roster, grid)?;
        Ok(payload)
    }
}

fn validate(payload: &SharePayload, year: u16, roster: &Roster, grid: &Grid) -> Result<(), ShareCodeError> {
    if payload.version != SHARE_FORMAT_VERSION {
        return Err(ShareCodeError::UnsupportedVersion(payload.version));
    }
    if payload.year != year {
        return Err(ShareCodeError::SeasonMismatch {
            expected: year,
            found: payload.year,
        });
    }

    let mut drivers: HashSet<(&RaceId, &DriverId)> = HashSet::new();
    let mut positions: HashSet<(&RaceId, u8)> = HashSet::new();
    let mut fastest_laps: HashSet<&RaceId> = HashSet::new();

    for pick in &payload.picks {
        if !grid.contains_race(&pick.race) {
            return Err(ShareCodeError::UnknownRace(pick.race.clone()));
        }
        if !(1..=grid.grid_size()).contains(&pick.position) {
            return Err(ShareCodeError::PositionOutOfRange {
                race_id: pick.race.clone(),
                position: pick.position,
            });
        }
        if !roster.contains_driver(&pick.driver) {
            return Err(ShareCodeError::UnknownDriver(pick.driver.clone()));
        }
        if !drivers.insert((&pick.race, &pick.driver)) {
            return Err(ShareCodeError::DuplicateDriver {
                race_id: pick.race.clone(),
                driver_id: pick.driver.clone(),
            });
        }
        if !positions.insert((&pick.race, pick.position)) {
            return Err(ShareCodeError::DuplicatePosition {
                race_id: pick.race.clone(),
                position: pick.position,
            });
        }
        if pick.fastest_lap && !fastest_laps.insert(&pick.race) {
            return Err(ShareCodeError::MultipleFastestLaps(pick.race.clone()));
        }
    }

    Ok(())
}

impl std::fmt::Display for ShareCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
