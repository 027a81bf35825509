use crate::season::{calendar_order, DriverId, Race, RaceId, SeasonRules, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Contents of one race/position cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSlot {
    pub driver_id: Option<DriverId>,
    /// Team credited for this slot instead of the driver's current team.
    pub team_override: Option<TeamId>,
    pub is_official_result: bool,
    pub has_fastest_lap: bool,
}

impl GridSlot {
    pub(crate) fn predicted(driver_id: DriverId) -> Self {
        Self {
            driver_id: Some(driver_id),
            ..Self::default()
        }
    }

    pub fn is_populated(&self) -> bool {
        self.driver_id.is_some()
    }

    pub fn holds(&self, driver_id: &DriverId) -> bool {
        self.driver_id.as_ref() == Some(driver_id)
    }

    pub(crate) fn vacate(&mut self) {
        *self = Self::default();
    }
}

/// Flat view of one cell, as exchanged with collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub race_id: RaceId,
    pub position: u8,
    pub driver_id: Option<DriverId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub is_official_result: bool,
    #[serde(default)]
    pub has_fastest_lap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("race {0} is not on the grid")]
    UnknownRace(RaceId),
    #[error("position {position} is outside the grid (1-{grid_size})")]
    PositionOutOfRange { position: u8, grid_size: u8 },
    #[error("driver {driver_id} has no position in race {race_id}")]
    DriverNotInRace { race_id: RaceId, driver_id: DriverId },
    #[error("driver {driver_id} is not at position {position} in race {race_id}")]
    DriverNotAtPosition {
        race_id: RaceId,
        position: u8,
        driver_id: DriverId,
    },
    #[error("driver {driver_id} appears more than once in race {race_id}")]
    DuplicateDriver { race_id: RaceId, driver_id: DriverId },
    #[error("race {0} has more than one fastest lap")]
    MultipleFastestLaps(RaceId),
}

/// The season's race x position assignment matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub(super) grid_size: u8,
    pub(super) races: BTreeMap<RaceId, Vec<GridSlot>>,
}

impl Grid {
    pub fn new<I>(race_ids: I, grid_size: u8) -> Self
    where
        I: IntoIterator<Item = RaceId>,
    {
        let races = race_ids
            .into_iter()
            .map(|race_id| (race_id, vec![GridSlot::default(); usize::from(grid_size)]))
            .collect();
        Self { grid_size, races }
    }

    /// One empty row per race and classified position.
    pub fn for_season(races: &[Race], rules: &SeasonRules) -> Self {
        Self::new(
            calendar_order(races).into_iter().map(|race| race.id.clone()),
            rules.grid_size,
        )
    }

    /// Build a grid from flat positions, enforcing the per-race invariants.
    /// Positions for races outside the schedule are dropped; the second
    /// value counts them.
    pub fn from_positions<'a, I>(
        races: &[Race],
        rules: &SeasonRules,
        positions: I,
    ) -> Result<(Self, usize), GridError>
    where
        I: IntoIterator<Item = &'a GridPosition>,
    {
        let mut grid = Self::for_season(races, rules);
        let mut skipped = 0;
        for entry in positions {
            if !grid.contains_race(&entry.race_id) {
                debug!(race_id = %entry.race_id, position = entry.position, "position for race outside the schedule ignored");
                skipped += 1;
                continue;
            }
            let index = grid.index(entry.position)?;
            let slots = grid.race_slots_mut(&entry.race_id)?;

            if let Some(driver_id) = &entry.driver_id {
                if slots.iter().any(|slot| slot.holds(driver_id)) {
                    return Err(GridError::DuplicateDriver {
                        race_id: entry.race_id.clone(),
                        driver_id: driver_id.clone(),
                    });
                }
            }
            if entry.has_fastest_lap && slots.iter().any(|slot| slot.has_fastest_lap) {
                return Err(GridError::MultipleFastestLaps(entry.race_id.clone()));
            }

            slots[index] = GridSlot {
                driver_id: entry.driver_id.clone(),
                team_override: entry.team_id.clone(),
                is_official_result: entry.is_official_result,
                has_fastest_lap: entry.has_fastest_lap && entry.driver_id.is_some(),
            };
        }
        Ok((grid, skipped))
    }

    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }

    pub fn race_ids(&self) -> impl Iterator<Item = &RaceId> {
        self.races.keys()
    }

    pub fn contains_race(&self, race_id: &RaceId) -> bool {
        self.races.contains_key(race_id)
    }

    pub fn race_slots(&self, race_id: &RaceId) -> Option<&[GridSlot]> {
        self.races.get(race_id).map(Vec::as_slice)
    }

    pub fn slot(&self, race_id: &RaceId, position: u8) -> Option<&GridSlot> {
        let index = self.index(position).ok()?;
        self.races.get(race_id)?.get(index)
    }

    /// Occupied slots of a race as `(position, slot)` pairs.
    pub fn populated(&self, race_id: &RaceId) -> impl Iterator<Item = (u8, &GridSlot)> {
        self.races
            .get(race_id)
            .into_iter()
            .flat_map(|slots| slots.iter().enumerate())
            .filter(|(_, slot)| slot.is_populated())
            .map(|(index, slot)| (position_of(index), slot))
    }

    pub fn driver_position(&self, race_id: &RaceId, driver_id: &DriverId) -> Option<u8> {
        self.populated(race_id)
            .find(|(_, slot)| slot.holds(driver_id))
            .map(|(position, _)| position)
    }

    pub fn fastest_lap_holder(&self, race_id: &RaceId) -> Option<(u8, &DriverId)> {
        self.populated(race_id)
            .find(|(_, slot)| slot.has_fastest_lap)
            .and_then(|(position, slot)| slot.driver_id.as_ref().map(|id| (position, id)))
    }

    /// Every cell, race by race.
    pub fn positions(&self) -> Vec<GridPosition> {
        self.races
            .iter()
            .flat_map(|(race_id, slots)| {
                slots.iter().enumerate().map(move |(index, slot)| GridPosition {
                    race_id: race_id.clone(),
                    position: position_of(index),
                    driver_id: slot.driver_id.clone(),
                    team_id: slot.team_override.clone(),
                    is_official_result: slot.is_official_result,
                    has_fastest_lap: slot.has_fastest_lap,
                })
            })
            .collect()
    }

    pub fn populated_count(&self) -> usize {
        self.races
            .values()
            .flat_map(|slots| slots.iter())
            .filter(|slot| slot.is_populated())
            .count()
    }

    /// Set `driver_id` at the target slot, vacating the driver's other slot in
    /// the same race. The written slot loses any official/team/fastest-lap
    /// markers.
    pub fn place_driver(
        &mut self,
        race_id: &RaceId,
        position: u8,
        driver_id: DriverId,
    ) -> Result<(), GridError> {
        let index = self.index(position)?;
        let slots = self.race_slots_mut(race_id)?;

        for (other, slot) in slots.iter_mut().enumerate() {
            if other != index && slot.holds(&driver_id) {
                slot.vacate();
            }
        }
        slots[index] = GridSlot::predicted(driver_id);
        Ok(())
    }

    /// Place a prediction unless it would disturb an official result: the
    /// target slot is official, or the driver holds an official slot elsewhere
    /// in the race. Returns whether the grid changed.
    pub fn place_prediction(
        &mut self,
        race_id: &RaceId,
        position: u8,
        driver_id: DriverId,
    ) -> Result<bool, GridError> {
        let index = self.index(position)?;
        let slots = self.race_slots(race_id).ok_or_else(|| GridError::UnknownRace(race_id.clone()))?;

        let protected = slots[index].is_official_result
            || slots
                .iter()
                .enumerate()
                .any(|(other, slot)| other != index && slot.holds(&driver_id) && slot.is_official_result);
        if protected {
            return Ok(false);
        }

        self.place_driver(race_id, position, driver_id)?;
        Ok(true)
    }

    /// Move a driver. With a source in the same race the destination occupant
    /// swaps into the vacated source slot and the fastest-lap flag travels
    /// with each driver. Without a source this is `place_driver`. A source in
    /// another race is vacated before placing.
    pub fn move_driver(
        &mut self,
        driver_id: DriverId,
        from: Option<(&RaceId, u8)>,
        to_race: &RaceId,
        to_position: u8,
    ) -> Result<(), GridError> {
        let Some((from_race, from_position)) = from else {
            return self.place_driver(to_race, to_position, driver_id);
        };

        let from_index = self.index(from_position)?;
        let to_index = self.index(to_position)?;
        if !self.contains_race(to_race) {
            return Err(GridError::UnknownRace(to_race.clone()));
        }
        let holds_source = self
            .race_slots(from_race)
            .ok_or_else(|| GridError::UnknownRace(from_race.clone()))?[from_index]
            .holds(&driver_id);
        if !holds_source {
            return Err(GridError::DriverNotAtPosition {
                race_id: from_race.clone(),
                position: from_position,
                driver_id,
            });
        }

        if from_race != to_race {
            self.race_slots_mut(from_race)?[from_index].vacate();
            return self.place_driver(to_race, to_position, driver_id);
        }

        if from_index == to_index {
            return Ok(());
        }

        let slots = self.race_slots_mut(to_race)?;
        let source = std::mem::take(&mut slots[from_index]);
        let displaced = std::mem::take(&mut slots[to_index]);

        slots[to_index] = GridSlot {
            has_fastest_lap: source.has_fastest_lap,
            ..GridSlot::predicted(driver_id)
        };
        if let Some(occupant) = displaced.driver_id {
            slots[from_index] = GridSlot {
                has_fastest_lap: displaced.has_fastest_lap,
                ..GridSlot::predicted(occupant)
            };
        }
        Ok(())
    }

    /// Vacate a slot. Official results are left untouched.
    pub fn clear_position(&mut self, race_id: &RaceId, position: u8) -> Result<(), GridError> {
        let index = self.index(position)?;
        let slot = &mut self.race_slots_mut(race_id)?[index];
        if !slot.is_official_result {
            slot.vacate();
        }
        Ok(())
    }

    /// Put `driver_id` at `position` in `start_race` and every later race of
    /// `ordered_race_ids`, skipping races where an official result would be
    /// disturbed. Returns the number of races written.
    pub fn fill_rest_of_season(
        &mut self,
        driver_id: &DriverId,
        position: u8,
        start_race: &RaceId,
        ordered_race_ids: &[RaceId],
    ) -> Result<usize, GridError> {
        self.index(position)?;
        let start = ordered_race_ids
            .iter()
            .position(|race_id| race_id == start_race)
            .ok_or_else(|| GridError::UnknownRace(start_race.clone()))?;

        let targets = &ordered_race_ids[start..];
        if let Some(missing) = targets.iter().find(|race_id| !self.contains_race(race_id)) {
            return Err(GridError::UnknownRace(missing.clone()));
        }

        let mut written = 0;
        for race_id in targets {
            if self.place_prediction(race_id, position, driver_id.clone())? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Vacate every slot that is not an official result.
    pub fn reset(&mut self) {
        for slot in self.races.values_mut().flat_map(|slots| slots.iter_mut()) {
            if !slot.is_official_result {
                slot.vacate();
            }
        }
    }

    /// Vacate every slot and strip all markers, official results included.
    pub fn clear_everything(&mut self) {
        for slot in self.races.values_mut().flat_map(|slots| slots.iter_mut()) {
            slot.vacate();
        }
    }

    /// Replace the race's fastest-lap holder. A driver with no slot in the race
    /// is rejected before anything changes.
    pub fn set_fastest_lap(
        &mut self,
        race_id: &RaceId,
        driver_id: Option<&DriverId>,
    ) -> Result<(), GridError> {
        let slots = self.race_slots_mut(race_id)?;

        let target = match driver_id {
            Some(driver_id) => Some(
                slots
                    .iter()
                    .position(|slot| slot.holds(driver_id))
                    .ok_or_else(|| GridError::DriverNotInRace {
                        race_id: race_id.clone(),
                        driver_id: driver_id.clone(),
                    })?,
            ),
            None => None,
        };

        for slot in slots.iter_mut() {
            slot.has_fastest_lap = false;
        }
        if let Some(index) = target {
            slots[index].has_fastest_lap = true;
        }
        Ok(())
    }

    pub(super) fn index(&self, position: u8) -> Result<usize, GridError> {
        if (1..=self.grid_size).contains(&position) {
            Ok(usize::from(position) - 1)
        } else {
            Err(GridError::PositionOutOfRange {
                position,
                grid_size: self.grid_size,
            })
        }
    }

    pub(super) fn race_slots_mut(&mut self, race_id: &RaceId) -> Result<&mut Vec<GridSlot>, GridError> {
        self.races
            .get_mut(race_id)
            .ok_or_else(|| GridError::UnknownRace(race_id.clone()))
    }
}

fn position_of(index: usize) -> u8 {
    // grid_size is a u8, so every index fits
    (index + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(id: &str) -> RaceId {
        RaceId::from(id)
    }

    fn driver(id: &str) -> DriverId {
        DriverId::from(id)
    }

    fn grid() -> Grid {
        Grid::new(
            ["race1", "race2", "race3", "race4", "race5"].map(RaceId::from),
            20,
        )
    }

    fn ordered() -> Vec<RaceId> {
        ["race1", "race2", "race3", "race4", "race5"]
            .map(RaceId::from)
            .to_vec()
    }

    fn mark_official(grid: &mut Grid, race_id: &str, position: u8, driver_id: &str) {
        let slot = &mut grid.race_slots_mut(&race(race_id)).expect("race exists")
            [usize::from(position) - 1];
        *slot = GridSlot {
            driver_id: Some(driver(driver_id)),
            team_override: Some(TeamId::from("ferrari")),
            is_official_result: true,
            has_fastest_lap: false,
        };
    }

    #[test]
    fn place_driver_vacates_previous_slot_in_same_race() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 2, driver("x")).expect("placed");
        grid.place_driver(&race("race1"), 5, driver("x")).expect("placed");

        assert!(!grid.slot(&race("race1"), 2).expect("slot").is_populated());
        assert!(grid.slot(&race("race1"), 5).expect("slot").holds(&driver("x")));
        assert_eq!(grid.populated_count(), 1);
    }

    #[test]
    fn place_driver_does_not_touch_other_races() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 1, driver("x")).expect("placed");
        grid.place_driver(&race("race2"), 3, driver("x")).expect("placed");
        assert_eq!(grid.driver_position(&race("race1"), &driver("x")), Some(1));
        assert_eq!(grid.driver_position(&race("race2"), &driver("x")), Some(3));
    }

    #[test]
    fn place_driver_strips_official_markers() {
        let mut grid = grid();
        mark_official(&mut grid, "race1", 1, "y");
        grid.set_fastest_lap(&race("race1"), Some(&driver("y")))
            .expect("fastest lap set");

        grid.place_driver(&race("race1"), 1, driver("x")).expect("placed");

        let slot = grid.slot(&race("race1"), 1).expect("slot");
        assert_eq!(slot, &GridSlot::predicted(driver("x")));
    }

    #[test]
    fn invalid_addresses_are_rejected() {
        let mut grid = grid();
        assert_eq!(
            grid.place_driver(&race("race1"), 21, driver("x")),
            Err(GridError::PositionOutOfRange {
                position: 21,
                grid_size: 20
            })
        );
        assert_eq!(
            grid.place_driver(&race("race1"), 0, driver("x")),
            Err(GridError::PositionOutOfRange {
                position: 0,
                grid_size: 20
            })
        );
        assert_eq!(
            grid.clear_position(&race("nowhere"), 1),
            Err(GridError::UnknownRace(race("nowhere")))
        );
    }

    #[test]
    fn same_race_move_swaps_with_occupant() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 1, driver("a")).expect("placed");
        grid.place_driver(&race("race1"), 4, driver("b")).expect("placed");
        grid.set_fastest_lap(&race("race1"), Some(&driver("b")))
            .expect("fastest lap set");

        grid.move_driver(driver("b"), Some((&race("race1"), 4)), &race("race1"), 1)
            .expect("moved");

        assert_eq!(grid.driver_position(&race("race1"), &driver("b")), Some(1));
        assert_eq!(grid.driver_position(&race("race1"), &driver("a")), Some(4));
        assert_eq!(
            grid.fastest_lap_holder(&race("race1")),
            Some((1, &driver("b")))
        );
    }

    #[test]
    fn same_race_move_into_empty_slot_leaves_source_empty() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 3, driver("a")).expect("placed");
        grid.move_driver(driver("a"), Some((&race("race1"), 3)), &race("race1"), 7)
            .expect("moved");
        assert!(!grid.slot(&race("race1"), 3).expect("slot").is_populated());
        assert_eq!(grid.driver_position(&race("race1"), &driver("a")), Some(7));
    }

    #[test]
    fn move_without_source_purges_driver_from_destination_race() {
        let mut grid = grid();
        grid.place_driver(&race("race2"), 6, driver("a")).expect("placed");
        grid.move_driver(driver("a"), None, &race("race2"), 2).expect("moved");
        assert_eq!(grid.driver_position(&race("race2"), &driver("a")), Some(2));
        assert_eq!(grid.populated(&race("race2")).count(), 1);
    }

    #[test]
    fn cross_race_move_vacates_source() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 1, driver("a")).expect("placed");
        grid.move_driver(driver("a"), Some((&race("race1"), 1)), &race("race2"), 3)
            .expect("moved");
        assert_eq!(grid.driver_position(&race("race1"), &driver("a")), None);
        assert_eq!(grid.driver_position(&race("race2"), &driver("a")), Some(3));
    }

    #[test]
    fn move_rejects_wrong_source() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 1, driver("a")).expect("placed");
        let err = grid
            .move_driver(driver("b"), Some((&race("race1"), 1)), &race("race1"), 2)
            .expect_err("source does not hold b");
        assert!(matches!(err, GridError::DriverNotAtPosition { .. }));
        assert_eq!(grid.driver_position(&race("race1"), &driver("a")), Some(1));
    }

    #[test]
    fn clear_position_respects_official_results() {
        let mut grid = grid();
        mark_official(&mut grid, "race1", 1, "y");
        grid.place_driver(&race("race1"), 2, driver("x")).expect("placed");

        grid.clear_position(&race("race1"), 1).expect("cleared");
        grid.clear_position(&race("race1"), 2).expect("cleared");

        assert!(grid.slot(&race("race1"), 1).expect("slot").holds(&driver("y")));
        assert!(!grid.slot(&race("race1"), 2).expect("slot").is_populated());

        grid.clear_everything();
        assert_eq!(grid.slot(&race("race1"), 1), Some(&GridSlot::default()));
    }

    #[test]
    fn fill_rest_of_season_starts_at_given_race_and_skips_official() {
        let mut grid = grid();
        mark_official(&mut grid, "race4", 1, "y");

        let written = grid
            .fill_rest_of_season(&driver("x"), 1, &race("race3"), &ordered())
            .expect("filled");

        assert_eq!(written, 2);
        assert_eq!(grid.driver_position(&race("race1"), &driver("x")), None);
        assert_eq!(grid.driver_position(&race("race2"), &driver("x")), None);
        assert_eq!(grid.driver_position(&race("race3"), &driver("x")), Some(1));
        assert!(grid.slot(&race("race4"), 1).expect("slot").holds(&driver("y")));
        assert_eq!(grid.driver_position(&race("race5"), &driver("x")), Some(1));
    }

    #[test]
    fn fill_rest_of_season_leaves_races_where_driver_is_official() {
        let mut grid = grid();
        mark_official(&mut grid, "race5", 3, "x");
        let written = grid
            .fill_rest_of_season(&driver("x"), 1, &race("race4"), &ordered())
            .expect("filled");
        assert_eq!(written, 1);
        assert_eq!(grid.driver_position(&race("race5"), &driver("x")), Some(3));
    }

    #[test]
    fn fill_rest_of_season_rejects_unknown_start() {
        let mut grid = grid();
        assert_eq!(
            grid.fill_rest_of_season(&driver("x"), 1, &race("race9"), &ordered()),
            Err(GridError::UnknownRace(race("race9")))
        );
        assert_eq!(grid.populated_count(), 0);
    }

    #[test]
    fn reset_keeps_official_results() {
        let mut grid = grid();
        mark_official(&mut grid, "race2", 1, "y");
        grid.place_driver(&race("race2"), 2, driver("x")).expect("placed");
        grid.place_driver(&race("race3"), 1, driver("x")).expect("placed");

        grid.reset();

        assert_eq!(grid.populated_count(), 1);
        assert!(grid.slot(&race("race2"), 1).expect("slot").is_official_result);
    }

    #[test]
    fn set_fastest_lap_keeps_a_single_holder() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 1, driver("a")).expect("placed");
        grid.place_driver(&race("race1"), 2, driver("b")).expect("placed");

        grid.set_fastest_lap(&race("race1"), Some(&driver("a"))).expect("set");
        grid.set_fastest_lap(&race("race1"), Some(&driver("b"))).expect("set");

        let flagged = grid
            .populated(&race("race1"))
            .filter(|(_, slot)| slot.has_fastest_lap)
            .count();
        assert_eq!(flagged, 1);
        assert_eq!(grid.fastest_lap_holder(&race("race1")), Some((2, &driver("b"))));

        grid.set_fastest_lap(&race("race1"), None).expect("cleared");
        assert_eq!(grid.fastest_lap_holder(&race("race1")), None);
    }

    #[test]
    fn set_fastest_lap_rejects_absent_driver_without_changes() {
        let mut grid = grid();
        grid.place_driver(&race("race1"), 1, driver("a")).expect("placed");
        grid.set_fastest_lap(&race("race1"), Some(&driver("a"))).expect("set");

        let err = grid
            .set_fastest_lap(&race("race1"), Some(&driver("z")))
            .expect_err("z is not in race1");

        assert_eq!(
            err,
            GridError::DriverNotInRace {
                race_id: race("race1"),
                driver_id: driver("z")
            }
        );
        assert_eq!(grid.fastest_lap_holder(&race("race1")), Some((1, &driver("a"))));
    }

    fn schedule() -> Vec<Race> {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date");
        vec![Race {
            id: race("race1"),
            name: "Race One".to_string(),
            country: String::new(),
            locality: String::new(),
            order: 1,
            round: 1,
            is_sprint: false,
            date,
            completed: false,
        }]
    }

    fn entry(position: u8, driver_id: &str, has_fastest_lap: bool) -> GridPosition {
        GridPosition {
            race_id: race("race1"),
            position,
            driver_id: Some(driver(driver_id)),
            team_id: None,
            is_official_result: false,
            has_fastest_lap,
        }
    }

    #[test]
    fn from_positions_builds_populated_grid() {
        let rules = crate::season::season_rules(2024);
        let entries = [entry(1, "a", false), entry(2, "b", true)];
        let (grid, skipped) =
            Grid::from_positions(&schedule(), &rules, entries.iter()).expect("valid grid");
        assert_eq!(skipped, 0);
        assert_eq!(grid.populated_count(), 2);
        assert_eq!(grid.fastest_lap_holder(&race("race1")), Some((2, &driver("b"))));
    }

    #[test]
    fn from_positions_rejects_duplicate_driver() {
        let rules = crate::season::season_rules(2024);
        let entries = [entry(1, "a", false), entry(2, "a", false)];
        assert_eq!(
            Grid::from_positions(&schedule(), &rules, entries.iter()),
            Err(GridError::DuplicateDriver {
                race_id: race("race1"),
                driver_id: driver("a")
            })
        );
    }

    #[test]
    fn from_positions_rejects_second_fastest_lap() {
        let rules = crate::season::season_rules(2024);
        let entries = [entry(1, "a", true), entry(2, "b", true)];
        assert_eq!(
            Grid::from_positions(&schedule(), &rules, entries.iter()),
            Err(GridError::MultipleFastestLaps(race("race1")))
        );
    }

    #[test]
    fn from_positions_drops_races_missing_from_schedule() {
        let rules = crate::season::season_rules(2024);
        let mut stray = entry(1, "a", true);
        stray.race_id = race("race9");
        stray.position = 40;
        let entries = [entry(1, "a", false), stray];

        let (grid, skipped) =
            Grid::from_positions(&schedule(), &rules, entries.iter()).expect("stray race dropped");

        assert_eq!(skipped, 1);
        assert_eq!(grid.populated_count(), 1);
        assert!(!grid.contains_race(&race("race9")));
        assert_eq!(grid.fastest_lap_holder(&race("race1")), None);
    }

    #[test]
    fn positions_lists_every_cell() {
        let grid = Grid::new([race("race1"), race("race2")], 20);
        let positions = grid.positions();
        assert_eq!(positions.len(), 40);
        assert_eq!(positions[0].position, 1);
        assert_eq!(positions[19].position, 20);
    }
}
