use super::model::{Grid, GridSlot};
use crate::season::SeasonResults;
use tracing::debug;

impl Grid {
    /// Overwrite every slot with a recorded result and mark it official.
    /// Returns the number of slots written.
    pub fn apply_official_results(&mut self, results: &SeasonResults) -> usize {
        let grid_size = self.grid_size;
        let mut written = 0;

        for (race_id, classification) in results {
            let Some(slots) = self.races.get_mut(race_id) else {
                debug!(%race_id, "results for race outside the schedule ignored");
                continue;
            };

            for result in classification {
                if !(1..=grid_size).contains(&result.position) {
                    debug!(%race_id, position = result.position, "result outside the grid ignored");
                    continue;
                }
                let index = usize::from(result.position) - 1;

                for (other, slot) in slots.iter_mut().enumerate() {
                    if other != index && slot.holds(&result.driver_id) {
                        slot.vacate();
                    }
                    if result.fastest_lap {
                        slot.has_fastest_lap = false;
                    }
                }

                slots[index] = GridSlot {
                    driver_id: Some(result.driver_id.clone()),
                    team_override: Some(result.team_id.clone()),
                    is_official_result: true,
                    has_fastest_lap: result.fastest_lap,
                };
                written += 1;
            }
        }

        written
    }

    /// Wipe every official slot back to empty.
    pub fn clear_official_results(&mut self) -> usize {
        let mut cleared = 0;
        for slot in self.races.values_mut().flat_map(|slots| slots.iter_mut()) {
            if slot.is_official_result {
                slot.vacate();
                cleared += 1;
            }
        }
        cleared
    }

    pub fn has_official_results(&self) -> bool {
        self.races
            .values()
            .flat_map(|slots| slots.iter())
            .any(|slot| slot.is_official_result)
    }
}
