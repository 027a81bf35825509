use super::command::GridCommand;
use crate::grid::{Grid, GridError, ShareCode, ShareCodeError};
use crate::season::{DriverId, SeasonBundle, SeasonRules};
use crate::standings::{compute_standings, points_progression, PointsProgression, Standings};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("driver {0} is not on this season's roster")]
    UnknownDriver(DriverId),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    ShareCode(#[from] ShareCodeError),
}

/// Owns one season's reference data and grid. Every mutation goes through
/// [`PredictionSession::apply`] and leaves freshly computed standings behind.
#[derive(Debug, Clone)]
pub struct PredictionSession {
    bundle: SeasonBundle,
    rules: SeasonRules,
    grid: Grid,
    show_official: bool,
    standings: Standings,
}

impl PredictionSession {
    /// Fresh grid for the bundle with official results shown.
    pub fn new(bundle: SeasonBundle) -> Self {
        let rules = bundle.rules();
        let mut grid = Grid::for_season(&bundle.schedule, &rules);
        grid.apply_official_results(&bundle.results);

        let mut session = Self {
            bundle,
            rules,
            grid,
            show_official: true,
            standings: Standings::default(),
        };
        session.recompute();
        session
    }

    pub fn year(&self) -> u16 {
        self.bundle.year
    }

    pub fn bundle(&self) -> &SeasonBundle {
        &self.bundle
    }

    pub fn rules(&self) -> &SeasonRules {
        &self.rules
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn standings(&self) -> &Standings {
        &self.standings
    }

    pub fn shows_official_results(&self) -> bool {
        self.show_official
    }

    pub fn apply(&mut self, command: GridCommand) -> Result<&Standings, SessionError> {
        if let Some(driver_id) = command.placed_driver() {
            if !self.bundle.roster.contains_driver(driver_id) {
                return Err(SessionError::UnknownDriver(driver_id.clone()));
            }
        }

        let name = command.name();
        match command {
            GridCommand::PlaceDriver {
                race_id,
                position,
                driver_id,
            } => self.grid.place_driver(&race_id, position, driver_id)?,
            GridCommand::MoveDriver { driver_id, from, to } => self.grid.move_driver(
                driver_id,
                from.as_ref().map(|slot| (&slot.race_id, slot.position)),
                &to.race_id,
                to.position,
            )?,
            GridCommand::ClearPosition { race_id, position } => {
                self.grid.clear_position(&race_id, position)?
            }
            GridCommand::FillRestOfSeason {
                driver_id,
                position,
                start_race_id,
            } => {
                let written = self.grid.fill_rest_of_season(
                    &driver_id,
                    position,
                    &start_race_id,
                    &self.bundle.ordered_race_ids(),
                )?;
                debug!(%driver_id, position, written, "filled rest of season");
            }
            GridCommand::ResetGrid => self.grid.reset(),
            GridCommand::ClearEverything => {
                self.grid.clear_everything();
                self.show_official = false;
            }
            GridCommand::SetFastestLap { race_id, driver_id } => {
                self.grid.set_fastest_lap(&race_id, driver_id.as_ref())?
            }
            GridCommand::ShowOfficialResults { enabled } => self.show_official_results(enabled),
        }

        debug!(year = self.year(), command = name, "grid command applied");
        self.recompute();
        Ok(&self.standings)
    }

    pub fn share_code(&self) -> Result<ShareCode, SessionError> {
        Ok(ShareCode::encode(&self.grid, self.year())?)
    }

    /// Replace predictions with those in `code`. Returns the picks applied.
    pub fn load_share_code(&mut self, code: &ShareCode) -> Result<usize, SessionError> {
        let applied = code.apply(self.year(), &self.bundle.roster, &mut self.grid)?;
        debug!(year = self.year(), applied, "share code loaded");
        self.recompute();
        Ok(applied)
    }

    pub fn progression(&self) -> PointsProgression {
        points_progression(
            &self.grid,
            &self.bundle.schedule,
            &self.bundle.roster,
            self.year(),
        )
    }

    fn show_official_results(&mut self, enabled: bool) {
        self.show_official = enabled;
        let changed = if enabled {
            self.grid.apply_official_results(&self.bundle.results)
        } else {
            self.grid.clear_official_results()
        };
        debug!(year = self.year(), enabled, changed, "official results toggled");
    }

    fn recompute(&mut self) {
        self.standings = compute_standings(
            &self.grid,
            &self.bundle.schedule,
            &self.bundle.roster,
            self.year(),
        );
    }
}
