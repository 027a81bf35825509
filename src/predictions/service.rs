use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info};

use super::command::GridCommand;
use super::session::{PredictionSession, SessionError};
use crate::grid::ShareCode;
use crate::season::{load_or_empty, CatalogError, SeasonBundle, SeasonCatalog};
use crate::standings::{PointsProgression, Standings};

/// Standings as returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonStandingsView {
    pub year: u16,
    pub official_results_shown: bool,
    pub populated_positions: usize,
    #[serde(flatten)]
    pub standings: Standings,
}

impl SeasonStandingsView {
    fn from_session(session: &PredictionSession) -> Self {
        Self {
            year: session.year(),
            official_results_shown: session.shows_official_results(),
            populated_positions: session.grid().populated_count(),
            standings: session.standings().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLoadOutcome {
    pub applied: usize,
    #[serde(flatten)]
    pub standings: SeasonStandingsView,
}

/// Per-season sessions behind a single lock, loaded lazily from the catalog.
/// Only seasons the catalog actually provides are cached.
pub struct PredictionService<C> {
    catalog: Arc<C>,
    sessions: Mutex<HashMap<u16, PredictionSession>>,
}

impl<C> PredictionService<C>
where
    C: SeasonCatalog + 'static,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn standings(&self, year: u16) -> Result<SeasonStandingsView, PredictionServiceError> {
        self.with_session(year, |session| Ok(SeasonStandingsView::from_session(session)))
    }

    pub fn apply(
        &self,
        year: u16,
        command: GridCommand,
    ) -> Result<SeasonStandingsView, PredictionServiceError> {
        self.with_session(year, |session| {
            session.apply(command)?;
            Ok(SeasonStandingsView::from_session(session))
        })
    }

    pub fn share_code(&self, year: u16) -> Result<ShareCode, PredictionServiceError> {
        self.with_session(year, |session| Ok(session.share_code()?))
    }

    pub fn load_share_code(
        &self,
        year: u16,
        code: &ShareCode,
    ) -> Result<ShareLoadOutcome, PredictionServiceError> {
        self.with_session(year, |session| {
            let applied = session.load_share_code(code)?;
            Ok(ShareLoadOutcome {
                applied,
                standings: SeasonStandingsView::from_session(session),
            })
        })
    }

    pub fn progression(&self, year: u16) -> Result<PointsProgression, PredictionServiceError> {
        self.with_session(year, |session| Ok(session.progression()))
    }

    /// Reference data for a season straight from the catalog.
    pub fn season(&self, year: u16) -> Result<SeasonBundle, CatalogError> {
        self.catalog.load(year)
    }

    /// Drop the cached session so the next call reloads from the catalog.
    pub fn reload(&self, year: u16) -> Result<bool, PredictionServiceError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| PredictionServiceError::StoreUnavailable)?;
        Ok(sessions.remove(&year).is_some())
    }

    /// Run `action` against the cached session for `year`. Seasons the
    /// catalog cannot provide get a throwaway empty session.
    fn with_session<T>(
        &self,
        year: u16,
        action: impl FnOnce(&mut PredictionSession) -> Result<T, PredictionServiceError>,
    ) -> Result<T, PredictionServiceError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| PredictionServiceError::StoreUnavailable)?;
        if let Some(session) = sessions.get_mut(&year) {
            return action(session);
        }

        let bundle = load_or_empty(self.catalog.as_ref(), year);
        if bundle.is_empty() {
            debug!(year, "season unavailable; session not cached");
            return action(&mut PredictionSession::new(bundle));
        }

        info!(
            year,
            races = bundle.schedule.len(),
            drivers = bundle.roster.drivers.len(),
            "prediction session started"
        );
        let session = sessions
            .entry(year)
            .or_insert_with(|| PredictionSession::new(bundle));
        action(session)
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("session store lock poisoned")]
    StoreUnavailable,
}
