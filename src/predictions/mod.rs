//! Season prediction sessions: grid commands in, standings out.

pub mod command;
pub mod router;
pub mod service;
mod session;

#[cfg(test)]
mod tests;

pub use command::{GridCommand, SlotRef};
pub use router::{prediction_router, RulesView, ShareCodeRequest, StandingsRequest};
pub use service::{PredictionService, PredictionServiceError, SeasonStandingsView, ShareLoadOutcome};
pub use session::{PredictionSession, SessionError};
