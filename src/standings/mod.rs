//! Championship tables derived from a grid. Always recomputed in full.

mod engine;
mod progression;

pub use engine::{
    compute_standings, score_race, DriverStanding, PointsAward, RaceScore, Standings,
    TeamStanding,
};
pub use progression::{points_progression, CumulativeSeries, PointsProgression};
