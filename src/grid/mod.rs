//! The prediction grid: which driver sits where in every race of a season.

mod model;
mod overlay;
pub mod share;

pub use model::{Grid, GridError, GridPosition, GridSlot};
pub use share::{ShareCode, ShareCodeError};
