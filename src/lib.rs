pub mod config;
pub mod error;
pub mod grid;
pub mod predictions;
pub mod season;
pub mod standings;
pub mod telemetry;
