//! Season reference data and scoring rules.

pub mod catalog;
pub mod domain;
pub mod import;
pub mod points;
pub mod rules;

pub use catalog::{
    load_or_empty, CatalogError, FileSeasonCatalog, MemorySeasonCatalog, SeasonBundle,
    SeasonCatalog,
};
pub use domain::{calendar_order, Driver, DriverId, Race, RaceId, RaceResult, Roster, Team, TeamId};
pub use import::{ResultsImportError, ResultsImporter, SeasonResults};
pub use points::{points_for_position, regular_points, REGULAR_POINTS};
pub use rules::{
    fastest_lap_points, season_rules, sprint_points, FastestLapRule, SeasonRules, SprintFormat,
};
