use super::domain::{Race, RaceId, Roster};
use super::import::{ResultsImportError, ResultsImporter, SeasonResults};
use super::rules::{season_rules, SeasonRules};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything the metadata service provides for one season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonBundle {
    pub year: u16,
    #[serde(flatten)]
    pub roster: Roster,
    #[serde(default)]
    pub schedule: Vec<Race>,
    #[serde(default)]
    pub results: SeasonResults,
}

impl SeasonBundle {
    pub fn empty(year: u16) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> SeasonRules {
        season_rules(self.year)
    }

    /// Race ids in calendar order.
    pub fn ordered_race_ids(&self) -> Vec<RaceId> {
        super::domain::calendar_order(&self.schedule)
            .into_iter()
            .map(|race| race.id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty() && self.schedule.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("season {year} is not available")]
    NotFound { year: u16 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid season data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bundle for season {found} returned when {requested} was requested")]
    SeasonMismatch { requested: u16, found: u16 },
    #[error(transparent)]
    Results(#[from] ResultsImportError),
}

/// Source of season reference data.
pub trait SeasonCatalog: Send + Sync {
    fn load(&self, year: u16) -> Result<SeasonBundle, CatalogError>;
}

/// Load a season, degrading to empty reference data when the catalog fails.
pub fn load_or_empty<C>(catalog: &C, year: u16) -> SeasonBundle
where
    C: SeasonCatalog + ?Sized,
{
    match catalog.load(year) {
        Ok(bundle) => {
            debug!(
                year,
                drivers = bundle.roster.drivers.len(),
                races = bundle.schedule.len(),
                "season data loaded"
            );
            bundle
        }
        Err(err) => {
            warn!(year, error = %err, "season data unavailable, continuing with empty reference data");
            SeasonBundle::empty(year)
        }
    }
}

/// Reads `<root>/<year>.json` bundles. When a bundle carries no results and
/// `<root>/<year>-results.csv` exists, results are imported from the CSV.
#[derive(Debug, Clone)]
pub struct FileSeasonCatalog {
    root: PathBuf,
}

impl FileSeasonCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bundle_path(&self, year: u16) -> PathBuf {
        self.root.join(format!("{year}.json"))
    }

    fn results_path(&self, year: u16) -> PathBuf {
        self.root.join(format!("{year}-results.csv"))
    }
}

impl SeasonCatalog for FileSeasonCatalog {
    fn load(&self, year: u16) -> Result<SeasonBundle, CatalogError> {
        let path = self.bundle_path(year);
        let raw = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CatalogError::NotFound { year }
            } else {
                CatalogError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let mut bundle: SeasonBundle = serde_json::from_str(&raw)
            .map_err(|source| CatalogError::Json { path, source })?;

        if bundle.year != year {
            return Err(CatalogError::SeasonMismatch {
                requested: year,
                found: bundle.year,
            });
        }

        let results_path = self.results_path(year);
        if bundle.results.is_empty() && results_path.is_file() {
            bundle.results = ResultsImporter::from_path(&results_path)?;
        }

        Ok(bundle)
    }
}

/// Catalog over bundles held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySeasonCatalog {
    seasons: HashMap<u16, SeasonBundle>,
}

impl MemorySeasonCatalog {
    pub fn new(bundles: impl IntoIterator<Item = SeasonBundle>) -> Self {
        let seasons = bundles
            .into_iter()
            .map(|bundle| (bundle.year, bundle))
            .collect();
        Self { seasons }
    }
}

impl SeasonCatalog for MemorySeasonCatalog {
    fn load(&self, year: u16) -> Result<SeasonBundle, CatalogError> {
        self.seasons
            .get(&year)
            .cloned()
            .ok_or(CatalogError::NotFound { year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenCatalog;

    impl SeasonCatalog for BrokenCatalog {
        fn load(&self, _year: u16) -> Result<SeasonBundle, CatalogError> {
            Err(CatalogError::Io {
                path: PathBuf::from("/unreachable"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "connection reset"),
            })
        }
    }

    #[test]
    fn load_or_empty_degrades_to_empty_bundle() {
        let bundle = load_or_empty(&BrokenCatalog, 2024);
        assert_eq!(bundle, SeasonBundle::empty(2024));
        assert!(bundle.is_empty());
    }

    #[test]
    fn file_catalog_reports_missing_season() {
        let catalog = FileSeasonCatalog::new("./no-such-directory");
        match catalog.load(2024) {
            Err(CatalogError::NotFound { year }) => assert_eq!(year, 2024),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn bundle_json_uses_flat_roster_fields() {
        let json = r##"{
            "year": 2024,
            "drivers": [{"id": "norris", "name": "Lando Norris", "team_id": "mclaren"}],
            "teams": [{"id": "mclaren", "name": "McLaren", "color": "#FF8000"}],
            "schedule": [{"id": "monaco", "name": "Monaco Grand Prix", "order": 8, "round": 8, "date": "2024-05-26"}]
        }"##;
        let bundle: SeasonBundle = serde_json::from_str(json).expect("bundle parses");
        assert_eq!(bundle.roster.drivers.len(), 1);
        assert_eq!(bundle.roster.teams[0].color, "#FF8000");
        assert!(!bundle.schedule[0].is_sprint);
        assert!(bundle.results.is_empty());
    }

    #[test]
    fn memory_catalog_returns_known_seasons_only() {
        let catalog = MemorySeasonCatalog::new([SeasonBundle::empty(2023)]);
        assert!(catalog.load(2023).is_ok());
        assert!(matches!(
            catalog.load(2024),
            Err(CatalogError::NotFound { year: 2024 })
        ));
    }
}
