use super::domain::{DriverId, RaceId, RaceResult, TeamId};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Recorded results keyed by race.
pub type SeasonResults = BTreeMap<RaceId, Vec<RaceResult>>;

#[derive(Debug)]
pub enum ResultsImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for ResultsImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultsImportError::Io(err) => write!(f, "failed to read results export: {}", err),
            ResultsImportError::Csv(err) => write!(f, "invalid results CSV data: {}", err),
            ResultsImportError::InvalidRow { line, reason } => {
                write!(f, "invalid result on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ResultsImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResultsImportError::Io(err) => Some(err),
            ResultsImportError::Csv(err) => Some(err),
            ResultsImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ResultsImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ResultsImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    #[serde(rename = "Race")]
    race: String,
    #[serde(rename = "Position")]
    position: u8,
    #[serde(rename = "Driver", default, deserialize_with = "empty_string_as_none")]
    driver: Option<String>,
    #[serde(rename = "Team", default, deserialize_with = "empty_string_as_none")]
    team: Option<String>,
    #[serde(rename = "Fastest Lap", default, deserialize_with = "flag_cell")]
    fastest_lap: bool,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn flag_cell<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        opt.as_deref().map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "x" | "y" | "yes" | "true")
    ))
}

/// Reads recorded classifications from a CSV export with the columns
/// `Race,Position,Driver,Team,Fastest Lap`.
pub struct ResultsImporter;

impl ResultsImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SeasonResults, ResultsImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SeasonResults, ResultsImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut results = SeasonResults::new();
        let mut seen_drivers: HashSet<(RaceId, DriverId)> = HashSet::new();
        let mut seen_positions: HashSet<(RaceId, u8)> = HashSet::new();
        let mut fastest_laps: HashSet<RaceId> = HashSet::new();

        for (index, record) in csv_reader.deserialize::<ResultRow>().enumerate() {
            let row = record?;
            // header occupies line 1
            let line = index + 2;

            let Some(driver) = row.driver else {
                continue;
            };

            if row.position == 0 {
                return Err(invalid(line, "position must be at least 1"));
            }

            let team = row
                .team
                .ok_or_else(|| invalid(line, format!("driver {driver} has no team")))?;

            let race_id = RaceId::new(row.race.trim());
            let driver_id = DriverId::new(driver);

            if !seen_positions.insert((race_id.clone(), row.position)) {
                return Err(invalid(
                    line,
                    format!("position {} repeated in {}", row.position, race_id),
                ));
            }
            if !seen_drivers.insert((race_id.clone(), driver_id.clone())) {
                return Err(invalid(
                    line,
                    format!("driver {} classified twice in {}", driver_id, race_id),
                ));
            }
            if row.fastest_lap && !fastest_laps.insert(race_id.clone()) {
                return Err(invalid(
                    line,
                    format!("more than one fastest lap in {}", race_id),
                ));
            }

            results.entry(race_id).or_default().push(RaceResult {
                driver_id,
                team_id: TeamId::new(team),
                position: row.position,
                fastest_lap: row.fastest_lap,
            });
        }

        for classification in results.values_mut() {
            classification.sort_by_key(|result| result.position);
        }

        Ok(results)
    }
}

fn invalid(line: usize, reason: impl Into<String>) -> ResultsImportError {
    ResultsImportError::InvalidRow {
        line,
        reason: reason.into(),
    }
}
