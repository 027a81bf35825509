use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

string_id!(
    /// Stable driver identifier, e.g. `max_verstappen`.
    DriverId
);
string_id!(
    /// Constructor identifier, e.g. `red_bull`.
    TeamId
);
string_id!(
    /// Race identifier. Sprint and main race at one event carry distinct ids.
    RaceId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    #[serde(default)]
    pub nationality: String,
    pub team_id: TeamId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub nationality: String,
}

/// A single scored session on the calendar.
///
/// `order` defines points accumulation order. It differs from `round` because a
/// sprint and the main race of the same weekend share a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub id: RaceId,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub locality: String,
    pub order: u32,
    pub round: u32,
    #[serde(default)]
    pub is_sprint: bool,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

/// Recorded classification for one driver in one race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult {
    pub driver_id: DriverId,
    pub team_id: TeamId,
    pub position: u8,
    #[serde(default)]
    pub fastest_lap: bool,
}

/// Drivers and constructors known for a season, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl Roster {
    pub fn new(drivers: Vec<Driver>, teams: Vec<Team>) -> Self {
        Self { drivers, teams }
    }

    pub fn driver(&self, id: &DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|driver| &driver.id == id)
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| &team.id == id)
    }

    pub fn contains_driver(&self, id: &DriverId) -> bool {
        self.driver(id).is_some()
    }

    pub fn contains_team(&self, id: &TeamId) -> bool {
        self.team(id).is_some()
    }

    /// Current-season team for every driver on the roster.
    pub fn driver_teams(&self) -> HashMap<&DriverId, &TeamId> {
        let mut map = HashMap::with_capacity(self.drivers.len());
        for driver in &self.drivers {
            map.entry(&driver.id).or_insert(&driver.team_id);
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.teams.is_empty()
    }
}

/// Races sorted by calendar order.
pub fn calendar_order(races: &[Race]) -> Vec<&Race> {
    let mut ordered: Vec<&Race> = races.iter().collect();
    ordered.sort_by_key(|race| race.order);
    ordered
}
