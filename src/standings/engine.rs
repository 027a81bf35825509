use crate::grid::Grid;
use crate::season::{calendar_order, season_rules, DriverId, Race, RaceId, Roster, SeasonRules, TeamId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Points earned by one populated slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsAward {
    pub driver_id: DriverId,
    /// Team credited, if it is on the roster.
    pub team_id: Option<TeamId>,
    pub position: u8,
    pub base_points: u32,
    pub fastest_lap_points: u32,
}

impl PointsAward {
    pub fn total(&self) -> u32 {
        self.base_points + self.fastest_lap_points
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceScore {
    pub race_id: RaceId,
    pub is_sprint: bool,
    pub awards: Vec<PointsAward>,
    /// Populated slots whose driver is not on the roster.
    pub skipped_entries: usize,
}

impl RaceScore {
    pub fn total_points(&self) -> u32 {
        self.awards.iter().map(PointsAward::total).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverStanding {
    pub driver_id: DriverId,
    pub points: u32,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub points: u32,
    pub position: usize,
}

/// Ranked championship tables. Every roster entry appears, scoring or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standings {
    pub drivers: Vec<DriverStanding>,
    pub teams: Vec<TeamStanding>,
    pub skipped_entries: usize,
}

impl Standings {
    pub fn driver(&self, driver_id: &DriverId) -> Option<&DriverStanding> {
        self.drivers.iter().find(|standing| &standing.driver_id == driver_id)
    }

    pub fn team(&self, team_id: &TeamId) -> Option<&TeamStanding> {
        self.teams.iter().find(|standing| &standing.team_id == team_id)
    }

    pub fn total_points(&self) -> u32 {
        self.drivers.iter().map(|standing| standing.points).sum()
    }
}

/// Lookups shared by every race scored against one roster.
pub(crate) struct ScoringContext<'a> {
    rules: SeasonRules,
    driver_teams: HashMap<&'a DriverId, &'a TeamId>,
    teams: HashSet<&'a TeamId>,
}

impl<'a> ScoringContext<'a> {
    pub(crate) fn new(roster: &'a Roster, rules: SeasonRules) -> Self {
        Self {
            rules,
            driver_teams: roster.driver_teams(),
            teams: roster.teams.iter().map(|team| &team.id).collect(),
        }
    }

    pub(crate) fn score(&self, grid: &Grid, race: &Race) -> RaceScore {
        let mut awards = Vec::new();
        let mut skipped_entries = 0;

        for (position, slot) in grid.populated(&race.id) {
            let Some(driver_id) = slot.driver_id.as_ref() else {
                continue;
            };
            let Some(&current_team) = self.driver_teams.get(driver_id) else {
                debug!(race_id = %race.id, %driver_id, "slot references a driver outside the roster");
                skipped_entries += 1;
                continue;
            };

            let team = slot.team_override.as_ref().unwrap_or(current_team);
            let team_id = self.teams.contains(team).then(|| team.clone());
            let fastest_lap_points = if slot.has_fastest_lap {
                self.rules.fastest_lap_points(position)
            } else {
                0
            };

            awards.push(PointsAward {
                driver_id: driver_id.clone(),
                team_id,
                position,
                base_points: self.rules.points_for_position(position, race.is_sprint),
                fastest_lap_points,
            });
        }

        RaceScore {
            race_id: race.id.clone(),
            is_sprint: race.is_sprint,
            awards,
            skipped_entries,
        }
    }
}

/// Points breakdown for a single race.
pub fn score_race(grid: &Grid, race: &Race, roster: &Roster, year: u16) -> RaceScore {
    ScoringContext::new(roster, season_rules(year)).score(grid, race)
}

/// Recompute both championships from scratch.
///
/// Races are visited in calendar order. Totals are ranked by points, highest
/// first; entries with equal points keep roster order and still receive
/// distinct positions.
pub fn compute_standings(grid: &Grid, races: &[Race], roster: &Roster, year: u16) -> Standings {
    let context = ScoringContext::new(roster, season_rules(year));
    let mut drivers = Accumulator::new(roster.drivers.iter().map(|driver| &driver.id));
    let mut teams = Accumulator::new(roster.teams.iter().map(|team| &team.id));
    let mut skipped_entries = 0;

    for race in calendar_order(races) {
        let score = context.score(grid, race);
        skipped_entries += score.skipped_entries;
        for award in &score.awards {
            drivers.add(&award.driver_id, award.total());
            if let Some(team_id) = &award.team_id {
                teams.add(team_id, award.total());
            }
        }
    }

    if skipped_entries > 0 {
        debug!(year, skipped_entries, "standings ignored slots with unknown drivers");
    }

    Standings {
        drivers: drivers
            .ranked()
            .map(|(driver_id, points, position)| DriverStanding {
                driver_id: driver_id.clone(),
                points,
                position,
            })
            .collect(),
        teams: teams
            .ranked()
            .map(|(team_id, points, position)| TeamStanding {
                team_id: team_id.clone(),
                points,
                position,
            })
            .collect(),
        skipped_entries,
    }
}

/// Point totals in discovery order.
pub(crate) struct Accumulator<'a, K> {
    totals: Vec<(&'a K, u32)>,
    index: HashMap<&'a K, usize>,
}

impl<'a, K> Accumulator<'a, K>
where
    K: Eq + std::hash::Hash,
{
    pub(crate) fn new(keys: impl IntoIterator<Item = &'a K>) -> Self {
        let mut accumulator = Self {
            totals: Vec::new(),
            index: HashMap::new(),
        };
        for key in keys {
            if !accumulator.index.contains_key(key) {
                accumulator.index.insert(key, accumulator.totals.len());
                accumulator.totals.push((key, 0));
            }
        }
        accumulator
    }

    pub(crate) fn add(&mut self, key: &K, points: u32) {
        if let Some(&slot) = self.index.get(key) {
            self.totals[slot].1 += points;
        }
    }

    pub(crate) fn totals(&self) -> impl Iterator<Item = (&'a K, u32)> + '_ {
        self.totals.iter().copied()
    }

    fn ranked(mut self) -> impl Iterator<Item = (&'a K, u32, usize)> {
        // stable: equal totals keep discovery order
        self.totals.sort_by(|a, b| b.1.cmp(&a.1));
        self.totals
            .into_iter()
            .enumerate()
            .map(|(index, (key, points))| (key, points, index + 1))
    }
}
