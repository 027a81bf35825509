use super::engine::{Accumulator, RaceScore, ScoringContext};
use crate::grid::Grid;
use crate::season::{calendar_order, season_rules, DriverId, Race, RaceId, Roster, TeamId};
use serde::Serialize;

/// Running total for one driver or team, one entry per race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativeSeries<K> {
    pub id: K,
    pub cumulative: Vec<u32>,
}

impl<K> CumulativeSeries<K> {
    pub fn final_total(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }
}

/// Championship totals race by race, in calendar order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsProgression {
    pub races: Vec<RaceId>,
    pub drivers: Vec<CumulativeSeries<DriverId>>,
    pub teams: Vec<CumulativeSeries<TeamId>>,
    pub race_scores: Vec<RaceScore>,
}

pub fn points_progression(
    grid: &Grid,
    races: &[Race],
    roster: &Roster,
    year: u16,
) -> PointsProgression {
    let context = ScoringContext::new(roster, season_rules(year));
    let mut drivers = Accumulator::new(roster.drivers.iter().map(|driver| &driver.id));
    let mut teams = Accumulator::new(roster.teams.iter().map(|team| &team.id));

    let mut driver_series: Vec<CumulativeSeries<DriverId>> = drivers
        .totals()
        .map(|(id, _)| CumulativeSeries {
            id: id.clone(),
            cumulative: Vec::new(),
        })
        .collect();
    let mut team_series: Vec<CumulativeSeries<TeamId>> = teams
        .totals()
        .map(|(id, _)| CumulativeSeries {
            id: id.clone(),
            cumulative: Vec::new(),
        })
        .collect();

    let ordered = calendar_order(races);
    let mut race_scores = Vec::with_capacity(ordered.len());

    for race in &ordered {
        let score = context.score(grid, race);
        for award in &score.awards {
            drivers.add(&award.driver_id, award.total());
            if let Some(team_id) = &award.team_id {
                teams.add(team_id, award.total());
            }
        }

        for (series, (_, total)) in driver_series.iter_mut().zip(drivers.totals()) {
            series.cumulative.push(total);
        }
        for (series, (_, total)) in team_series.iter_mut().zip(teams.totals()) {
            series.cumulative.push(total);
        }
        race_scores.push(score);
    }

    PointsProgression {
        races: ordered.iter().map(|race| race.id.clone()).collect(),
        drivers: driver_series,
        teams: team_series,
        race_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::{Driver, Team};
    use crate::standings::compute_standings;
    use chrono::NaiveDate;

    fn roster() -> Roster {
        Roster::new(
            vec![
                Driver {
                    id: DriverId::from("norris"),
                    name: "Lando Norris".to_string(),
                    nationality: "British".to_string(),
                    team_id: TeamId::from("mclaren"),
                },
                Driver {
                    id: DriverId::from("leclerc"),
                    name: "Charles Leclerc".to_string(),
                    nationality: "Monegasque".to_string(),
                    team_id: TeamId::from("ferrari"),
                },
            ],
            vec![
                Team {
                    id: TeamId::from("mclaren"),
                    name: "McLaren".to_string(),
                    color: "#FF8000".to_string(),
                    nationality: "British".to_string(),
                },
                Team {
                    id: TeamId::from("ferrari"),
                    name: "Ferrari".to_string(),
                    color: "#E8002D".to_string(),
                    nationality: "Italian".to_string(),
                },
            ],
        )
    }

    fn race(id: &str, order: u32, is_sprint: bool) -> Race {
        Race {
            id: RaceId::from(id),
            name: id.to_string(),
            country: String::new(),
            locality: String::new(),
            order,
            round: order,
            is_sprint,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            completed: false,
        }
    }

    #[test]
    fn cumulative_totals_follow_calendar_order() {
        // listed out of order on purpose
        let races = vec![race("miami", 2, false), race("miami_sprint", 1, true)];
        let mut grid = Grid::for_season(&races, &season_rules(2024));
        grid.place_driver(&RaceId::from("miami_sprint"), 1, DriverId::from("leclerc"))
            .expect("placed");
        grid.place_driver(&RaceId::from("miami"), 1, DriverId::from("norris"))
            .expect("placed");
        grid.place_driver(&RaceId::from("miami"), 2, DriverId::from("leclerc"))
            .expect("placed");

        let progression = points_progression(&grid, &races, &roster(), 2024);

        assert_eq!(
            progression.races,
            vec![RaceId::from("miami_sprint"), RaceId::from("miami")]
        );
        assert_eq!(progression.drivers[0].id, DriverId::from("norris"));
        assert_eq!(progression.drivers[0].cumulative, vec![0, 25]);
        assert_eq!(progression.drivers[1].cumulative, vec![8, 26]);
        assert_eq!(progression.teams[1].cumulative, vec![8, 26]);
        assert_eq!(progression.race_scores[0].total_points(), 8);
    }

    #[test]
    fn final_totals_match_standings() {
        let races = vec![race("bahrain", 1, false), race("jeddah", 2, false)];
        let mut grid = Grid::for_season(&races, &season_rules(2024));
        let bahrain = RaceId::from("bahrain");
        grid.place_driver(&bahrain, 3, DriverId::from("norris"))
            .expect("placed");
        grid.set_fastest_lap(&bahrain, Some(&DriverId::from("norris")))
            .expect("fastest lap");
        grid.place_driver(&RaceId::from("jeddah"), 7, DriverId::from("leclerc"))
            .expect("placed");

        let progression = points_progression(&grid, &races, &roster(), 2024);
        let standings = compute_standings(&grid, &races, &roster(), 2024);

        for series in &progression.drivers {
            let standing = standings.driver(&series.id).expect("driver ranked");
            assert_eq!(series.final_total(), standing.points);
        }
        for series in &progression.teams {
            let standing = standings.team(&series.id).expect("team ranked");
            assert_eq!(series.final_total(), standing.points);
        }
    }

    #[test]
    fn empty_schedule_yields_empty_series() {
        let progression = points_progression(&Grid::new(Vec::<RaceId>::new(), 20), &[], &roster(), 2024);
        assert!(progression.races.is_empty());
        assert_eq!(progression.drivers.len(), 2);
        assert_eq!(progression.drivers[0].final_total(), 0);
    }
}
