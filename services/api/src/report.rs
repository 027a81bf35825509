use crate::infra::season_catalog;
use clap::Args;
use f1_predictor::config::AppConfig;
use f1_predictor::error::AppError;
use f1_predictor::grid::ShareCode;
use f1_predictor::predictions::{GridCommand, PredictionSession, RulesView};
use f1_predictor::season::SeasonCatalog;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct StandingsArgs {
    /// Championship year (defaults to PREDICTOR_SEASON)
    #[arg(long)]
    pub(crate) year: Option<u16>,
    /// Directory holding `<year>.json` season bundles
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Score recorded race results alongside predictions
    #[arg(long)]
    pub(crate) official: bool,
    /// Apply the predictions encoded in a share code
    #[arg(long)]
    pub(crate) share: Option<String>,
    /// Only print the first N entries of each table
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct RulesArgs {
    /// Championship year (defaults to PREDICTOR_SEASON)
    #[arg(long)]
    pub(crate) year: Option<u16>,
}

pub(crate) fn run_standings(args: StandingsArgs) -> Result<(), AppError> {
    let StandingsArgs {
        year,
        data_dir,
        official,
        share,
        top,
    } = args;

    let config = AppConfig::load()?;
    let year = year.unwrap_or(config.seasons.default_season);
    let bundle = season_catalog(&config.seasons, data_dir).load(year)?;

    let mut session = PredictionSession::new(bundle);
    if !official {
        session.apply(GridCommand::ShowOfficialResults { enabled: false })?;
    }
    if let Some(code) = share {
        let applied = session.load_share_code(&ShareCode(code))?;
        println!("Applied {applied} predictions from share code\n");
    }

    print!("{}", render_standings(&session, top));
    Ok(())
}

pub(crate) fn run_rules(args: RulesArgs) -> Result<(), AppError> {
    let year = match args.year {
        Some(year) => year,
        None => AppConfig::load()?.seasons.default_season,
    };
    print!("{}", render_rules(&RulesView::for_year(year)));
    Ok(())
}

pub(crate) fn render_standings(session: &PredictionSession, top: Option<usize>) -> String {
    let roster = &session.bundle().roster;
    let standings = session.standings();
    let limit = top.unwrap_or(usize::MAX);
    let source = if session.shows_official_results() {
        "official results and predictions"
    } else {
        "predictions only"
    };

    let mut lines = vec![
        format!("{} championship standings ({source})", session.year()),
        String::new(),
        "Drivers".to_string(),
    ];
    for standing in standings.drivers.iter().take(limit) {
        let driver = roster.driver(&standing.driver_id);
        let name = driver
            .map(|driver| driver.name.as_str())
            .unwrap_or(standing.driver_id.as_str());
        let team = driver
            .and_then(|driver| roster.team(&driver.team_id))
            .map(|team| team.name.as_str())
            .unwrap_or("-");
        lines.push(format!(
            "{:>3}. {:<24} {:<24} {:>4} pts",
            standing.position, name, team, standing.points
        ));
    }

    lines.push(String::new());
    lines.push("Constructors".to_string());
    for standing in standings.teams.iter().take(limit) {
        let name = roster
            .team(&standing.team_id)
            .map(|team| team.name.as_str())
            .unwrap_or(standing.team_id.as_str());
        lines.push(format!(
            "{:>3}. {:<49} {:>4} pts",
            standing.position, name, standing.points
        ));
    }

    if standings.skipped_entries > 0 {
        lines.push(String::new());
        lines.push(format!(
            "{} grid entries reference drivers outside the roster and were not scored",
            standings.skipped_entries
        ));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

pub(crate) fn render_rules(rules: &RulesView) -> String {
    let mut lines = vec![format!("{} scoring rules", rules.year)];
    if rules.ruleset_year != rules.year {
        lines.push(format!(
            "(no ruleset recorded for {}; using {})",
            rules.year, rules.ruleset_year
        ));
    }
    lines.push(format!("- Grid size: {} positions", rules.grid_size));
    lines.push(format!("- Race points: {}", join_points(&rules.regular_points)));
    if rules.sprint_points.is_empty() {
        lines.push(format!("- Sprint: {}", rules.sprint_format_label));
    } else {
        lines.push(format!(
            "- Sprint: {} ({})",
            rules.sprint_format_label,
            join_points(&rules.sprint_points)
        ));
    }
    match rules.fastest_lap {
        Some(rule) => lines.push(format!(
            "- Fastest lap: +{} for a finish in the top {}",
            rule.bonus_points, rule.max_eligible_position
        )),
        None => lines.push("- Fastest lap: no bonus".to_string()),
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

fn join_points(points: &[u32]) -> String {
    points
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("-")
}
