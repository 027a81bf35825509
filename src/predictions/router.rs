use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::command::GridCommand;
use super::service::{PredictionService, PredictionServiceError};
use super::session::SessionError;
use crate::error::AppError;
use crate::grid::{Grid, GridPosition, ShareCode};
use crate::season::{
    season_rules, FastestLapRule, Race, Roster, SeasonBundle, SeasonCatalog, SprintFormat,
    REGULAR_POINTS,
};
use crate::standings::{compute_standings, Standings};

/// Scoring rules for a season, as served to clients.
#[derive(Debug, Serialize)]
pub struct RulesView {
    pub year: u16,
    pub ruleset_year: u16,
    pub grid_size: u8,
    pub regular_points: Vec<u32>,
    pub sprint_format: SprintFormat,
    pub sprint_format_label: &'static str,
    pub sprint_points: Vec<u32>,
    pub fastest_lap: Option<FastestLapRule>,
}

impl RulesView {
    pub fn for_year(year: u16) -> Self {
        let rules = season_rules(year);
        Self {
            year,
            ruleset_year: rules.ruleset_year,
            grid_size: rules.grid_size,
            regular_points: REGULAR_POINTS.to_vec(),
            sprint_format: rules.sprint_format,
            sprint_format_label: rules.sprint_format.label(),
            sprint_points: rules.sprint_format.points_table().to_vec(),
            fastest_lap: rules.fastest_lap,
        }
    }
}

/// Stateless standings request: reference data plus the grid to score.
#[derive(Debug, Deserialize)]
pub struct StandingsRequest {
    pub year: u16,
    #[serde(flatten)]
    pub roster: Roster,
    #[serde(default)]
    pub schedule: Vec<Race>,
    #[serde(default)]
    pub positions: Vec<GridPosition>,
}

#[derive(Debug, Deserialize)]
pub struct ShareCodeRequest {
    pub code: ShareCode,
}

/// Router exposing rules, standings, grid commands, share codes and reloads.
pub fn prediction_router<C>(service: Arc<PredictionService<C>>) -> Router
where
    C: SeasonCatalog + 'static,
{
    Router::new()
        .route("/api/v1/standings", post(compute_handler))
        .route("/api/v1/seasons/:year/rules", get(rules_handler))
        .route("/api/v1/seasons/:year/bundle", get(season_handler::<C>))
        .route(
            "/api/v1/seasons/:year/standings",
            get(standings_handler::<C>),
        )
        .route(
            "/api/v1/seasons/:year/progression",
            get(progression_handler::<C>),
        )
        .route("/api/v1/seasons/:year/commands", post(command_handler::<C>))
        .route(
            "/api/v1/seasons/:year/share",
            get(share_handler::<C>).post(load_share_handler::<C>),
        )
        .route("/api/v1/seasons/:year/reload", post(reload_handler::<C>))
        .with_state(service)
}

pub(crate) async fn rules_handler(Path(year): Path<u16>) -> Response {
    (StatusCode::OK, axum::Json(RulesView::for_year(year))).into_response()
}

pub(crate) async fn season_handler<C>(
    State(service): State<Arc<PredictionService<C>>>,
    Path(year): Path<u16>,
) -> Result<axum::Json<SeasonBundle>, AppError>
where
    C: SeasonCatalog + 'static,
{
    Ok(axum::Json(service.season(year)?))
}

pub(crate) async fn compute_handler(axum::Json(request): axum::Json<StandingsRequest>) -> Response {
    let rules = season_rules(request.year);
    match Grid::from_positions(&request.schedule, &rules, &request.positions) {
        Ok((grid, stray_positions)) => {
            let mut standings: Standings =
                compute_standings(&grid, &request.schedule, &request.roster, request.year);
            standings.skipped_entries += stray_positions;
            (StatusCode::OK, axum::Json(standings)).into_response()
        }
        Err(error) => error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
    }
}

pub(crate) async fn standings_handler<C>(
    State(service): State<Arc<PredictionService<C>>>,
    Path(year): Path<u16>,
) -> Response
where
    C: SeasonCatalog + 'static,
{
    match service.standings(year) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(other) => service_error(other),
    }
}

pub(crate) async fn progression_handler<C>(
    State(service): State<Arc<PredictionService<C>>>,
    Path(year): Path<u16>,
) -> Response
where
    C: SeasonCatalog + 'static,
{
    match service.progression(year) {
        Ok(progression) => (StatusCode::OK, axum::Json(progression)).into_response(),
        Err(other) => service_error(other),
    }
}

pub(crate) async fn command_handler<C>(
    State(service): State<Arc<PredictionService<C>>>,
    Path(year): Path<u16>,
    axum::Json(command): axum::Json<GridCommand>,
) -> Response
where
    C: SeasonCatalog + 'static,
{
    match service.apply(year, command) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(other) => service_error(other),
    }
}

pub(crate) async fn share_handler<C>(
    State(service): State<Arc<PredictionService<C>>>,
    Path(year): Path<u16>,
) -> Response
where
    C: SeasonCatalog + 'static,
{
    match service.share_code(year) {
        Ok(code) => {
            let payload = json!({ "year": year, "code": code });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => service_error(other),
    }
}

pub(crate) async fn load_share_handler<C>(
    State(service): State<Arc<PredictionService<C>>>,
    Path(year): Path<u16>,
    axum::Json(request): axum::Json<ShareCodeRequest>,
) -> Response
where
    C: SeasonCatalog + 'static,
{
    match service.load_share_code(year, &request.code) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(other) => service_error(other),
    }
}

pub(crate) async fn reload_handler<C>(
    State(service): State<Arc<PredictionService<C>>>,
    Path(year): Path<u16>,
) -> Response
where
    C: SeasonCatalog + 'static,
{
    match service.reload(year) {
        Ok(reloaded) => {
            let payload = json!({ "year": year, "reloaded": reloaded });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => service_error(other),
    }
}

fn service_error(error: PredictionServiceError) -> Response {
    match error {
        PredictionServiceError::Session(
            error @ (SessionError::UnknownDriver(_) | SessionError::Grid(_)),
        ) => error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
        PredictionServiceError::Session(error @ SessionError::ShareCode(_)) => {
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
