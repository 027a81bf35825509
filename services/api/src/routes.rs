use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use f1_predictor::predictions::{prediction_router, PredictionService, RulesView};
use f1_predictor::season::SeasonCatalog;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_prediction_routes<C>(service: Arc<PredictionService<C>>) -> axum::Router
where
    C: SeasonCatalog + 'static,
{
    prediction_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/seasons/current", axum::routing::get(current_season))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Default season with its rules, for clients that open without a year.
pub(crate) async fn current_season(Extension(state): Extension<AppState>) -> Json<RulesView> {
    Json(RulesView::for_year(state.default_season))
}
