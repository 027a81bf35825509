use crate::cli::ServeArgs;
use crate::infra::{season_catalog, AppState};
use crate::routes::with_prediction_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use f1_predictor::config::AppConfig;
use f1_predictor::error::AppError;
use f1_predictor::predictions::PredictionService;
use f1_predictor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        default_season: config.seasons.default_season,
    };

    let catalog = Arc::new(season_catalog(&config.seasons, args.data_dir.take()));
    let data_dir = catalog.root().display().to_string();
    let prediction_service = Arc::new(PredictionService::new(catalog));
    match prediction_service.standings(config.seasons.default_season) {
        Ok(view) => info!(
            season = view.year,
            drivers = view.standings.drivers.len(),
            populated = view.populated_positions,
            "default season loaded"
        ),
        Err(err) => warn!(error = %err, "default season could not be loaded"),
    }

    let app = with_prediction_routes(prediction_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %data_dir,
        season = config.seasons.default_season,
        "season predictor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
