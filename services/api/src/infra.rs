use f1_predictor::config::SeasonDataConfig;
use f1_predictor::season::FileSeasonCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) default_season: u16,
}

/// File catalog rooted at the CLI override, else the configured directory.
pub(crate) fn season_catalog(
    config: &SeasonDataConfig,
    data_dir: Option<PathBuf>,
) -> FileSeasonCatalog {
    FileSeasonCatalog::new(data_dir.unwrap_or_else(|| config.data_dir.clone()))
}
