use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use wellbeing_engine::error::AppError;
use wellbeing_engine::wellbeing::{JsonFileLedgerStore, LinearScoreModel, WellbeingService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type FileBackedService = WellbeingService<LinearScoreModel, JsonFileLedgerStore>;

/// Load the score model and bind the ledger file into a ready service.
pub(crate) fn build_service(
    model_path: &Path,
    ledger_path: &Path,
) -> Result<FileBackedService, AppError> {
    let model = LinearScoreModel::from_path(model_path)?;
    info!(model = %model_path.display(), ledger = %ledger_path.display(), "score model loaded");

    let store = JsonFileLedgerStore::new(ledger_path);
    Ok(WellbeingService::new(Arc::new(model), Arc::new(store)))
}
