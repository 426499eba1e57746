use chrono::NaiveDate;
use hiring_dashboard::config::StorageConfig;
use hiring_dashboard::dashboard::{InMemoryWarehouse, WarehouseSnapshot};
use hiring_dashboard::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the snapshot named by `override_path`, falling back to the configured
/// one. Without either the service starts over an empty warehouse.
pub(crate) fn load_warehouse(
    storage: &StorageConfig,
    override_path: Option<&Path>,
) -> Result<InMemoryWarehouse, AppError> {
    match override_path.or(storage.warehouse_path.as_deref()) {
        Some(path) => Ok(InMemoryWarehouse::from_path(path)?),
        None => {
            warn!("no warehouse snapshot configured; serving an empty warehouse");
            Ok(InMemoryWarehouse::from_snapshot(WarehouseSnapshot::default()))
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
