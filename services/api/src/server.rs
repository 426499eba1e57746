use crate::cli::ServeArgs;
use crate::infra::{load_warehouse, AppState};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hiring_dashboard::config::AppConfig;
use hiring_dashboard::dashboard::DashboardService;
use hiring_dashboard::error::AppError;
use hiring_dashboard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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
    };

    let warehouse = Arc::new(load_warehouse(&config.storage, None)?);
    let dashboard_service = Arc::new(DashboardService::new(
        warehouse,
        config.storage.query_timeout,
    ));

    let app = with_dashboard_routes(dashboard_service, config.environment.error_verbosity())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hiring dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
