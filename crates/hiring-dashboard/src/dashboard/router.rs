use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, warn};

use super::filter::FactFilter;
use super::repository::FactRepository;
use super::service::{DashboardError, DashboardService};
use super::suggestions::SuggestionRequest;
use crate::config::ErrorVerbosity;

pub const GENERIC_ERROR_MESSAGE: &str = "unable to process dashboard request";

/// Shared handler state: the service plus how much error detail to expose.
pub struct DashboardState<R> {
    pub service: Arc<DashboardService<R>>,
    pub verbosity: ErrorVerbosity,
}

impl<R> Clone for DashboardState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            verbosity: self.verbosity,
        }
    }
}

/// Router builder exposing the dashboard and filter-suggestion endpoints.
pub fn dashboard_router<R>(service: Arc<DashboardService<R>>, verbosity: ErrorVerbosity) -> Router
where
    R: FactRepository + 'static,
{
    Router::new()
        .route("/api/v1/hiring-process/dashboard", post(metrics_handler::<R>))
        .route("/api/v1/table/dashboard", post(table_handler::<R>))
        .route("/api/v1/suggestions/recruiter", get(recruiters_handler::<R>))
        .route("/api/v1/suggestions/process", post(processes_handler::<R>))
        .route("/api/v1/suggestions/vacancies", post(vacancies_handler::<R>))
        .with_state(DashboardState { service, verbosity })
}

pub(crate) async fn metrics_handler<R>(
    State(state): State<DashboardState<R>>,
    axum::Json(filter): axum::Json<FactFilter>,
) -> Response
where
    R: FactRepository + 'static,
{
    match state.service.metrics(&filter, Utc::now()).await {
        Ok(metrics) => (StatusCode::OK, axum::Json(metrics)).into_response(),
        Err(err) => error_response(err, state.verbosity),
    }
}

pub(crate) async fn table_handler<R>(
    State(state): State<DashboardState<R>>,
    axum::Json(filter): axum::Json<FactFilter>,
) -> Response
where
    R: FactRepository + 'static,
{
    match state.service.table(&filter).await {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err, state.verbosity),
    }
}

pub(crate) async fn recruiters_handler<R>(State(state): State<DashboardState<R>>) -> Response
where
    R: FactRepository + 'static,
{
    match state.service.recruiter_suggestions().await {
        Ok(recruiters) => (StatusCode::OK, axum::Json(recruiters)).into_response(),
        Err(err) => error_response(err, state.verbosity),
    }
}

pub(crate) async fn processes_handler<R>(
    State(state): State<DashboardState<R>>,
    axum::Json(request): axum::Json<SuggestionRequest>,
) -> Response
where
    R: FactRepository + 'static,
{
    match state.service.process_suggestions(&request).await {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err, state.verbosity),
    }
}

pub(crate) async fn vacancies_handler<R>(
    State(state): State<DashboardState<R>>,
    axum::Json(request): axum::Json<SuggestionRequest>,
) -> Response
where
    R: FactRepository + 'static,
{
    match state.service.vacancy_suggestions(&request).await {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err, state.verbosity),
    }
}

fn error_response(err: DashboardError, verbosity: ErrorVerbosity) -> Response {
    let status = if err.is_validation() {
        warn!(error = %err, "rejected dashboard request");
        StatusCode::BAD_REQUEST
    } else {
        error!(error = %err, "dashboard request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let message = match verbosity {
        ErrorVerbosity::Detailed => err.to_string(),
        ErrorVerbosity::Generic => GENERIC_ERROR_MESSAGE.to_string(),
    };
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
