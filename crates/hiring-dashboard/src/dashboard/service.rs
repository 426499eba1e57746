use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{task, time};
use tracing::{debug, info, warn};

use super::domain::{JoinedFact, MissingDimension};
use super::filter::{apply_filters, FactFilter, FactQuery, FilterError};
use super::metrics::{compute_metrics, DashboardMetrics, MetricsFailure};
use super::pagination::{
    offset_and_total_pages, paginate, parse_page_request, Page, PaginationError,
};
use super::repository::{FactRepository, FetchWindow, RepositoryError};
use super::suggestions::{
    process_suggestions, vacancy_suggestions, RecruiterSuggestion, Suggestion, SuggestionRequest,
};
use super::table::{assemble_row, TableRow};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-side orchestration over a [`FactRepository`]: filter, retrieve, then
/// aggregate or page.
pub struct DashboardService<R> {
    repository: Arc<R>,
    query_timeout: Duration,
}

impl<R> DashboardService<R>
where
    R: FactRepository + 'static,
{
    pub fn new(repository: Arc<R>, query_timeout: Duration) -> Self {
        Self {
            repository,
            query_timeout,
        }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Aggregate every fact matching `filter`. Paging fields are ignored.
    pub async fn metrics(
        &self,
        filter: &FactFilter,
        now: DateTime<Utc>,
    ) -> Result<DashboardMetrics, DashboardError> {
        let query = apply_filters(FactQuery::all(), filter)?;
        let facts = self
            .retrieve("fetch", move |repository| {
                repository.fetch(&query, FetchWindow::all())
            })
            .await?;
        debug!(facts = facts.len(), "retrieved facts for metrics");

        let facts: Arc<[JoinedFact]> = facts.into();
        let metrics = compute_metrics(facts, now).await.map_err(|failure| {
            warn!(failures = failure.failures().len(), "metrics aggregation failed");
            DashboardError::Metrics(failure)
        })?;

        info!(
            open = metrics.cards.open,
            in_progress = metrics.cards.in_progress,
            closed = metrics.cards.closed,
            "dashboard metrics computed"
        );
        Ok(metrics)
    }

    /// One page of table rows for the facts matching `filter`.
    pub async fn table(&self, filter: &FactFilter) -> Result<Page<TableRow>, DashboardError> {
        let query = apply_filters(FactQuery::all(), filter)?;
        let selection = parse_page_request(Some(&filter.page))?;

        let count_query = query.clone();
        let total = self
            .retrieve("count", move |repository| repository.count(&count_query))
            .await?;
        let bounds = offset_and_total_pages(selection.page, selection.page_size, total);

        let window = FetchWindow::page(bounds.offset, selection.page_size);
        let facts = self
            .retrieve("fetch", move |repository| repository.fetch(&query, window))
            .await?;

        let items = facts
            .iter()
            .map(assemble_row)
            .collect::<Result<Vec<_>, MissingDimension>>()?;

        info!(
            page = selection.page,
            rows = items.len(),
            total,
            "dashboard table assembled"
        );
        Ok(Page {
            items,
            num_max_pages: bounds.total_pages,
        })
    }

    pub async fn recruiter_suggestions(&self) -> Result<Vec<RecruiterSuggestion>, DashboardError> {
        let recruiters = self
            .retrieve("recruiters", |repository| repository.recruiters())
            .await?;
        Ok(recruiters.into_iter().map(RecruiterSuggestion::from).collect())
    }

    /// Processes owned by the requested recruiters, newest first.
    pub async fn process_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Page<Suggestion>, DashboardError> {
        let selection = parse_page_request(Some(&request.page))?;
        let query = request.process_query();
        let processes = self
            .retrieve("processes", move |repository| repository.processes(&query))
            .await?;
        Ok(paginate(process_suggestions(processes), selection))
    }

    /// Vacancies attached to the requested processes, newest first.
    pub async fn vacancy_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Page<Suggestion>, DashboardError> {
        let selection = parse_page_request(Some(&request.page))?;
        let query = request.vacancy_query();
        let facts = self
            .retrieve("fetch", move |repository| {
                repository.fetch(&query, FetchWindow::all())
            })
            .await?;
        Ok(paginate(vacancy_suggestions(&facts), selection))
    }

    async fn retrieve<T, F>(&self, operation: &'static str, work: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&R) -> Result<T, RepositoryError> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        let handle = task::spawn_blocking(move || work(repository.as_ref()));

        match time::timeout(self.query_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(RepositoryError::Unavailable(format!(
                "{operation} task failed: {join_error}"
            ))),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "warehouse query exceeded its deadline"
                );
                Err(RepositoryError::Cancelled {
                    operation,
                    timeout: self.query_timeout,
                })
            }
        }
    }
}

/// Error raised by the dashboard service.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),
    #[error(transparent)]
    InvalidPage(#[from] PaginationError),
    #[error(transparent)]
    NotFound(#[from] MissingDimension),
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error(transparent)]
    Metrics(#[from] MetricsFailure),
}

impl DashboardError {
    /// Caller mistakes, as opposed to data or infrastructure faults.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidFilter(_) | Self::InvalidPage(_))
    }
}
