//! Hiring-funnel analytics over a star-schema warehouse: filter composition,
//! the dashboard aggregates, the paginated fact table, and the option
//! listings behind the filter pickers.

pub mod domain;
pub mod filter;
pub mod metrics;
pub mod pagination;
pub mod repository;
pub mod router;
pub mod service;
pub mod suggestions;
pub mod table;
pub mod warehouse;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateStatus, DateDimension, DimensionId, DimensionKind, FactRecord,
    JoinedFact, JoinedVacancy, MissingDimension, ProcessDimension, ProcessStatus,
    RecruiterDimension, VacancyDimension, VacancyStatus,
};
pub use filter::{
    apply_filters, DateField, DateRange, FactFilter, FactPredicate, FactQuery, FilterError,
};
pub use metrics::{
    compute_metrics, AggregationError, AverageHiringTimePerMonth, CardInfo, DashboardMetrics,
    MetricFailure, MetricKind, MetricsFailure, VacancyStatusSummary,
};
pub use pagination::{
    offset_and_total_pages, paginate, parse_page_request, Page, PageBounds, PageRequest,
    PageSelection, PaginationError, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
pub use repository::{FactRepository, FetchWindow, ProcessQuery, RepositoryError};
pub use router::{dashboard_router, DashboardState};
pub use service::{DashboardError, DashboardService, DEFAULT_QUERY_TIMEOUT};
pub use suggestions::{RecruiterSuggestion, Suggestion, SuggestionRequest};
pub use table::{assemble_row, TableRow};
pub use warehouse::{InMemoryWarehouse, WarehouseError, WarehouseSnapshot};
