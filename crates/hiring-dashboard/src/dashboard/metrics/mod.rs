//! Dashboard aggregates computed over one retrieved fact set.
//!
//! The three reducers are independent. [`compute_metrics`] runs them side by
//! side on the blocking pool and only assembles a result when all of them
//! succeed; otherwise every failure is reported together.

pub mod cards;
pub mod hiring_time;
pub mod vacancy_status;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::{self, JoinError};

use super::domain::{DimensionId, JoinedFact, MissingDimension};

pub use cards::{compute_card_info, is_approaching_deadline, CardInfo, DEADLINE_WARNING_PERCENT};
pub use hiring_time::{
    average_hiring_time_for_vacancy, average_hiring_time_per_month, AverageHiringTimePerMonth,
    MONTH_NAMES,
};
pub use vacancy_status::{summarize_vacancy_status, VacancyStatusSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    CardInfo,
    VacancyStatus,
    AverageHiringTime,
}

impl MetricKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CardInfo => "CardInfo",
            Self::VacancyStatus => "VacancyStatus",
            Self::AverageHiringTime => "AvgHiringTime",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error(transparent)]
    MissingDimension(#[from] MissingDimension),
    #[error("invalid status code {code} for vacancy {vacancy_id}")]
    InvalidStatus { vacancy_id: DimensionId, code: i32 },
    #[error("{aggregator} aggregation did not complete: {reason}")]
    TaskFailed {
        aggregator: MetricKind,
        reason: String,
    },
}

#[derive(Debug)]
pub struct MetricFailure {
    pub kind: MetricKind,
    pub error: AggregationError,
}

impl fmt::Display for MetricFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

/// Every aggregator failure of a single metrics run, in aggregator order.
#[derive(Debug)]
pub struct MetricsFailure(pub Vec<MetricFailure>);

impl MetricsFailure {
    pub fn failures(&self) -> &[MetricFailure] {
        &self.0
    }

    /// True when any aggregator stopped on an unresolved join.
    pub fn has_missing_dimension(&self) -> bool {
        self.0
            .iter()
            .any(|failure| matches!(failure.error, AggregationError::MissingDimension(_)))
    }
}

impl fmt::Display for MetricsFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to get metrics due to the following errors:")?;
        for (index, failure) in self.0.iter().enumerate() {
            write!(f, "\n\t[{}] {}", index + 1, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for MetricsFailure {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub vacancy_status: VacancyStatusSummary,
    pub cards: CardInfo,
    pub average_hiring_time: AverageHiringTimePerMonth,
}

/// Run the card, vacancy-status and monthly hiring-time reducers concurrently
/// over the same snapshot.
pub async fn compute_metrics(
    facts: Arc<[JoinedFact]>,
    now: DateTime<Utc>,
) -> Result<DashboardMetrics, MetricsFailure> {
    let card_facts = Arc::clone(&facts);
    let status_facts = Arc::clone(&facts);
    let hiring_facts = facts;

    let (cards, vacancy_status, hiring) = tokio::join!(
        task::spawn_blocking(move || {
            compute_card_info(&card_facts, now).map_err(AggregationError::from)
        }),
        task::spawn_blocking(move || summarize_vacancy_status(&status_facts)),
        task::spawn_blocking(move || {
            Ok::<_, AggregationError>(average_hiring_time_per_month(
                hiring_facts.iter().filter_map(|fact| fact.vacancy.as_deref()),
            ))
        }),
    );

    let mut failures = Vec::new();
    let cards = settle(MetricKind::CardInfo, cards, &mut failures);
    let vacancy_status = settle(MetricKind::VacancyStatus, vacancy_status, &mut failures);
    let hiring = settle(MetricKind::AverageHiringTime, hiring, &mut failures);

    match (cards, vacancy_status, hiring) {
        (Some(cards), Some(vacancy_status), Some(average_hiring_time)) => Ok(DashboardMetrics {
            vacancy_status,
            cards,
            average_hiring_time,
        }),
        _ => Err(MetricsFailure(failures)),
    }
}

fn settle<T>(
    kind: MetricKind,
    joined: Result<Result<T, AggregationError>, JoinError>,
    failures: &mut Vec<MetricFailure>,
) -> Option<T> {
    let error = match joined {
        Ok(Ok(value)) => return Some(value),
        Ok(Err(error)) => error,
        Err(join_error) => AggregationError::TaskFailed {
            aggregator: kind,
            reason: join_error.to_string(),
        },
    };

    failures.push(MetricFailure { kind, error });
    None
}
