use std::collections::BTreeSet;
use std::time::Duration;

use super::domain::{DimensionId, JoinedFact, ProcessDimension, RecruiterDimension};
use super::filter::FactQuery;

/// Offset/limit window over the ordered fact sequence. `limit: None` reads to
/// the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchWindow {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl FetchWindow {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }
}

/// Narrowing for the process listing. Empty sets do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessQuery {
    pub departments: BTreeSet<DimensionId>,
    pub recruiters: BTreeSet<DimensionId>,
}

impl ProcessQuery {
    pub fn matches(&self, process: &ProcessDimension) -> bool {
        let department_ok = self.departments.is_empty()
            || process
                .department_id
                .is_some_and(|id| self.departments.contains(&id));
        let recruiter_ok =
            self.recruiters.is_empty() || self.recruiters.contains(&process.recruiter_id);
        department_ok && recruiter_ok
    }
}

/// Read-only access to the hiring warehouse.
///
/// Facts come back eagerly joined with their dimensions and the candidate
/// list of their vacancy, in a stable order so offset windows line up with
/// [`FactRepository::count`].
pub trait FactRepository: Send + Sync {
    fn count(&self, query: &FactQuery) -> Result<usize, RepositoryError>;
    fn fetch(
        &self,
        query: &FactQuery,
        window: FetchWindow,
    ) -> Result<Vec<JoinedFact>, RepositoryError>;
    fn recruiters(&self) -> Result<Vec<RecruiterDimension>, RepositoryError>;
    fn processes(&self, query: &ProcessQuery) -> Result<Vec<ProcessDimension>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("warehouse unavailable: {0}")]
    Unavailable(String),
    #[error("{operation} cancelled after {}ms", .timeout.as_millis())]
    Cancelled {
        operation: &'static str,
        timeout: Duration,
    },
}
