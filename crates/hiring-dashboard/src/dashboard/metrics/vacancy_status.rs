use super::super::domain::{JoinedFact, VacancyStatus};
use super::AggregationError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VacancyStatusSummary {
    pub open: usize,
    pub analyzing: usize,
    pub closed: usize,
}

impl VacancyStatusSummary {
    pub fn total(&self) -> usize {
        self.open + self.analyzing + self.closed
    }
}

/// Count facts by the status of their vacancy. Unknown status codes are
/// rejected instead of being folded into a neighbouring bucket.
pub fn summarize_vacancy_status(
    facts: &[JoinedFact],
) -> Result<VacancyStatusSummary, AggregationError> {
    let mut summary = VacancyStatusSummary::default();

    for fact in facts {
        let vacancy = &fact.vacancy()?.dimension;
        let status = vacancy
            .status()
            .ok_or(AggregationError::InvalidStatus {
                vacancy_id: vacancy.id,
                code: vacancy.status,
            })?;

        match status {
            VacancyStatus::Open => summary.open += 1,
            VacancyStatus::InAnalysis => summary.analyzing += 1,
            VacancyStatus::Closed => summary.closed += 1,
        }
    }

    Ok(summary)
}
