//! In-memory warehouse backed by a JSON snapshot of the star schema.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    Candidate, DateDimension, DimensionId, FactRecord, JoinedFact, JoinedVacancy,
    ProcessDimension, RecruiterDimension, VacancyDimension,
};
use super::filter::FactQuery;
use super::repository::{FactRepository, FetchWindow, ProcessQuery, RepositoryError};

/// Serialized form of every table the dashboard reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseSnapshot {
    pub processes: Vec<ProcessDimension>,
    pub vacancies: Vec<VacancyDimension>,
    pub recruiters: Vec<RecruiterDimension>,
    pub dates: Vec<DateDimension>,
    pub candidates: Vec<Candidate>,
    pub facts: Vec<FactRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("failed to open warehouse snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid warehouse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Facts are joined once at load time; queries then filter the pre-joined
/// rows in fact-id order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWarehouse {
    facts: Vec<JoinedFact>,
    recruiters: BTreeMap<DimensionId, RecruiterDimension>,
    processes: BTreeMap<DimensionId, ProcessDimension>,
}

impl InMemoryWarehouse {
    pub fn from_snapshot(snapshot: WarehouseSnapshot) -> Self {
        let WarehouseSnapshot {
            processes,
            vacancies,
            recruiters,
            dates,
            candidates,
            mut facts,
        } = snapshot;

        let mut candidates_by_vacancy: HashMap<DimensionId, Vec<Candidate>> = HashMap::new();
        for candidate in candidates {
            candidates_by_vacancy
                .entry(candidate.vacancy_id)
                .or_default()
                .push(candidate);
        }

        let joined_processes: HashMap<DimensionId, Arc<ProcessDimension>> = processes
            .iter()
            .map(|process| (process.id, Arc::new(process.clone())))
            .collect();
        let joined_vacancies: HashMap<DimensionId, Arc<JoinedVacancy>> = vacancies
            .into_iter()
            .map(|dimension| {
                let candidates = candidates_by_vacancy
                    .remove(&dimension.id)
                    .unwrap_or_default();
                (
                    dimension.id,
                    Arc::new(JoinedVacancy {
                        dimension,
                        candidates,
                    }),
                )
            })
            .collect();
        let joined_recruiters: HashMap<DimensionId, Arc<RecruiterDimension>> = recruiters
            .iter()
            .map(|recruiter| (recruiter.id, Arc::new(recruiter.clone())))
            .collect();
        let joined_dates: HashMap<DimensionId, Arc<DateDimension>> = dates
            .into_iter()
            .map(|date| (date.id, Arc::new(date)))
            .collect();

        facts.sort_by_key(|fact| fact.id);
        let facts: Vec<JoinedFact> = facts
            .into_iter()
            .map(|fact| JoinedFact {
                process: joined_processes.get(&fact.process_id).cloned(),
                vacancy: joined_vacancies.get(&fact.vacancy_id).cloned(),
                recruiter: joined_recruiters.get(&fact.recruiter_id).cloned(),
                date: joined_dates.get(&fact.date_id).cloned(),
                fact,
            })
            .collect();

        let unresolved = facts
            .iter()
            .filter(|joined| joined.process.is_none() || joined.vacancy.is_none())
            .count();
        if unresolved > 0 {
            debug!(unresolved, "facts reference unknown process or vacancy rows");
        }

        Self {
            facts,
            recruiters: recruiters
                .into_iter()
                .map(|recruiter| (recruiter.id, recruiter))
                .collect(),
            processes: processes
                .into_iter()
                .map(|process| (process.id, process))
                .collect(),
        }
    }

    pub fn from_json_reader<Rd: Read>(reader: Rd) -> Result<Self, WarehouseError> {
        let snapshot: WarehouseSnapshot = serde_json::from_reader(reader)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WarehouseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| WarehouseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let warehouse = Self::from_json_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            facts = warehouse.fact_count(),
            "loaded warehouse snapshot"
        );
        Ok(warehouse)
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    fn matching<'a>(&'a self, query: &'a FactQuery) -> impl Iterator<Item = &'a JoinedFact> + 'a {
        self.facts.iter().filter(move |fact| query.matches(fact))
    }
}

impl FactRepository for InMemoryWarehouse {
    fn count(&self, query: &FactQuery) -> Result<usize, RepositoryError> {
        Ok(self.matching(query).count())
    }

    fn fetch(
        &self,
        query: &FactQuery,
        window: FetchWindow,
    ) -> Result<Vec<JoinedFact>, RepositoryError> {
        let matching = self.matching(query).skip(window.offset);
        let facts = match window.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        };
        Ok(facts)
    }

    fn recruiters(&self) -> Result<Vec<RecruiterDimension>, RepositoryError> {
        Ok(self.recruiters.values().cloned().collect())
    }

    fn processes(&self, query: &ProcessQuery) -> Result<Vec<ProcessDimension>, RepositoryError> {
        Ok(self
            .processes
            .values()
            .filter(|process| query.matches(process))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::filter::FactPredicate;
    use serde_json::json;

    fn snapshot() -> serde_json::Value {
        json!({
            "processes": [
                { "id": 1, "title": "Backend", "initialDate": "2024-01-01", "finishDate": "2024-03-01",
                  "status": 1, "recruiterId": 10, "departmentId": 5 }
            ],
            "vacancies": [
                { "id": 20, "title": "Rust Engineer", "numPositions": 2, "status": 1,
                  "location": "Remote", "recruiterId": 10, "openingDate": "2024-01-02" }
            ],
            "recruiters": [ { "id": 10, "name": "Joana", "occupation": "Recruiter" } ],
            "dates": [ { "id": 100, "date": "2024-01-02" } ],
            "candidates": [
                { "id": 1, "vacancyId": 20, "name": "A", "score": 80.0, "applyDate": "2024-01-05",
                  "status": 2, "updatedAt": "2024-01-15" },
                { "id": 2, "vacancyId": 99, "name": "Orphan", "score": 10.0, "applyDate": "2024-01-05",
                  "status": 0 }
            ],
            "facts": [
                { "id": 3, "processId": 1, "vacancyId": 20, "recruiterId": 10, "dateId": 100,
                  "candidatesApplied": 4, "candidatesInterviewed": 2, "candidatesHired": 1,
                  "hiringDurationDays": 10, "initialSalary": 3000,
                  "feedbackPositive": 1, "feedbackNeutral": 0, "feedbackNegative": 0 },
                { "id": 1, "processId": 1, "vacancyId": 20, "recruiterId": 10, "dateId": 100,
                  "candidatesApplied": 1, "candidatesInterviewed": 0, "candidatesHired": 0,
                  "hiringDurationDays": 0, "initialSalary": 0,
                  "feedbackPositive": 0, "feedbackNeutral": 0, "feedbackNegative": 0 },
                { "id": 2, "processId": 404, "vacancyId": 20, "recruiterId": 11, "dateId": 100,
                  "candidatesApplied": 0, "candidatesInterviewed": 0, "candidatesHired": 0,
                  "hiringDurationDays": 0, "initialSalary": 0,
                  "feedbackPositive": 0, "feedbackNeutral": 0, "feedbackNegative": 0 }
            ]
        })
    }

    fn warehouse() -> InMemoryWarehouse {
        let bytes = serde_json::to_vec(&snapshot()).expect("serializes");
        InMemoryWarehouse::from_json_reader(bytes.as_slice()).expect("snapshot loads")
    }

    #[test]
    fn facts_are_joined_and_ordered_by_id() {
        let warehouse = warehouse();
        let facts = warehouse
            .fetch(&FactQuery::all(), FetchWindow::all())
            .expect("fetch succeeds");

        let ids: Vec<_> = facts.iter().map(|fact| fact.fact.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let vacancy = facts[0].vacancy().expect("vacancy joined");
        assert_eq!(vacancy.candidates.len(), 1);
        assert_eq!(facts[0].date.as_ref().map(|date| date.month()), Some(1));
        assert!(facts[1].process.is_none());
        assert!(facts[1].recruiter.is_none());
    }

    #[test]
    fn joins_share_one_allocation_per_dimension() {
        let facts = warehouse()
            .fetch(&FactQuery::all(), FetchWindow::all())
            .expect("fetch succeeds");
        let first = facts[0].vacancy.as_ref().expect("joined");
        let last = facts[2].vacancy.as_ref().expect("joined");
        assert!(Arc::ptr_eq(first, last));
    }

    #[test]
    fn windows_and_counts_follow_the_query() {
        let warehouse = warehouse();
        let query = FactQuery::all().with(FactPredicate::ProcessIn([1].into_iter().collect()));

        assert_eq!(warehouse.count(&query).expect("count"), 2);
        let window = warehouse
            .fetch(&query, FetchWindow::page(1, 5))
            .expect("fetch succeeds");
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].fact.id, 3);

        let past_end = warehouse
            .fetch(&query, FetchWindow::page(10, 5))
            .expect("fetch succeeds");
        assert!(past_end.is_empty());
    }

    #[test]
    fn listings_are_sorted_by_id() {
        let warehouse = warehouse();
        let recruiters = warehouse.recruiters().expect("recruiters");
        assert_eq!(recruiters.len(), 1);
        assert_eq!(recruiters[0].name, "Joana");

        let query = ProcessQuery {
            departments: [6].into_iter().collect(),
            ..ProcessQuery::default()
        };
        assert!(warehouse.processes(&query).expect("processes").is_empty());
    }

    #[test]
    fn malformed_snapshot_is_a_parse_error() {
        let err = InMemoryWarehouse::from_json_reader(&b"{\"facts\": 3}"[..])
            .expect_err("rejects");
        assert!(matches!(err, WarehouseError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = InMemoryWarehouse::from_path("/nonexistent/warehouse.json").expect_err("fails");
        assert!(err.to_string().contains("/nonexistent/warehouse.json"));
    }
}
