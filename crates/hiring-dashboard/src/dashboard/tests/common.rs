use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use crate::config::ErrorVerbosity;
use crate::dashboard::domain::{
    Candidate, CandidateStatus, DateDimension, DimensionId, FactRecord, JoinedFact,
    ProcessDimension, ProcessStatus, RecruiterDimension, VacancyDimension, VacancyStatus,
};
use crate::dashboard::filter::FactQuery;
use crate::dashboard::repository::{FactRepository, FetchWindow, ProcessQuery, RepositoryError};
use crate::dashboard::warehouse::{InMemoryWarehouse, WarehouseSnapshot};
use crate::dashboard::{dashboard_router, DashboardService};

pub(super) const TEST_TIMEOUT: Duration = Duration::from_secs(2);

pub(super) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub(super) fn now() -> DateTime<Utc> {
    date("2024-06-15").and_time(NaiveTime::MIN).and_utc()
}

fn process(
    id: DimensionId,
    status: ProcessStatus,
    window: (&str, &str),
    recruiter_id: DimensionId,
    department_id: DimensionId,
) -> ProcessDimension {
    ProcessDimension {
        id,
        title: format!("Process {id}"),
        initial_date: date(window.0),
        finish_date: date(window.1),
        status: status.code(),
        recruiter_id,
        description: None,
        department_id: Some(department_id),
    }
}

fn vacancy(
    id: DimensionId,
    status: VacancyStatus,
    num_positions: i32,
    opening: &str,
    closing: Option<&str>,
) -> VacancyDimension {
    VacancyDimension {
        id,
        title: format!("Vacancy {id}"),
        num_positions,
        requisition_id: Some(1_000 + id),
        status: status.code(),
        location: "Lisbon".to_string(),
        recruiter_id: 100,
        opening_date: date(opening),
        closing_date: closing.map(date),
    }
}

fn candidate(
    id: DimensionId,
    vacancy_id: DimensionId,
    status: CandidateStatus,
    apply: &str,
    updated: Option<&str>,
) -> Candidate {
    Candidate {
        id,
        vacancy_id,
        name: format!("Candidate {id}"),
        email: format!("candidate{id}@example.com"),
        phone: String::new(),
        score: 70.0,
        apply_date: date(apply),
        status,
        updated_at: updated.map(date),
    }
}

fn fact(
    id: DimensionId,
    process_id: DimensionId,
    vacancy_id: DimensionId,
    recruiter_id: DimensionId,
    funnel: (i32, i32, i32),
) -> FactRecord {
    FactRecord {
        id,
        process_id,
        vacancy_id,
        recruiter_id,
        date_id: 1,
        candidates_applied: funnel.0,
        candidates_interviewed: funnel.1,
        candidates_hired: funnel.2,
        hiring_duration_days: 0,
        initial_salary: 5_000,
        feedback_positive: 1,
        feedback_neutral: 1,
        feedback_negative: 0,
    }
}

/// Three facts, one per process status, each with a single hire:
/// 10 and 15 days in March, 20 days in October.
pub(super) fn snapshot() -> WarehouseSnapshot {
    WarehouseSnapshot {
        processes: vec![
            // 12 day lifetime with 2 days left
            process(1, ProcessStatus::Open, ("2024-06-05", "2024-06-17"), 100, 10),
            process(2, ProcessStatus::InProgress, ("2024-05-31", "2024-06-10"), 101, 10),
            process(3, ProcessStatus::Closed, ("2024-05-16", "2024-05-26"), 100, 20),
        ],
        vacancies: vec![
            vacancy(1, VacancyStatus::Open, 2, "2024-05-01", Some("2024-07-01")),
            vacancy(2, VacancyStatus::InAnalysis, 0, "2024-05-10", None),
            vacancy(3, VacancyStatus::Closed, 4, "2024-04-01", Some("2024-05-20")),
        ],
        recruiters: vec![
            RecruiterDimension {
                id: 100,
                name: "Ana".to_string(),
                occupation: "Tech recruiter".to_string(),
            },
            RecruiterDimension {
                id: 101,
                name: "Bruno".to_string(),
                occupation: "Sourcer".to_string(),
            },
        ],
        dates: vec![DateDimension {
            id: 1,
            date: date("2024-05-01"),
        }],
        candidates: vec![
            candidate(1, 1, CandidateStatus::Hired, "2024-03-01", Some("2024-03-11")),
            candidate(2, 1, CandidateStatus::Interview, "2024-03-02", Some("2024-03-05")),
            candidate(3, 2, CandidateStatus::Hired, "2024-03-01", Some("2024-03-16")),
            candidate(4, 3, CandidateStatus::Hired, "2024-10-01", Some("2024-10-21")),
            candidate(5, 3, CandidateStatus::Rejected, "2024-10-01", Some("2024-10-02")),
            candidate(6, 3, CandidateStatus::InAnalysis, "2024-10-03", None),
        ],
        facts: vec![
            fact(1, 1, 1, 100, (10, 4, 1)),
            fact(2, 2, 2, 101, (5, 2, 1)),
            fact(3, 3, 3, 100, (8, 3, 1)),
        ],
    }
}

/// Same data plus a fact whose process row does not exist.
pub(super) fn snapshot_with_dangling_process() -> WarehouseSnapshot {
    let mut snapshot = snapshot();
    snapshot.facts.push(fact(4, 999, 1, 100, (1, 0, 0)));
    snapshot
}

pub(super) fn snapshot_with_bad_vacancy_status() -> WarehouseSnapshot {
    let mut snapshot = snapshot();
    snapshot.vacancies[2].status = 9;
    snapshot
}

pub(super) fn warehouse_service() -> DashboardService<InMemoryWarehouse> {
    service_over(snapshot())
}

pub(super) fn service_over(snapshot: WarehouseSnapshot) -> DashboardService<InMemoryWarehouse> {
    DashboardService::new(
        Arc::new(InMemoryWarehouse::from_snapshot(snapshot)),
        TEST_TIMEOUT,
    )
}

pub(super) fn router_over<R>(service: DashboardService<R>, verbosity: ErrorVerbosity) -> axum::Router
where
    R: FactRepository + 'static,
{
    dashboard_router(Arc::new(service), verbosity)
}

pub(super) struct UnavailableRepository;

impl FactRepository for UnavailableRepository {
    fn count(&self, _query: &FactQuery) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("warehouse offline".to_string()))
    }

    fn fetch(
        &self,
        _query: &FactQuery,
        _window: FetchWindow,
    ) -> Result<Vec<JoinedFact>, RepositoryError> {
        Err(RepositoryError::Unavailable("warehouse offline".to_string()))
    }

    fn recruiters(&self) -> Result<Vec<RecruiterDimension>, RepositoryError> {
        Err(RepositoryError::Unavailable("warehouse offline".to_string()))
    }

    fn processes(&self, _query: &ProcessQuery) -> Result<Vec<ProcessDimension>, RepositoryError> {
        Err(RepositoryError::Unavailable("warehouse offline".to_string()))
    }
}

/// Answers correctly, but only after `delay`.
pub(super) struct SlowRepository {
    pub(super) inner: InMemoryWarehouse,
    pub(super) delay: Duration,
}

impl FactRepository for SlowRepository {
    fn count(&self, query: &FactQuery) -> Result<usize, RepositoryError> {
        thread::sleep(self.delay);
        self.inner.count(query)
    }

    fn fetch(
        &self,
        query: &FactQuery,
        window: FetchWindow,
    ) -> Result<Vec<JoinedFact>, RepositoryError> {
        thread::sleep(self.delay);
        self.inner.fetch(query, window)
    }

    fn recruiters(&self) -> Result<Vec<RecruiterDimension>, RepositoryError> {
        thread::sleep(self.delay);
        self.inner.recruiters()
    }

    fn processes(&self, query: &ProcessQuery) -> Result<Vec<ProcessDimension>, RepositoryError> {
        thread::sleep(self.delay);
        self.inner.processes(query)
    }
}

pub(super) struct PanickingRepository;

impl FactRepository for PanickingRepository {
    fn count(&self, _query: &FactQuery) -> Result<usize, RepositoryError> {
        panic!("driver crashed")
    }

    fn fetch(
        &self,
        _query: &FactQuery,
        _window: FetchWindow,
    ) -> Result<Vec<JoinedFact>, RepositoryError> {
        panic!("driver crashed")
    }

    fn recruiters(&self) -> Result<Vec<RecruiterDimension>, RepositoryError> {
        panic!("driver crashed")
    }

    fn processes(&self, _query: &ProcessQuery) -> Result<Vec<ProcessDimension>, RepositoryError> {
        panic!("driver crashed")
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
