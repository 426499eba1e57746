use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Surrogate key shared by every warehouse dimension.
pub type DimensionId = i64;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Open,
    InProgress,
    Closed,
}

impl ProcessStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Open, Self::InProgress, Self::Closed]
    }

    /// Ordinal persisted in the warehouse.
    pub const fn code(self) -> i32 {
        match self {
            Self::Open => 1,
            Self::InProgress => 2,
            Self::Closed => 3,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Open),
            2 => Some(Self::InProgress),
            3 => Some(Self::Closed),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyStatus {
    Open,
    InAnalysis,
    Closed,
}

impl VacancyStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Open, Self::InAnalysis, Self::Closed]
    }

    /// Ordinal persisted in the warehouse.
    pub const fn code(self) -> i32 {
        match self {
            Self::Open => 1,
            Self::InAnalysis => 2,
            Self::Closed => 3,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Open),
            2 => Some(Self::InAnalysis),
            3 => Some(Self::Closed),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InAnalysis => "In Analysis",
            Self::Closed => "Closed",
        }
    }
}

/// Candidate funnel position. Unlike process and vacancy statuses the ordinal
/// starts at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum CandidateStatus {
    InAnalysis,
    Interview,
    Hired,
    Rejected,
}

impl CandidateStatus {
    pub const fn code(self) -> i32 {
        match self {
            Self::InAnalysis => 0,
            Self::Interview => 1,
            Self::Hired => 2,
            Self::Rejected => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InAnalysis => "In Analysis",
            Self::Interview => "Interview",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
        }
    }
}

impl TryFrom<i32> for CandidateStatus {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::InAnalysis),
            1 => Ok(Self::Interview),
            2 => Ok(Self::Hired),
            3 => Ok(Self::Rejected),
            other => Err(format!("unknown candidate status code {other}")),
        }
    }
}

impl From<CandidateStatus> for i32 {
    fn from(status: CandidateStatus) -> Self {
        status.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDimension {
    pub id: DimensionId,
    pub title: String,
    pub initial_date: NaiveDate,
    pub finish_date: NaiveDate,
    /// Raw ordinal, see [`ProcessStatus::from_code`].
    pub status: i32,
    pub recruiter_id: DimensionId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department_id: Option<DimensionId>,
}

impl ProcessDimension {
    pub fn status(&self) -> Option<ProcessStatus> {
        ProcessStatus::from_code(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyDimension {
    pub id: DimensionId,
    pub title: String,
    pub num_positions: i32,
    #[serde(default)]
    pub requisition_id: Option<i64>,
    /// Raw ordinal, see [`VacancyStatus::from_code`].
    pub status: i32,
    pub location: String,
    pub recruiter_id: DimensionId,
    pub opening_date: NaiveDate,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
}

impl VacancyDimension {
    pub fn status(&self) -> Option<VacancyStatus> {
        VacancyStatus::from_code(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: DimensionId,
    pub vacancy_id: DimensionId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub score: f64,
    pub apply_date: NaiveDate,
    pub status: CandidateStatus,
    /// Only set once the candidate has moved past the analysis stage.
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

impl Candidate {
    /// Fractional days between application and hire. `None` unless the
    /// candidate is hired and carries an `updated_at` date.
    pub fn hiring_duration_days(&self) -> Option<f64> {
        if self.status != CandidateStatus::Hired {
            return None;
        }
        let updated_at = self.updated_at?;
        let elapsed = updated_at.signed_duration_since(self.apply_date);
        Some(elapsed.num_seconds() as f64 / SECONDS_PER_DAY)
    }

    /// Zero-based month index of the hire date.
    pub fn hire_month_index(&self) -> Option<usize> {
        if self.status != CandidateStatus::Hired {
            return None;
        }
        self.updated_at.map(|date| date.month0() as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterDimension {
    pub id: DimensionId,
    pub name: String,
    #[serde(default)]
    pub occupation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDimension {
    pub id: DimensionId,
    pub date: NaiveDate,
}

impl DateDimension {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// One row of the hiring-funnel measure table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactRecord {
    pub id: DimensionId,
    pub process_id: DimensionId,
    pub vacancy_id: DimensionId,
    pub recruiter_id: DimensionId,
    pub date_id: DimensionId,
    pub candidates_applied: i32,
    pub candidates_interviewed: i32,
    pub candidates_hired: i32,
    pub hiring_duration_days: i32,
    pub initial_salary: i64,
    pub feedback_positive: i32,
    pub feedback_neutral: i32,
    pub feedback_negative: i32,
}

impl FactRecord {
    pub fn feedback_total(&self) -> i32 {
        self.feedback_positive + self.feedback_neutral + self.feedback_negative
    }
}

/// Vacancy dimension together with the candidates that applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedVacancy {
    pub dimension: VacancyDimension,
    pub candidates: Vec<Candidate>,
}

impl JoinedVacancy {
    pub fn hired_durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.candidates
            .iter()
            .filter_map(Candidate::hiring_duration_days)
    }
}

/// A fact eagerly joined with its dimensions. A `None` join means the
/// referenced dimension row could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedFact {
    pub fact: FactRecord,
    pub process: Option<Arc<ProcessDimension>>,
    pub vacancy: Option<Arc<JoinedVacancy>>,
    pub recruiter: Option<Arc<RecruiterDimension>>,
    pub date: Option<Arc<DateDimension>>,
}

impl JoinedFact {
    pub fn process(&self) -> Result<&ProcessDimension, MissingDimension> {
        self.process
            .as_deref()
            .ok_or_else(|| MissingDimension::new(self.fact.id, DimensionKind::Process))
    }

    pub fn vacancy(&self) -> Result<&JoinedVacancy, MissingDimension> {
        self.vacancy
            .as_deref()
            .ok_or_else(|| MissingDimension::new(self.fact.id, DimensionKind::Vacancy))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    Process,
    Vacancy,
    Recruiter,
    Date,
}

impl DimensionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Process => "DimProcess",
            Self::Vacancy => "DimVacancy",
            Self::Recruiter => "DimUser",
            Self::Date => "DimDatetime",
        }
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fact is missing a join that the caller depends on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("nil `{dimension}` for `FactHiringProcess` with ID {fact_id}")]
pub struct MissingDimension {
    pub fact_id: DimensionId,
    pub dimension: DimensionKind,
}

impl MissingDimension {
    pub fn new(fact_id: DimensionId, dimension: DimensionKind) -> Self {
        Self { fact_id, dimension }
    }
}
