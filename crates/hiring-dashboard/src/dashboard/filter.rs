//! Translation of the dashboard filter body into a conjunction of membership
//! predicates that any fact store can evaluate.

use super::domain::{DimensionId, JoinedFact};
use super::pagination::PageRequest;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

const DATE_LAYOUT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Filter body shared by the metrics and table endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactFilter {
    #[serde(default)]
    pub recruiters: Option<Vec<DimensionId>>,
    #[serde(default)]
    pub processes: Option<Vec<DimensionId>>,
    #[serde(default)]
    pub vacancies: Option<Vec<DimensionId>>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub process_status: Option<Vec<i32>>,
    #[serde(default)]
    pub vacancy_status: Option<Vec<i32>>,
    #[serde(default)]
    pub access_group: Option<Vec<DimensionId>>,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    StartDate,
    EndDate,
}

impl DateField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StartDate => "StartDate",
            Self::EndDate => "EndDate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("could not parse `{}` from '{value}': {source}", .field.label())]
    InvalidDate {
        field: DateField,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A single narrowing condition. Id and status sets are OR-ed internally;
/// the enclosing [`FactQuery`] AND-s predicates together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactPredicate {
    DepartmentIn(BTreeSet<DimensionId>),
    RecruiterIn(BTreeSet<DimensionId>),
    ProcessIn(BTreeSet<DimensionId>),
    VacancyIn(BTreeSet<DimensionId>),
    VacancyClosingOnOrAfter(NaiveDate),
    VacancyOpeningOnOrBefore(NaiveDate),
    ProcessStatusIn(BTreeSet<i32>),
    VacancyStatusIn(BTreeSet<i32>),
}

impl FactPredicate {
    pub fn matches(&self, fact: &JoinedFact) -> bool {
        let process = fact.process.as_deref();
        let vacancy = fact.vacancy.as_deref().map(|joined| &joined.dimension);

        match self {
            Self::DepartmentIn(ids) => process
                .and_then(|process| process.department_id)
                .is_some_and(|id| ids.contains(&id)),
            Self::RecruiterIn(ids) => fact
                .recruiter
                .as_deref()
                .is_some_and(|recruiter| ids.contains(&recruiter.id)),
            Self::ProcessIn(ids) => process.is_some_and(|process| ids.contains(&process.id)),
            Self::VacancyIn(ids) => vacancy.is_some_and(|vacancy| ids.contains(&vacancy.id)),
            Self::VacancyClosingOnOrAfter(start) => vacancy
                .and_then(|vacancy| vacancy.closing_date)
                .is_some_and(|closing| closing >= *start),
            Self::VacancyOpeningOnOrBefore(end) => {
                vacancy.is_some_and(|vacancy| vacancy.opening_date <= *end)
            }
            Self::ProcessStatusIn(codes) => {
                process.is_some_and(|process| codes.contains(&process.status))
            }
            Self::VacancyStatusIn(codes) => {
                vacancy.is_some_and(|vacancy| codes.contains(&vacancy.status))
            }
        }
    }
}

/// Logical query handle over the fact table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactQuery {
    predicates: Vec<FactPredicate>,
}

impl FactQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: FactPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[FactPredicate] {
        &self.predicates
    }

    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, fact: &JoinedFact) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(fact))
    }
}

/// Narrow `query` by every populated dimension of `filter`.
///
/// Dates are parsed before anything is applied, so a malformed date leaves no
/// half-built query behind.
pub fn apply_filters(query: FactQuery, filter: &FactFilter) -> Result<FactQuery, FilterError> {
    let (start, end) = match &filter.date_range {
        Some(range) => (
            parse_date(DateField::StartDate, range.start_date.as_deref())?,
            parse_date(DateField::EndDate, range.end_date.as_deref())?,
        ),
        None => (None, None),
    };

    let mut query = query;

    if let Some(ids) = non_empty(&filter.access_group) {
        query = query.with(FactPredicate::DepartmentIn(ids));
    }
    if let Some(ids) = non_empty(&filter.recruiters) {
        query = query.with(FactPredicate::RecruiterIn(ids));
    }
    if let Some(ids) = non_empty(&filter.processes) {
        query = query.with(FactPredicate::ProcessIn(ids));
    }
    if let Some(ids) = non_empty(&filter.vacancies) {
        query = query.with(FactPredicate::VacancyIn(ids));
    }
    if let Some(start) = start {
        query = query.with(FactPredicate::VacancyClosingOnOrAfter(start));
    }
    if let Some(end) = end {
        query = query.with(FactPredicate::VacancyOpeningOnOrBefore(end));
    }
    if let Some(codes) = non_empty(&filter.process_status) {
        query = query.with(FactPredicate::ProcessStatusIn(codes));
    }
    if let Some(codes) = non_empty(&filter.vacancy_status) {
        query = query.with(FactPredicate::VacancyStatusIn(codes));
    }

    debug!(predicates = query.predicates().len(), "built fact query");
    Ok(query)
}

fn parse_date(field: DateField, raw: Option<&str>) -> Result<Option<NaiveDate>, FilterError> {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(raw, DATE_LAYOUT)
        .map(Some)
        .map_err(|source| FilterError::InvalidDate {
            field,
            value: raw.to_string(),
            source,
        })
}

fn non_empty<T: Ord + Copy>(values: &Option<Vec<T>>) -> Option<BTreeSet<T>> {
    values
        .as_ref()
        .filter(|values| !values.is_empty())
        .map(|values| values.iter().copied().collect())
}
