//! Option listings for the dashboard filter pickers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{DimensionId, JoinedFact, ProcessDimension, RecruiterDimension};
use super::filter::{FactPredicate, FactQuery};
use super::pagination::PageRequest;
use super::repository::ProcessQuery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: DimensionId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterSuggestion {
    pub id: DimensionId,
    pub name: String,
}

impl From<RecruiterDimension> for RecruiterSuggestion {
    fn from(recruiter: RecruiterDimension) -> Self {
        Self {
            id: recruiter.id,
            name: recruiter.name,
        }
    }
}

/// Body of the process and vacancy suggestion endpoints. `filter_ids` holds
/// recruiter ids for processes and process ids for vacancies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub filter_ids: Option<Vec<DimensionId>>,
    #[serde(default)]
    pub departments: Option<Vec<DimensionId>>,
    #[serde(flatten)]
    pub page: PageRequest,
}

impl SuggestionRequest {
    pub fn process_query(&self) -> ProcessQuery {
        ProcessQuery {
            departments: self.departments.iter().flatten().copied().collect(),
            recruiters: self.filter_ids.iter().flatten().copied().collect(),
        }
    }

    pub fn vacancy_query(&self) -> FactQuery {
        let mut query = FactQuery::all();
        if let Some(ids) = self.filter_ids.as_ref().filter(|ids| !ids.is_empty()) {
            query = query.with(FactPredicate::ProcessIn(ids.iter().copied().collect()));
        }
        if let Some(ids) = self.departments.as_ref().filter(|ids| !ids.is_empty()) {
            query = query.with(FactPredicate::DepartmentIn(ids.iter().copied().collect()));
        }
        query
    }
}

/// Newest processes first.
pub fn process_suggestions(mut processes: Vec<ProcessDimension>) -> Vec<Suggestion> {
    processes.sort_by(|left, right| right.id.cmp(&left.id));
    processes
        .into_iter()
        .map(|process| Suggestion {
            id: process.id,
            title: process.title,
        })
        .collect()
}

/// Distinct vacancies referenced by `facts`, newest first.
pub fn vacancy_suggestions(facts: &[JoinedFact]) -> Vec<Suggestion> {
    let distinct: BTreeMap<DimensionId, &str> = facts
        .iter()
        .filter_map(|fact| fact.vacancy.as_deref())
        .map(|vacancy| (vacancy.dimension.id, vacancy.dimension.title.as_str()))
        .collect();

    distinct
        .into_iter()
        .rev()
        .map(|(id, title)| Suggestion {
            id,
            title: title.to_string(),
        })
        .collect()
}
