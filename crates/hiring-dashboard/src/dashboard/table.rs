use serde::Serialize;

use super::domain::{JoinedFact, MissingDimension};
use super::metrics::average_hiring_time_for_vacancy;

/// One display row of the dashboard table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub process_title: String,
    pub vacancy_title: String,
    pub num_positions: i32,
    pub num_candidates_applied: i32,
    /// Applicants per open position, `null` when the vacancy has no positions.
    pub competition_rate: Option<f64>,
    pub num_interviewed: i32,
    pub num_hired: i32,
    pub average_hiring_time: Option<f64>,
    pub num_feedback: i32,
}

pub fn assemble_row(fact: &JoinedFact) -> Result<TableRow, MissingDimension> {
    let process = fact.process()?;
    let vacancy = fact.vacancy()?;
    let measures = &fact.fact;

    Ok(TableRow {
        process_title: process.title.clone(),
        vacancy_title: vacancy.dimension.title.clone(),
        num_positions: vacancy.dimension.num_positions,
        num_candidates_applied: measures.candidates_applied,
        competition_rate: competition_rate(
            measures.candidates_applied,
            vacancy.dimension.num_positions,
        ),
        num_interviewed: measures.candidates_interviewed,
        num_hired: measures.candidates_hired,
        average_hiring_time: average_hiring_time_for_vacancy(vacancy),
        num_feedback: measures.feedback_total(),
    })
}

pub fn competition_rate(applied: i32, positions: i32) -> Option<f64> {
    (positions > 0).then(|| f64::from(applied) / f64::from(positions))
}
