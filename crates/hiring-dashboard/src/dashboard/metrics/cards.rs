use super::super::domain::{JoinedFact, MissingDimension, ProcessDimension, ProcessStatus};
use super::hiring_time::HiringTimeTally;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::debug;

/// An open process is flagged once less than this share of its lifetime remains.
pub const DEADLINE_WARNING_PERCENT: i32 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
    pub approaching_deadline: usize,
    /// Whole days, rounded down.
    pub average_hiring_time: i64,
}

pub fn compute_card_info(
    facts: &[JoinedFact],
    now: DateTime<Utc>,
) -> Result<CardInfo, MissingDimension> {
    let mut cards = CardInfo::default();
    let mut hiring = HiringTimeTally::default();

    for fact in facts {
        let process = fact.process()?;

        match process.status() {
            Some(ProcessStatus::Open) => {
                cards.open += 1;
                if is_approaching_deadline(process, now) {
                    cards.approaching_deadline += 1;
                }
            }
            Some(ProcessStatus::InProgress) => cards.in_progress += 1,
            Some(ProcessStatus::Closed) => cards.closed += 1,
            None => debug!(
                process_id = process.id,
                code = process.status,
                "process status outside known range"
            ),
        }

        if let Some(vacancy) = fact.vacancy.as_deref() {
            hiring.extend(vacancy.hired_durations());
        }
    }

    cards.average_hiring_time = hiring
        .average()
        .map(|days| days.floor() as i64)
        .unwrap_or(0);

    Ok(cards)
}

/// True for open processes whose time left is under
/// [`DEADLINE_WARNING_PERCENT`] of the span between initial and finish date.
pub fn is_approaching_deadline(process: &ProcessDimension, now: DateTime<Utc>) -> bool {
    if process.status() != Some(ProcessStatus::Open) {
        return false;
    }

    let initial = start_of_day(process.initial_date);
    let finish = start_of_day(process.finish_date);
    let lifetime = finish - initial;
    let remaining = finish - now;

    remaining < lifetime * DEADLINE_WARNING_PERCENT / 100
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
