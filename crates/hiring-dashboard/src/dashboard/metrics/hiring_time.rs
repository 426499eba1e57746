use super::super::domain::JoinedVacancy;
use serde::ser::{Serialize, SerializeStruct, Serializer};

pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Running sum of hiring durations and the number of hires behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct HiringTimeTally {
    total_days: f64,
    hired: u32,
}

impl HiringTimeTally {
    pub(crate) fn record(&mut self, days: f64) {
        self.total_days += days;
        self.hired += 1;
    }

    pub(crate) fn extend(&mut self, durations: impl IntoIterator<Item = f64>) {
        for days in durations {
            self.record(days);
        }
    }

    /// `None` when nothing was recorded.
    pub(crate) fn average(&self) -> Option<f64> {
        (self.hired > 0).then(|| self.total_days / f64::from(self.hired))
    }
}

/// Average days-to-hire bucketed by the calendar month of the hire, with
/// years collapsed together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AverageHiringTimePerMonth {
    months: [f64; 12],
}

impl AverageHiringTimePerMonth {
    /// `month` is 1-based. Out-of-range months read as zero.
    pub fn month(&self, month: u32) -> f64 {
        month
            .checked_sub(1)
            .and_then(|index| self.months.get(index as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn as_array(&self) -> &[f64; 12] {
        &self.months
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        MONTH_NAMES.iter().copied().zip(self.months.iter().copied())
    }
}

impl Serialize for AverageHiringTimePerMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state =
            serializer.serialize_struct("AverageHiringTimePerMonth", MONTH_NAMES.len())?;
        for (name, value) in self.named() {
            state.serialize_field(name, &value)?;
        }
        state.end()
    }
}

pub fn average_hiring_time_per_month<'a, I>(vacancies: I) -> AverageHiringTimePerMonth
where
    I: IntoIterator<Item = &'a JoinedVacancy>,
{
    let mut buckets = [HiringTimeTally::default(); 12];

    for vacancy in vacancies {
        for candidate in &vacancy.candidates {
            if let (Some(days), Some(month)) =
                (candidate.hiring_duration_days(), candidate.hire_month_index())
            {
                buckets[month].record(days);
            }
        }
    }

    let mut months = [0.0; 12];
    for (slot, bucket) in months.iter_mut().zip(buckets.iter()) {
        *slot = bucket.average().unwrap_or(0.0);
    }

    AverageHiringTimePerMonth { months }
}

/// Average days-to-hire for one vacancy, `None` when nobody was hired.
pub fn average_hiring_time_for_vacancy(vacancy: &JoinedVacancy) -> Option<f64> {
    let mut tally = HiringTimeTally::default();
    tally.extend(vacancy.hired_durations());
    tally.average()
}
