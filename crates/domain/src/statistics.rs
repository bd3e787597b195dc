use std::collections::BTreeMap;

use chrono::NaiveDate;
use strum::IntoEnumIterator;

use crate::{BodyPart, WorkoutRecord};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TodayStats {
    pub exercise_count: usize,
    pub total_reps: u32,
    pub volume: f32,
}

/// Records dated on `day` in the local timezone, in their original order.
#[must_use]
pub fn records_on(records: &[WorkoutRecord], day: NaiveDate) -> Vec<&WorkoutRecord> {
    records.iter().filter(|r| r.local_date() == day).collect()
}

#[must_use]
pub fn todays_records(records: &[WorkoutRecord], today: NaiveDate) -> Vec<&WorkoutRecord> {
    records_on(records, today)
}

#[must_use]
pub fn today_stats(records: &[WorkoutRecord], today: NaiveDate) -> TodayStats {
    let todays_records = todays_records(records, today);
    TodayStats {
        exercise_count: todays_records.len(),
        total_reps: total_reps(todays_records.iter().copied()),
        volume: total_volume(todays_records.iter().copied()),
    }
}

#[must_use]
pub fn total_reps<'a>(records: impl IntoIterator<Item = &'a WorkoutRecord>) -> u32 {
    records
        .into_iter()
        .map(|r| u32::from(r.total_reps))
        .sum()
}

/// Sum of reps × weight in kg.
#[must_use]
pub fn total_volume<'a>(records: impl IntoIterator<Item = &'a WorkoutRecord>) -> f32 {
    records.into_iter().map(WorkoutRecord::volume).sum()
}

/// Number of records per body part. Every body part is present in the
/// result, with a count of zero if no record exists.
#[must_use]
pub fn body_part_counts(records: &[WorkoutRecord]) -> BTreeMap<BodyPart, usize> {
    BodyPart::iter()
        .map(|body_part| {
            (
                body_part,
                records.iter().filter(|r| r.body_part == body_part).count(),
            )
        })
        .collect()
}
