use std::cmp::Ordering;

use chrono::NaiveDate;
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{BodyPart, WorkoutRecord};

#[derive(AsRefStr, EnumIter, EnumString, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortKey {
    #[default]
    Date,
    Exercise,
    TotalReps,
    Weight,
    BodyPart,
}

#[derive(AsRefStr, EnumIter, EnumString, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum Order {
    #[strum(serialize = "asc")]
    Ascending,
    #[default]
    #[strum(serialize = "desc")]
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    BodyPart(BodyPart),
    /// Records on the given calendar day in the local timezone.
    Day(NaiveDate),
    /// Case-insensitive substring of the exercise name.
    Exercise(String),
}

impl Filter {
    #[must_use]
    pub fn matches(&self, record: &WorkoutRecord) -> bool {
        match self {
            Filter::BodyPart(body_part) => record.body_part == *body_part,
            Filter::Day(day) => record.local_date() == *day,
            Filter::Exercise(text) => record
                .exercise
                .as_str()
                .to_lowercase()
                .contains(&text.to_lowercase()),
        }
    }
}

/// Sort order and optional filter for reading workout records.
///
/// The default query returns all records, most recent first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query {
    pub sort: SortKey,
    pub order: Order,
    pub filter: Option<Filter>,
}

impl Query {
    #[must_use]
    pub fn new(sort: SortKey, order: Order) -> Self {
        Self {
            sort,
            order,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Filter and sort `records`. Records with equal sort keys keep their
    /// relative order.
    #[must_use]
    pub fn apply(&self, records: Vec<WorkoutRecord>) -> Vec<WorkoutRecord> {
        let mut records = records
            .into_iter()
            .filter(|r| self.filter.as_ref().is_none_or(|f| f.matches(r)))
            .collect::<Vec<_>>();
        records.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.order {
                Order::Ascending => ordering,
                Order::Descending => ordering.reverse(),
            }
        });
        records
    }

    fn compare(&self, a: &WorkoutRecord, b: &WorkoutRecord) -> Ordering {
        match self.sort {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Exercise => a
                .exercise
                .as_str()
                .to_lowercase()
                .cmp(&b.exercise.as_str().to_lowercase()),
            SortKey::TotalReps => a.total_reps.cmp(&b.total_reps),
            SortKey::Weight => f32::from(a.weight).total_cmp(&f32::from(b.weight)),
            SortKey::BodyPart => a.body_part.cmp(&b.body_part),
        }
    }
}
