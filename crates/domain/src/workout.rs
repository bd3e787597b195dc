use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use derive_more::{Deref, Display, Into};
use log::warn;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseName, Query, ReadError, TodayStats, body_part_counts,
    today_stats,
};

pub trait WorkoutService {
    fn get_workout_records(&self, query: &Query) -> Result<Vec<WorkoutRecord>, ReadError>;
    fn create_workout_record(&self, record: WorkoutRecord) -> Result<WorkoutRecord, CreateError>;
    fn delete_workout_record(&self, id: WorkoutRecordID)
    -> Result<WorkoutRecordID, DeleteError>;

    fn get_today_stats(&self) -> Result<TodayStats, ReadError> {
        let records = self.get_workout_records(&Query::default())?;
        Ok(today_stats(&records, Local::now().date_naive()))
    }

    fn get_body_part_counts(&self) -> Result<BTreeMap<BodyPart, usize>, ReadError> {
        let records = self.get_workout_records(&Query::default())?;
        Ok(body_part_counts(&records))
    }
}

/// Persistence of workout records.
///
/// Implementations return records in no particular order. Ordering and
/// filtering are applied by the service.
pub trait WorkoutRepository {
    fn read_workout_records(&self) -> Result<Vec<WorkoutRecord>, ReadError>;
    fn create_workout_record(&self, record: WorkoutRecord) -> Result<WorkoutRecord, CreateError>;
    fn delete_workout_record(&self, id: WorkoutRecordID)
    -> Result<WorkoutRecordID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub id: WorkoutRecordID,
    pub exercise: ExerciseName,
    pub total_reps: Reps,
    pub weight: Weight,
    pub body_part: BodyPart,
    pub date: DateTime<Utc>,
}

impl WorkoutRecord {
    /// Create a record with a fresh id, dated now.
    #[must_use]
    pub fn new(
        exercise: ExerciseName,
        total_reps: Reps,
        weight: Weight,
        body_part: BodyPart,
    ) -> Self {
        Self {
            id: WorkoutRecordID::new(),
            exercise,
            total_reps,
            weight,
            body_part,
            date: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Calendar day of the record in the local timezone.
    #[must_use]
    pub fn local_date(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let reps = u32::from(self.total_reps) as f32;
        reps * f32::from(self.weight)
    }
}

#[derive(Deref, Debug, Default, Display, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutRecordID(Uuid);

impl WorkoutRecordID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl From<Uuid> for WorkoutRecordID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutRecordID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

impl TryFrom<&str> for WorkoutRecordID {
    type Error = uuid::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self(Uuid::parse_str(value.trim())?))
    }
}

#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub const MIN: Reps = Reps(1);
    pub const MAX: Reps = Reps(100);

    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Clamp `value` to the valid range.
    #[must_use]
    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Decode a persisted value, clamping it to the valid range.
    #[must_use]
    pub fn decode(value: u32) -> Self {
        Self::new(value).unwrap_or_else(|err| {
            let reps = Self::clamped(value);
            warn!("invalid total reps {value} ({err}), using {reps}");
            reps
        })
    }

    #[must_use]
    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MAX.0))
    }

    #[must_use]
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN.0))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 1 to 100")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Weight in kilograms.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub const MAX: f32 = 200.0;
    pub const STEP: f32 = 2.5;

    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..=Self::MAX).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        if (value / Self::STEP).fract().abs() > f32::EPSILON {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }

    /// Clamp `value` to the valid range and round it to the nearest step.
    #[must_use]
    pub fn snap(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self((value.clamp(0.0, Self::MAX) / Self::STEP).round() * Self::STEP)
    }

    /// Decode a persisted value, snapping it to the nearest valid weight.
    #[must_use]
    pub fn decode(value: f32) -> Self {
        Self::new(value).unwrap_or_else(|err| {
            let weight = Self::snap(value);
            warn!("invalid weight {value} ({err}), using {weight}");
            weight
        })
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.replace(',', ".").trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 200.0 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 2.5 kg")]
    InvalidResolution,
    #[error("Weight must be a decimal")]
    ParseError,
}

#[derive(
    AsRefStr,
    StrumDisplay,
    EnumIter,
    EnumString,
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BodyPart {
    #[default]
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Abs,
}

impl BodyPart {
    /// Decode a persisted label, falling back to [`BodyPart::Chest`] for
    /// labels that match no body part.
    #[must_use]
    pub fn decode(label: &str) -> Self {
        BodyPart::iter()
            .find(|body_part| body_part.as_ref() == label)
            .unwrap_or_else(|| {
                warn!("unknown body part label {label:?}, using {}", BodyPart::Chest);
                BodyPart::Chest
            })
    }
}
