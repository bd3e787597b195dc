use chrono::{DateTime, Utc};
use gymmemo_domain::{
    BodyPart, CreateError, ExerciseName, NameError, Reps, Weight, WorkoutRecord, WorkoutService,
};

use crate::Settings;

/// Entry form for a new workout record.
///
/// Reps are adjusted with a stepper bounded to 1..=100, the weight with a
/// slider bounded to 0..=200 kg in steps of 2.5 kg. The record is only
/// created on submit; a cancelled form leaves no trace.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutForm {
    exercise: String,
    total_reps: Reps,
    weight: Weight,
    body_part: BodyPart,
    date: Option<DateTime<Utc>>,
}

impl WorkoutForm {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            exercise: String::new(),
            total_reps: Reps::clamped(settings.default_total_reps),
            weight: Weight::snap(settings.default_weight),
            body_part: settings.default_body_part(),
            date: None,
        }
    }

    #[must_use]
    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    #[must_use]
    pub fn total_reps(&self) -> Reps {
        self.total_reps
    }

    #[must_use]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    #[must_use]
    pub fn body_part(&self) -> BodyPart {
        self.body_part
    }

    pub fn set_exercise(&mut self, exercise: &str) {
        exercise.clone_into(&mut self.exercise);
    }

    pub fn set_total_reps(&mut self, total_reps: u32) {
        self.total_reps = Reps::clamped(total_reps);
    }

    pub fn increment_total_reps(&mut self) {
        self.total_reps = self.total_reps.increment();
    }

    pub fn decrement_total_reps(&mut self) {
        self.total_reps = self.total_reps.decrement();
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = Weight::snap(weight);
    }

    pub fn set_body_part(&mut self, body_part: BodyPart) {
        self.body_part = body_part;
    }

    /// Date of the record. Defaults to the time of submission.
    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = Some(date);
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        ExerciseName::new(&self.exercise).is_ok()
    }

    pub fn submit(self, service: &impl WorkoutService) -> Result<WorkoutRecord, FormError> {
        let record = WorkoutRecord::new(
            ExerciseName::new(&self.exercise)?,
            self.total_reps,
            self.weight,
            self.body_part,
        );
        let record = match self.date {
            Some(date) => record.with_date(date),
            None => record,
        };
        Ok(service.create_workout_record(record)?)
    }

    pub fn cancel(self) {}
}

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Exercise(#[from] NameError),
    #[error(transparent)]
    Create(#[from] CreateError),
}
