use derive_more::{AsRef, Display};
use log::warn;

/// Display name of an exercise, e.g. "Bench Press".
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseName(String);

impl ExerciseName {
    pub const UNNAMED: &'static str = "Unnamed";

    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        Ok(ExerciseName(trimmed_name.to_string()))
    }

    /// Decode a persisted name, falling back to [`ExerciseName::UNNAMED`]
    /// for blank names.
    #[must_use]
    pub fn decode(name: &str) -> Self {
        Self::new(name).unwrap_or_else(|err| {
            warn!("invalid exercise name {name:?} ({err}), using {:?}", Self::UNNAMED);
            ExerciseName(Self::UNNAMED.to_string())
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
}
