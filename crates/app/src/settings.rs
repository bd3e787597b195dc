use gymmemo_domain::{BodyPart, Reps, Weight};
use log::LevelFilter;

use crate::log::LevelFilterDef;

#[allow(clippy::missing_errors_doc)]
pub trait SettingsService {
    fn get_settings(&self) -> Result<Settings, SettingsError>;
    fn set_settings(&self, settings: Settings) -> Result<(), SettingsError>;
}

#[allow(clippy::missing_errors_doc)]
pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, SettingsError>;
    fn write_settings(&self, settings: Settings) -> Result<(), SettingsError>;
}

/// User preferences. Missing fields in persisted settings take their
/// default value.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub default_total_reps: u32,
    pub default_weight: f32,
    pub default_body_part: String,
    #[serde(with = "LevelFilterDef")]
    pub log_level: LevelFilter,
}

impl Settings {
    pub const KEYS: [&'static str; 4] = [
        "default_total_reps",
        "default_weight",
        "default_body_part",
        "log_level",
    ];

    #[must_use]
    pub fn default_body_part(&self) -> BodyPart {
        BodyPart::decode(&self.default_body_part)
    }

    /// Change a single setting given as text.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidValue {
            key: key.to_string(),
            reason,
        };
        match key {
            "default_total_reps" => {
                self.default_total_reps = Reps::try_from(value)
                    .map_err(|err| invalid(err.to_string()))?
                    .into();
            }
            "default_weight" => {
                self.default_weight = Weight::try_from(value)
                    .map_err(|err| invalid(err.to_string()))?
                    .into();
            }
            "default_body_part" => {
                let body_part = value
                    .trim()
                    .parse::<BodyPart>()
                    .map_err(|err| invalid(err.to_string()))?;
                self.default_body_part = body_part.to_string();
            }
            "log_level" => {
                self.log_level = value
                    .trim()
                    .parse::<LevelFilter>()
                    .map_err(|err| invalid(err.to_string()))?;
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_total_reps" => Some(self.default_total_reps.to_string()),
            "default_weight" => Some(format!("{:.1}", self.default_weight)),
            "default_body_part" => Some(self.default_body_part().to_string()),
            "log_level" => Some(self.log_level.as_str().to_lowercase()),
            _ => None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_total_reps: 10,
            default_weight: 40.0,
            default_body_part: BodyPart::Chest.to_string(),
            log_level: LevelFilter::Warn,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown setting {0:?}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("{0}")]
    Storage(String),
}
