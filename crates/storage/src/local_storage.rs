use std::{collections::VecDeque, path::PathBuf};

use gymmemo_app::{Settings, SettingsError, SettingsRepository, log};

use crate::{Store, read_json, write_json};

/// User preferences in `settings.json` and the most recent log entries in
/// `log.json`.
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SettingsRepository for LocalStorage {
    fn read_settings(&self) -> Result<Settings, SettingsError> {
        read_json(&Store::Settings.path(&self.dir))
            .map(Option::unwrap_or_default)
            .map_err(|err| SettingsError::Storage(err.to_string()))
    }

    fn write_settings(&self, settings: Settings) -> Result<(), SettingsError> {
        write_json(&Store::Settings.path(&self.dir), &settings)
            .map_err(|err| SettingsError::Storage(err.to_string()))
    }
}

impl log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        read_json(&Store::Log.path(&self.dir))
            .map(Option::unwrap_or_default)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry);
        write_json(&Store::Log.path(&self.dir), &entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
