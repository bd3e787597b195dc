use std::collections::VecDeque;

use crate::{Settings, SettingsError, SettingsRepository, SettingsService, log};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: log::Repository> log::Service for Service<R> {
    fn get_log_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.repository.read_entries()
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    fn get_settings(&self) -> Result<Settings, SettingsError> {
        self.repository.read_settings()
    }

    fn set_settings(&self, settings: Settings) -> Result<(), SettingsError> {
        self.repository.write_settings(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ::log::Level;
    use pretty_assertions::assert_eq;

    use crate::log::{self, Service as _};

    use super::*;

    #[derive(Default)]
    struct Memory {
        entries: Mutex<VecDeque<log::Entry>>,
        settings: Mutex<Option<Settings>>,
    }

    impl log::Repository for Memory {
        fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
            Ok(self.entries.lock().unwrap().clone())
        }

        fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
            log::push_entry(&mut self.entries.lock().unwrap(), entry);
            Ok(())
        }
    }

    impl SettingsRepository for Memory {
        fn read_settings(&self) -> Result<Settings, SettingsError> {
            Ok(self.settings.lock().unwrap().clone().unwrap_or_default())
        }

        fn write_settings(&self, settings: Settings) -> Result<(), SettingsError> {
            *self.settings.lock().unwrap() = Some(settings);
            Ok(())
        }
    }

    #[test]
    fn test_log_entries() {
        let memory = Memory::default();
        for (level, message) in [(Level::Warn, "foo"), (Level::Error, "bar")] {
            log::Repository::write_entry(&memory, log::Entry::new(level, message.to_string()))
                .unwrap();
        }
        let service = Service::new(memory);
        assert_eq!(
            service
                .get_log_entries()
                .unwrap()
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>(),
            vec!["bar", "foo"]
        );
    }

    #[test]
    fn test_settings() {
        let service = Service::new(Memory::default());
        assert_eq!(service.get_settings().unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.set("default_total_reps", "12").unwrap();
        service.set_settings(settings.clone()).unwrap();

        assert_eq!(service.get_settings().unwrap(), settings);
    }
}
