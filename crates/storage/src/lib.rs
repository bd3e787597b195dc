#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use gymmemo_domain as domain;
use strum::AsRefStr;

pub mod json_file;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;

pub use json_file::JsonFile;
pub use local_storage::LocalStorage;

/// Files kept in the data directory.
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    #[strum(serialize = "records.json")]
    Records,
    #[strum(serialize = "settings.json")]
    Settings,
    #[strum(serialize = "log.json")]
    Log,
}

impl Store {
    #[must_use]
    pub fn path(self, dir: &Path) -> PathBuf {
        dir.join(self.as_ref())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl From<StorageError> for domain::StorageError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Io(err) => domain::StorageError::Io(err),
            StorageError::Serde(err) => domain::StorageError::Corrupt(err.to_string()),
        }
    }
}

/// Read a JSON file. A missing file yields `None`.
pub fn read_json<T>(path: &Path) -> Result<Option<T>, StorageError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    match fs::read(path) {
        Ok(content) => Ok(Some(serde_json::from_slice(&content)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Write a JSON file, creating the parent directory if necessary.
///
/// The content is written to a temporary file first and then renamed, so
/// the previous content stays intact if writing fails.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
