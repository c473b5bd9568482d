//! Store configuration.
//!
//! Resolves where the document file lives: an explicit path, the `PRESSDB_PATH`
//! environment variable, or the platform data directory.

use crate::Result;
use crate::constants::{DEFAULT_FILE_NAME, PATH_ENV_VAR};
use directories::ProjectDirs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Location of the persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Uses `PRESSDB_PATH` if it is set and non-empty, otherwise the default location.
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::var_os(PATH_ENV_VAR))
    }

    /// `db.json` inside the per-user data directory of the application.
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "pressdb", "PressDB").ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            )
        })?;
        Ok(Self::new(dirs.data_dir().join(DEFAULT_FILE_NAME)))
    }

    pub(crate) fn resolve(override_path: Option<OsString>) -> Result<Self> {
        match override_path.filter(|p| !p.is_empty()) {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_location(),
        }
    }
}
