// src/core/paths.rs

use crate::constants::{CATALOGUE_FILENAME, CONFIG_DIR_ENV, SETTINGS_FILENAME};
use lazy_static::lazy_static;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref PIER_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors locating the config directory or resolving a user path.
#[derive(Error, Debug)]
pub enum PathError {
    /// The OS reports no config directory and no override is set.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The config directory did not exist and could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// Directory that could not be created.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// `~` or a `$VAR` in the path could not be expanded.
    #[error("Failed to expand path '{path}': {reason}")]
    Expansion {
        /// Path as typed.
        path: String,
        /// Why expansion failed.
        reason: String,
    },
    /// The expanded path does not resolve to an existing entry.
    #[error("Path '{path}' does not exist or is not accessible: {source}")]
    Canonicalize {
        /// Expanded path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns the pier configuration directory, creating it if needed.
///
/// `$PIER_CONFIG_DIR` takes precedence over `<system config dir>/pier`.
/// The result is memoized for the lifetime of the process.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = PIER_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = config_dir_from(std::env::var_os(CONFIG_DIR_ENV), dirs::config_dir())?;
    ensure_dir(&config_path)?;

    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Picks the config directory from an explicit override or the system default.
fn config_dir_from(
    override_dir: Option<OsString>,
    system_config_dir: Option<PathBuf>,
) -> Result<PathBuf, PathError> {
    match override_dir.filter(|dir| !dir.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => system_config_dir
            .map(|dir| dir.join("pier"))
            .ok_or(PathError::ConfigDirNotFound),
    }
}

fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| PathError::ConfigDirCreation {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

/// Path of the persisted catalogue.
pub fn get_catalogue_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(CATALOGUE_FILENAME))
}

/// Path of the global settings file.
pub fn get_settings_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Expands `~` and environment variables in a user-supplied path and
/// canonicalizes the result. The path must exist.
pub fn resolve_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    canonicalize(Path::new(expanded.as_ref()))
}

/// Canonicalizes a path without the `\\?\` prefix on Windows.
pub fn canonicalize(path: &Path) -> Result<PathBuf, PathError> {
    dunce::canonicalize(path).map_err(|e| PathError::Canonicalize {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_override_wins() {
        let dir = config_dir_from(
            Some(OsString::from("/tmp/pier-test")),
            Some(PathBuf::from("/home/me/.config")),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/pier-test"));
    }

    #[test]
    fn test_config_dir_falls_back_to_system_dir() {
        let dir = config_dir_from(None, Some(PathBuf::from("/home/me/.config"))).unwrap();
        assert_eq!(dir, PathBuf::from("/home/me/.config/pier"));

        // An empty override is ignored.
        let dir = config_dir_from(Some(OsString::new()), Some(PathBuf::from("/cfg"))).unwrap();
        assert_eq!(dir, PathBuf::from("/cfg/pier"));
    }

    #[test]
    fn test_config_dir_not_found() {
        let result = config_dir_from(None, None);
        assert!(matches!(result, Err(PathError::ConfigDirNotFound)));
    }

    #[test]
    fn test_resolve_user_path_canonicalizes_existing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("api");
        fs::create_dir(&nested).unwrap();

        let raw = format!("{}/../api", nested.display());
        let resolved = resolve_user_path(&raw).unwrap();
        assert_eq!(resolved, dunce::canonicalize(&nested).unwrap());
    }

    #[test]
    fn test_resolve_user_path_missing_dir_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope");
        let result = resolve_user_path(&missing.display().to_string());
        assert!(matches!(result, Err(PathError::Canonicalize { .. })));
    }
}
