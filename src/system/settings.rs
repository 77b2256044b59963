// src/system/settings.rs

use crate::core::paths::{self, PathError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while reading or writing `settings.toml`.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The config directory could not be located.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// The file is not valid settings TOML.
    #[error("Failed to parse settings.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// The defaults could not be written out.
    #[error("Failed to serialize settings to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// The shell used to run script command lines.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Shell executable.
    pub program: PathBuf,
    /// Arguments placed before the command line, such as `-c`.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        if cfg!(target_os = "windows") {
            Self {
                program: PathBuf::from("cmd"),
                args: vec!["/C".to_string()],
            }
        } else {
            Self {
                program: PathBuf::from("sh"),
                args: vec!["-c".to_string()],
            }
        }
    }
}

/// Global settings, stored in `settings.toml` in the pier config directory.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Print each command line before running it.
    #[serde(default = "default_echo_commands")]
    pub echo_commands: bool,
    /// Shell that runs script commands.
    #[serde(default)]
    pub shell: ShellConfig,
}

fn default_echo_commands() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            echo_commands: default_echo_commands(),
            shell: ShellConfig::default(),
        }
    }
}

/// Loads `settings.toml`, writing the defaults on first use.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&paths::get_settings_path()?)
}

/// Loads settings from an explicit path. A missing file is created with the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        let defaults = Settings::default();
        fs::write(path, toml::to_string_pretty(&defaults)?)?;
        log::debug!("Default settings written to '{}'.", path.display());
        return Ok(defaults);
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
