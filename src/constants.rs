// src/constants.rs

/// The name of a project's descriptor file, at the project root.
pub const PROJECT_DESCRIPTOR_FILENAME: &str = "pier.toml";

/// The name of the persisted catalogue (in the pier config directory).
pub const CATALOGUE_FILENAME: &str = "catalogue.bin";

/// The name of the global settings file (in the pier config directory).
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Environment variable that overrides the pier config directory.
pub const CONFIG_DIR_ENV: &str = "PIER_CONFIG_DIR";
