// src/core/script_config.rs

use crate::constants::PROJECT_DESCRIPTOR_FILENAME;
use crate::models::{DependencyDecl, Project, ProjectDescriptor, ScriptValue};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a project's `pier.toml`.
#[derive(Error, Debug)]
pub enum ScriptConfigError {
    /// The file exists but could not be read.
    #[error("Could not read '{path}': {source}")]
    Io {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid descriptor.
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        /// Descriptor path.
        path: PathBuf,
        /// Parser error, with line and column.
        #[source]
        source: toml::de::Error,
    },
    /// A descriptor could not be rendered as TOML.
    #[error("Failed to serialize project descriptor: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// `init` never overwrites an existing descriptor.
    #[error("A descriptor already exists at '{path}'.")]
    AlreadyExists {
        /// Existing descriptor.
        path: PathBuf,
    },
}

/// The scripts and dependency declarations of one project, as read from its `pier.toml`.
#[derive(Debug, Clone)]
pub struct ProjectScriptConfig {
    path: PathBuf,
    group: Option<String>,
    descriptor: ProjectDescriptor,
}

impl ProjectScriptConfig {
    /// Reads the descriptor from the project root.
    /// A project without a `pier.toml` has an empty configuration.
    pub fn load(project: &Project) -> Result<Self, ScriptConfigError> {
        let descriptor_path = descriptor_path(&project.path);
        match fs::read_to_string(&descriptor_path) {
            Ok(content) => Self::from_toml(project, &content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "No {} for project '{}' at '{}'. Using an empty configuration.",
                    PROJECT_DESCRIPTOR_FILENAME,
                    project.name,
                    project.path.display()
                );
                Ok(Self::new(project, ProjectDescriptor::default()))
            }
            Err(e) => Err(ScriptConfigError::Io {
                path: descriptor_path,
                source: e,
            }),
        }
    }

    /// Parses a descriptor held in memory.
    pub fn from_toml(project: &Project, content: &str) -> Result<Self, ScriptConfigError> {
        let descriptor: ProjectDescriptor =
            toml::from_str(content).map_err(|e| ScriptConfigError::Parse {
                path: descriptor_path(&project.path),
                source: e,
            })?;
        Ok(Self::new(project, descriptor))
    }

    /// Wraps an already parsed descriptor.
    pub fn new(project: &Project, descriptor: ProjectDescriptor) -> Self {
        Self {
            path: project.path.clone(),
            group: project.primary_group().map(str::to_string),
            descriptor,
        }
    }

    /// Looks up a script. Malformed values are reported and treated as absent.
    pub fn get_script(&self, name: &str) -> Option<ScriptValue> {
        let raw = self.descriptor.scripts.get(name)?;
        let value = ScriptValue::from_toml(raw);
        if value.is_none() {
            log::warn!(
                "Script '{}' in '{}' is neither a command string nor a list of script names. Ignoring it.",
                name,
                self.path.display()
            );
        }
        value
    }

    /// Dependency declarations for a script, in declaration order.
    pub fn get_dependencies(&self, script: &str) -> &[DependencyDecl] {
        self.descriptor
            .dependencies
            .get(script)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the descriptor declares `name`, well-formed or not.
    pub fn has_script(&self, name: &str) -> bool {
        self.descriptor.scripts.contains_key(name)
    }

    /// Declared script names, in declaration order.
    pub fn script_names(&self) -> impl Iterator<Item = &str> {
        self.descriptor.scripts.keys().map(String::as_str)
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Primary group of the project.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// The raw descriptor.
    pub fn descriptor(&self) -> &ProjectDescriptor {
        &self.descriptor
    }
}

/// Location of the descriptor for a project rooted at `project_root`.
pub fn descriptor_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DESCRIPTOR_FILENAME)
}

/// Reads only the optional display name from a directory's descriptor.
pub fn read_descriptor_name(project_root: &Path) -> Option<String> {
    let content = fs::read_to_string(descriptor_path(project_root)).ok()?;
    toml::from_str::<ProjectDescriptor>(&content).ok()?.name
}

/// Writes a new descriptor. Refuses to overwrite an existing one.
pub fn write_descriptor(
    project_root: &Path,
    descriptor: &ProjectDescriptor,
) -> Result<PathBuf, ScriptConfigError> {
    let path = descriptor_path(project_root);
    if path.exists() {
        return Err(ScriptConfigError::AlreadyExists { path });
    }
    let toml_string = toml::to_string_pretty(descriptor)?;
    fs::write(&path, toml_string).map_err(|e| ScriptConfigError::Io {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}
