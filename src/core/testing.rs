// src/core/testing.rs
//! In-memory collaborators for resolver and executor tests.

use crate::core::catalogue::{CatalogueError, ProjectCatalogue, add_project};
use crate::core::script_config::{ProjectScriptConfig, ScriptConfigError};
use crate::models::{Catalogue, Project, ProjectFilter};
use crate::system::executor::{ExecutionError, ProcessRunner};
use std::collections::HashMap;
use std::path::PathBuf;

/// A catalogue whose descriptors live in memory instead of `pier.toml` files.
#[derive(Debug, Default)]
pub(crate) struct InMemoryCatalogue {
    catalogue: Catalogue,
    descriptors: HashMap<PathBuf, String>,
}

impl InMemoryCatalogue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a project at `path` with the given groups and descriptor.
    pub(crate) fn with_project(
        mut self,
        name: &str,
        path: &str,
        groups: &[&str],
        descriptor: &str,
    ) -> Self {
        let mut project = Project::new(PathBuf::from(path), Some(name.to_string()));
        project.groups = groups.iter().map(|g| g.to_string()).collect();
        add_project(&mut self.catalogue, project).unwrap();
        self.descriptors
            .insert(PathBuf::from(path), descriptor.to_string());
        self
    }

    /// Drops a project from the catalogue, keeping nothing behind.
    pub(crate) fn forget(&mut self, path: &str) {
        self.catalogue
            .projects
            .retain(|p| p.path != PathBuf::from(path));
    }

    pub(crate) fn project(&self, name: &str, group: Option<&str>) -> Project {
        self.catalogue.find_project(name, group).unwrap()
    }
}

impl ProjectCatalogue for InMemoryCatalogue {
    fn list_projects_matching(&self, filter: &ProjectFilter) -> Vec<Project> {
        self.catalogue.list_projects_matching(filter)
    }

    fn find_project(&self, name: &str, group: Option<&str>) -> Result<Project, CatalogueError> {
        self.catalogue.find_project(name, group)
    }

    fn load_script_config(
        &self,
        project: &Project,
    ) -> Result<ProjectScriptConfig, ScriptConfigError> {
        let content = self
            .descriptors
            .get(&project.path)
            .map(String::as_str)
            .unwrap_or_default();
        ProjectScriptConfig::from_toml(project, content)
    }
}

/// Records every command line instead of running it.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub(crate) commands: Vec<String>,
    exit_codes: HashMap<String, i32>,
    interrupt_on: Option<String>,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes any command line containing `needle` exit with `code`.
    pub(crate) fn failing(mut self, needle: &str, code: i32) -> Self {
        self.exit_codes.insert(needle.to_string(), code);
        self
    }

    /// Makes any command line containing `needle` behave as if killed by a signal.
    pub(crate) fn interrupted(mut self, needle: &str) -> Self {
        self.interrupt_on = Some(needle.to_string());
        self
    }

    /// The recorded command lines with the `cd <dir> && ` prefix removed.
    pub(crate) fn bare_commands(&self) -> Vec<&str> {
        self.commands
            .iter()
            .map(|c| c.split_once(" && ").map_or(c.as_str(), |(_, rest)| rest))
            .collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn passthrough(&mut self, command_line: &str) -> Result<i32, ExecutionError> {
        self.commands.push(command_line.to_string());
        if let Some(needle) = &self.interrupt_on {
            if command_line.contains(needle.as_str()) {
                return Err(ExecutionError::Interrupted {
                    command: command_line.to_string(),
                });
            }
        }
        let code = self
            .exit_codes
            .iter()
            .find(|(needle, _)| command_line.contains(needle.as_str()))
            .map_or(0, |(_, code)| *code);
        Ok(code)
    }
}
