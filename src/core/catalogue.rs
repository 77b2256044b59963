// src/core/catalogue.rs

use crate::core::paths::{self, PathError};
use crate::core::script_config::{ProjectScriptConfig, ScriptConfigError};
use crate::models::{Catalogue, Project, ProjectFilter};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents errors that can occur during operations on the `Catalogue`.
#[derive(Error, Debug)]
pub enum CatalogueError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The config directory could not be located.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// `catalogue.bin` is corrupt or from an incompatible version.
    #[error("Failed to decode the catalogue: {0}")]
    BincodeDecode(#[from] bincode::error::DecodeError),
    /// The catalogue could not be encoded for saving.
    #[error("Failed to encode the catalogue: {0}")]
    BincodeEncode(#[from] bincode::error::EncodeError),
    /// No registered project matched a name (and group, when given).
    #[error("Project '{name}' not found{}.", in_group(.group))]
    ProjectNotFound {
        /// Name looked up.
        name: String,
        /// Group it was narrowed to.
        group: Option<String>,
    },
    /// Several projects matched and no group narrowed them down.
    #[error("Project name '{name}' is ambiguous. Candidates are in groups: {candidates}. Use --group.")]
    AmbiguousProject {
        /// Name looked up.
        name: String,
        /// Groups of the matching projects, comma separated.
        candidates: String,
    },
    /// Each path is registered at most once.
    #[error("A project is already registered at '{path}' (as '{name}').")]
    PathAlreadyRegistered {
        /// Canonical path.
        path: PathBuf,
        /// Name it is registered under.
        name: String,
    },
    /// Two projects with the same name must both be grouped and share no group.
    #[error(
        "Project name '{name}' would become ambiguous. Projects sharing a name must each belong to a group, and share no group."
    )]
    NameConflict {
        /// The shared name.
        name: String,
    },
    /// `group add` for a membership that already exists.
    #[error("Project '{project}' is already in group '{group}'.")]
    GroupAlreadyAssigned {
        /// Project name.
        project: String,
        /// Group label.
        group: String,
    },
    /// `group remove` for a membership that does not exist.
    #[error("Project '{project}' is not in group '{group}'.")]
    GroupNotAssigned {
        /// Project name.
        project: String,
        /// Group label.
        group: String,
    },
    /// The directory is not inside any registered project.
    #[error("No registered project contains '{path}'.")]
    NoProjectForPath {
        /// Directory looked up.
        path: PathBuf,
    },
}

fn in_group(group: &Option<String>) -> String {
    group
        .as_ref()
        .map(|g| format!(" in group '{}'", g))
        .unwrap_or_default()
}

type CatalogueResult<T> = Result<T, CatalogueError>;

/// The read-only view of the catalogue used by the resolver and the executor.
pub trait ProjectCatalogue {
    /// Projects satisfying every field of `filter`, in catalogue order.
    fn list_projects_matching(&self, filter: &ProjectFilter) -> Vec<Project>;

    /// The single project called `name` (within `group`, when given).
    fn find_project(&self, name: &str, group: Option<&str>) -> CatalogueResult<Project>;

    /// The script configuration of a registered project.
    fn load_script_config(&self, project: &Project)
    -> Result<ProjectScriptConfig, ScriptConfigError>;
}

impl ProjectCatalogue for Catalogue {
    fn list_projects_matching(&self, filter: &ProjectFilter) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect()
    }

    fn find_project(&self, name: &str, group: Option<&str>) -> CatalogueResult<Project> {
        let filter = ProjectFilter::by_name(name).with_group(group.map(str::to_string));
        let mut matches = self.list_projects_matching(&filter);
        if matches.len() > 1 {
            return Err(CatalogueError::AmbiguousProject {
                name: name.to_string(),
                candidates: describe_groups(&matches),
            });
        }
        matches.pop().ok_or_else(|| CatalogueError::ProjectNotFound {
            name: name.to_string(),
            group: group.map(str::to_string),
        })
    }

    fn load_script_config(
        &self,
        project: &Project,
    ) -> Result<ProjectScriptConfig, ScriptConfigError> {
        ProjectScriptConfig::load(project)
    }
}

fn describe_groups(projects: &[Project]) -> String {
    projects
        .iter()
        .map(|p| {
            if p.groups.is_empty() {
                "(none)".to_string()
            } else {
                p.groups.iter().cloned().collect::<Vec<_>>().join("+")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// --- Persistence ---

/// Loads the catalogue from the pier config directory.
pub fn load_catalogue() -> CatalogueResult<Catalogue> {
    load_catalogue_from(&paths::get_catalogue_path()?)
}

/// Loads a catalogue file. A missing file is an empty catalogue.
pub fn load_catalogue_from(path: &Path) -> CatalogueResult<Catalogue> {
    if !path.exists() {
        log::debug!("No catalogue at '{}'. Starting empty.", path.display());
        return Ok(Catalogue::default());
    }
    let bytes = fs::read(path)?;
    let (catalogue, _): (Catalogue, usize) =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
    Ok(catalogue)
}

/// Saves the catalogue to the pier config directory.
pub fn save_catalogue(catalogue: &Catalogue) -> CatalogueResult<()> {
    save_catalogue_to(catalogue, &paths::get_catalogue_path()?)
}

/// Saves the catalogue to an explicit path.
pub fn save_catalogue_to(catalogue: &Catalogue, path: &Path) -> CatalogueResult<()> {
    let bytes = bincode::serde::encode_to_vec(catalogue, bincode::config::standard())?;
    fs::write(path, bytes)?;
    log::debug!(
        "Catalogue with {} project(s) saved to '{}'.",
        catalogue.projects.len(),
        path.display()
    );
    Ok(())
}

// --- Queries ---

/// Finds the registered project whose root is the closest ancestor of `dir`.
pub fn find_project_containing(catalogue: &Catalogue, dir: &Path) -> CatalogueResult<Project> {
    catalogue
        .projects
        .iter()
        .filter(|project| dir.starts_with(&project.path))
        .max_by_key(|project| project.path.as_os_str().len())
        .cloned()
        .ok_or_else(|| CatalogueError::NoProjectForPath {
            path: dir.to_path_buf(),
        })
}

// --- Mutators ---

/// Registers a new project.
///
/// # Errors
/// Fails if the path is already registered or if the name would become ambiguous.
pub fn add_project(catalogue: &mut Catalogue, project: Project) -> CatalogueResult<()> {
    if let Some(existing) = catalogue.projects.iter().find(|p| p.path == project.path) {
        return Err(CatalogueError::PathAlreadyRegistered {
            path: project.path,
            name: existing.name.clone(),
        });
    }
    check_name_conflict(catalogue, &project, None)?;

    log::debug!(
        "Registering project '{}' at '{}'.",
        project.name,
        project.path.display()
    );
    catalogue.projects.push(project);
    Ok(())
}

/// Unregisters a project, returning it.
pub fn remove_project(
    catalogue: &mut Catalogue,
    name: &str,
    group: Option<&str>,
) -> CatalogueResult<Project> {
    let target = catalogue.find_project(name, group)?;
    catalogue.projects.retain(|p| p.path != target.path);
    Ok(target)
}

/// Adds `group` to the project identified by `name` (and `within`, when given).
pub fn add_group(
    catalogue: &mut Catalogue,
    name: &str,
    within: Option<&str>,
    group: &str,
) -> CatalogueResult<()> {
    let target = catalogue.find_project(name, within)?;
    if target.in_group(group) {
        return Err(CatalogueError::GroupAlreadyAssigned {
            project: target.name,
            group: group.to_string(),
        });
    }

    let mut updated = target.clone();
    updated.groups.insert(group.to_string());
    check_name_conflict(catalogue, &updated, Some(&target.path))?;
    replace_project(catalogue, updated);
    Ok(())
}

/// Removes `group` from the project identified by `name` (and `within`, when given).
pub fn remove_group(
    catalogue: &mut Catalogue,
    name: &str,
    within: Option<&str>,
    group: &str,
) -> CatalogueResult<()> {
    let target = catalogue.find_project(name, within)?;
    if !target.in_group(group) {
        return Err(CatalogueError::GroupNotAssigned {
            project: target.name,
            group: group.to_string(),
        });
    }

    let mut updated = target.clone();
    updated.groups.remove(group);
    check_name_conflict(catalogue, &updated, Some(&target.path))?;
    replace_project(catalogue, updated);
    Ok(())
}

/// Every group label in use, sorted.
pub fn all_groups(catalogue: &Catalogue) -> Vec<String> {
    let mut groups: Vec<String> = catalogue
        .projects
        .iter()
        .flat_map(|p| p.groups.iter().cloned())
        .collect();
    groups.sort();
    groups.dedup();
    groups
}

fn replace_project(catalogue: &mut Catalogue, updated: Project) {
    if let Some(slot) = catalogue.projects.iter_mut().find(|p| p.path == updated.path) {
        *slot = updated;
    }
}

/// Checks that `candidate` can coexist with every other same-named project.
/// `ignore_path` excludes the project being edited from the comparison.
fn check_name_conflict(
    catalogue: &Catalogue,
    candidate: &Project,
    ignore_path: Option<&Path>,
) -> CatalogueResult<()> {
    let conflict = catalogue
        .projects
        .iter()
        .filter(|p| Some(p.path.as_path()) != ignore_path)
        .filter(|p| p.name == candidate.name)
        .any(|p| {
            p.groups.is_empty()
                || candidate.groups.is_empty()
                || !p.groups.is_disjoint(&candidate.groups)
        });

    if conflict {
        return Err(CatalogueError::NameConflict {
            name: candidate.name.clone(),
        });
    }
    Ok(())
}
