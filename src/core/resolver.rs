// src/core/resolver.rs

use crate::core::alias::expand_script;
use crate::core::catalogue::ProjectCatalogue;
use crate::core::script_config::{ProjectScriptConfig, ScriptConfigError};
use crate::models::{Project, ProjectFilter, RunConfiguration, ScriptKey};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

/// Why a run plan could not be built.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A declared dependency names no registered project.
    #[error(
        "Project '{project}' depends on '{dependency}' for script '{script}', but no project with that name is registered."
    )]
    DependencyNotFound {
        /// The dependent project.
        project: String,
        /// Name it declared.
        dependency: String,
        /// Script being resolved.
        script: String,
    },
    /// Projects with the dependency's name exist, but none in the dependent's group.
    #[error(
        "Project '{project}' depends on '{dependency}' for script '{script}', but no project with that name is in group '{group}'."
    )]
    DependencyNotInGroup {
        /// The dependent project.
        project: String,
        /// Name it declared.
        dependency: String,
        /// The dependent's primary group.
        group: String,
        /// Script being resolved.
        script: String,
    },
    /// A project's descriptor could not be read.
    #[error("Invalid configuration for project '{project}': {source}")]
    Config {
        /// Project whose descriptor failed.
        project: String,
        /// Underlying error.
        #[source]
        source: ScriptConfigError,
    },
}

/// The `path@script` keys already claimed during one resolution request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionStack {
    keys: HashSet<ScriptKey>,
}

impl ResolutionStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`. Returns `false` if it was already claimed.
    pub fn claim(&mut self, key: ScriptKey) -> bool {
        self.keys.insert(key)
    }

    /// Whether `key` has been claimed.
    pub fn contains(&self, key: &ScriptKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of claimed keys.
    pub fn claimed(&self) -> usize {
        self.keys.len()
    }
}

/// Walks the project dependency graph and builds the run plan forest.
///
/// A resolver caches every project configuration it loads, so a descriptor
/// is read at most once per request.
pub struct Resolver<'a, C: ProjectCatalogue + ?Sized> {
    catalogue: &'a C,
    configs: HashMap<PathBuf, Rc<ProjectScriptConfig>>,
}

impl<C: ProjectCatalogue + ?Sized> std::fmt::Debug for Resolver<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("cached_configs", &self.configs.len())
            .finish()
    }
}

impl<'a, C: ProjectCatalogue + ?Sized> Resolver<'a, C> {
    /// A resolver with an empty configuration cache.
    pub fn new(catalogue: &'a C) -> Self {
        Self {
            catalogue,
            configs: HashMap::new(),
        }
    }

    /// Resolves `script` for every candidate, in order.
    ///
    /// Each `path@script` key is claimed on `stack` before its subtree is
    /// built, so a pair reached twice yields a single node and cycles end.
    /// The stack is handed back so the caller can keep threading it.
    ///
    /// # Errors
    /// Fails when a declared dependency names no registered project, or when
    /// a visited project's descriptor cannot be read. No partial forest is returned.
    pub fn resolve(
        &mut self,
        script: &str,
        candidates: &[Project],
        mut stack: ResolutionStack,
    ) -> Result<(Vec<RunConfiguration>, ResolutionStack), ResolveError> {
        let mut forest = Vec::new();

        for project in candidates {
            let key = ScriptKey::new(&project.path, script);
            if !stack.claim(key.clone()) {
                log::debug!("'{}' already resolved in this request. Skipping.", key);
                continue;
            }
            log::trace!("Resolving '{}'.", key);

            let config = self.config_for(project)?;
            let expansion = expand_script(script, &config);

            let mut dependencies = Vec::new();
            for decl in config.get_dependencies(script) {
                let targets = self.dependency_targets(project, &decl.project, script)?;
                for name in expansion.names() {
                    let Some(target_script) = decl
                        .scripts
                        .get(name)
                        .and_then(|propagation| propagation.target_script(name))
                    else {
                        continue;
                    };
                    log::debug!(
                        "'{}' propagates '{}' to '{}' as '{}'.",
                        project.name,
                        name,
                        decl.project,
                        target_script
                    );
                    let (subtrees, returned) = self.resolve(target_script, &targets, stack)?;
                    stack = returned;
                    dependencies.extend(subtrees);
                }
            }

            forest.push(RunConfiguration::new(
                project.name.clone(),
                project.primary_group().map(str::to_string),
                expansion.into_runnable(),
                dependencies,
            ));
        }

        Ok((forest, stack))
    }

    fn config_for(&mut self, project: &Project) -> Result<Rc<ProjectScriptConfig>, ResolveError> {
        if let Some(config) = self.configs.get(&project.path) {
            return Ok(Rc::clone(config));
        }
        let config = self
            .catalogue
            .load_script_config(project)
            .map(Rc::new)
            .map_err(|source| ResolveError::Config {
                project: project.name.clone(),
                source,
            })?;
        self.configs
            .insert(project.path.clone(), Rc::clone(&config));
        Ok(config)
    }

    /// The projects a dependency declaration of `dependent` refers to.
    ///
    /// A dependent with a primary group only sees same-named projects inside
    /// that group.
    fn dependency_targets(
        &self,
        dependent: &Project,
        dependency: &str,
        script: &str,
    ) -> Result<Vec<Project>, ResolveError> {
        let matches = self
            .catalogue
            .list_projects_matching(&ProjectFilter::by_name(dependency));

        if matches.is_empty() {
            return Err(ResolveError::DependencyNotFound {
                project: dependent.name.clone(),
                dependency: dependency.to_string(),
                script: script.to_string(),
            });
        }

        let Some(group) = dependent.primary_group() else {
            return Ok(matches);
        };
        let in_group: Vec<Project> = matches.into_iter().filter(|p| p.in_group(group)).collect();
        if in_group.is_empty() {
            return Err(ResolveError::DependencyNotInGroup {
                project: dependent.name.clone(),
                dependency: dependency.to_string(),
                group: group.to_string(),
                script: script.to_string(),
            });
        }
        Ok(in_group)
    }
}
