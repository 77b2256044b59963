// src/cli/handlers/commons.rs

// Shared functions used by several handlers.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, error::ErrorKind};
use colored::Colorize;
use std::env;
use std::path::Path;

use crate::{
    core::{
        catalogue::{self, ProjectCatalogue},
        paths,
        resolver::{ResolutionStack, Resolver},
    },
    models::{Catalogue, Project, ProjectFilter, RunConfiguration},
};

/// Parses a handler's arguments. `--help` and `--version` print and exit.
pub fn parse_args<T: Parser>(args: &[String]) -> Result<T> {
    T::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => anyhow::Error::from(e),
    })
}

/// Which registered projects a script request targets.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Only the project with this name.
    #[arg(short, long)]
    pub project: Option<String>,

    /// Only projects in this group.
    #[arg(short, long)]
    pub group: Option<String>,

    /// Every registered project.
    #[arg(short, long, conflicts_with_all = ["project", "group"])]
    pub all: bool,
}

impl TargetArgs {
    fn is_explicit(&self) -> bool {
        self.all || self.project.is_some() || self.group.is_some()
    }

    fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            name: self.project.clone(),
            path: None,
            group: self.group.clone(),
        }
    }
}

/// Picks the projects a script request starts from.
///
/// Without `--project`, `--group` or `--all` this is the project containing the
/// current directory. Projects that do not define `script` are dropped.
pub fn select_candidates(
    catalogue: &Catalogue,
    script: &str,
    target: &TargetArgs,
) -> Result<Vec<Project>> {
    let cwd = env::current_dir().context(t!("common.error.no_cwd"))?;
    let cwd = paths::canonicalize(&cwd)?;
    let candidates = candidates_for(catalogue, target, &cwd)?;
    keep_defining_script(catalogue, candidates, script)
}

fn candidates_for(catalogue: &Catalogue, target: &TargetArgs, cwd: &Path) -> Result<Vec<Project>> {
    if !target.is_explicit() {
        let project = catalogue::find_project_containing(catalogue, cwd)
            .with_context(|| t!("common.error.not_in_project"))?;
        return Ok(vec![project]);
    }

    let candidates = catalogue.list_projects_matching(&target.filter());
    if candidates.is_empty() {
        return Err(anyhow!(t!("common.error.no_matching_projects")));
    }
    Ok(candidates)
}

/// Drops candidates whose configuration does not define `script`.
pub fn keep_defining_script<C: ProjectCatalogue + ?Sized>(
    catalogue: &C,
    candidates: Vec<Project>,
    script: &str,
) -> Result<Vec<Project>> {
    let mut kept = Vec::with_capacity(candidates.len());
    for project in candidates {
        let config = catalogue
            .load_script_config(&project)
            .with_context(|| format!(t!("common.error.config_unreadable"), name = project.name))?;
        if config.has_script(script) {
            kept.push(project);
        } else {
            log::debug!("Project '{}' does not define '{}'.", project.name, script);
        }
    }

    if kept.is_empty() {
        return Err(anyhow!(
            t!("common.error.script_not_found"),
            script = script.cyan()
        ));
    }
    Ok(kept)
}

/// Selects the candidates for `script` and resolves them into a run plan forest.
///
/// Nothing is executed. A dependency that cannot be resolved fails the whole request.
pub fn build_run_plan(
    catalogue: &Catalogue,
    script: &str,
    target: &TargetArgs,
) -> Result<Vec<RunConfiguration>> {
    let candidates = select_candidates(catalogue, script, target)?;
    log::debug!(
        "Resolving '{}' for {} candidate(s): {:?}",
        script,
        candidates.len(),
        candidates.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
    );

    let (forest, stack) = Resolver::new(catalogue)
        .resolve(script, &candidates, ResolutionStack::new())
        .with_context(|| format!(t!("run.error.resolution_failed"), script = script))?;
    log::debug!(
        "Run plan for '{}': {} root(s), {} key(s) resolved.",
        script,
        forest.len(),
        stack.claimed()
    );
    Ok(forest)
}

/// The project named on the command line, or the one containing the current directory.
pub fn resolve_project(
    catalogue: &Catalogue,
    name: Option<&str>,
    group: Option<&str>,
) -> Result<Project> {
    match name {
        Some(name) => Ok(catalogue.find_project(name, group)?),
        None => {
            let cwd = paths::canonicalize(&env::current_dir()?)?;
            catalogue::find_project_containing(catalogue, &cwd)
                .with_context(|| t!("common.error.not_in_project"))
        }
    }
}

/// Validates a project or group name provided by the user.
pub fn validate_name(raw_name: &str) -> Result<String> {
    let name = raw_name.trim();

    if name.is_empty() {
        return Err(anyhow!(t!("validation.error.empty_name")));
    }
    if name.contains(char::is_whitespace) {
        return Err(anyhow!(t!("validation.error.contains_whitespace"), name = name));
    }
    if name.contains('/') || name.contains('\\') || name.contains('@') {
        return Err(anyhow!(t!("validation.error.invalid_chars"), name = name));
    }
    if name.starts_with('-') {
        return Err(anyhow!(t!("validation.error.leading_dash"), name = name));
    }

    Ok(name.to_string())
}
