// src/cli/handlers/info.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use super::commons;
use crate::{
    core::catalogue::ProjectCatalogue,
    models::{ScriptPropagation, ScriptValue},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows a project's scripts and dependencies.")]
struct InfoArgs {
    /// The project to describe. Defaults to the project containing the current directory.
    project: Option<String>,

    /// The group of the project, when several share the name.
    #[arg(short, long)]
    group: Option<String>,
}

/// Prints a project, its scripts and its dependencies.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let info_args: InfoArgs = commons::parse_args(&args)?;

    let catalogue = state.catalogue();
    let project = commons::resolve_project(
        catalogue,
        info_args.project.as_deref(),
        info_args.group.as_deref(),
    )?;
    let config = catalogue
        .load_script_config(&project)
        .with_context(|| format!(t!("common.error.config_unreadable"), name = project.name))?;

    // --- Header ---
    println!("\n{}", project.name.cyan().bold());
    if let Some(description) = &config.descriptor().description {
        println!("{}", description.dimmed());
    }
    println!("  {:<8} {}", "Path:".blue(), project.path.display());
    if !project.groups.is_empty() {
        let groups: Vec<&str> = project.groups.iter().map(String::as_str).collect();
        println!("  {:<8} {}", "Groups:".blue(), groups.join(", ").yellow());
    }

    // --- Scripts ---
    println!("\n{}", t!("info.header.scripts").bold());
    let mut any_script = false;
    for name in config.script_names() {
        any_script = true;
        match config.get_script(name) {
            Some(ScriptValue::Literal(command)) => {
                println!("  {} {} {}", name.green(), "→".dimmed(), command);
            }
            Some(ScriptValue::Alias(targets)) => {
                println!("  {} {} [{}]", name.green(), "→".dimmed(), targets.join(", ").cyan());
            }
            None => {
                println!("  {} {}", name.green(), t!("info.label.malformed").red());
            }
        }
    }
    if !any_script {
        println!("  {}", t!("info.label.none").dimmed());
    }

    // --- Dependencies ---
    let dependencies = &config.descriptor().dependencies;
    if !dependencies.is_empty() {
        println!("\n{}", t!("info.header.dependencies").bold());
        for (script, decls) in dependencies {
            println!("  {}", script.green());
            for decl in decls {
                println!("    {} {}", "└─".dimmed(), decl.project.cyan());
                for (own, propagation) in &decl.scripts {
                    let shown = match propagation {
                        ScriptPropagation::Disabled => "-".dimmed().to_string(),
                        ScriptPropagation::SameName => own.clone(),
                        ScriptPropagation::Renamed(other) => other.yellow().to_string(),
                    };
                    println!("       {} {} {}", own, "→".dimmed(), shown);
                }
            }
        }
    }

    Ok(())
}
