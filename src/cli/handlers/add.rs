// src/cli/handlers/add.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use super::commons;
use crate::{
    core::{catalogue, paths, script_config},
    models::Project,
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Registers a project in the catalogue.")]
struct AddArgs {
    /// The project root. Defaults to the current directory.
    path: Option<String>,

    /// Display name. Defaults to the `name` in pier.toml, then the directory name.
    #[arg(short, long)]
    name: Option<String>,

    /// Group to put the project in. Can be repeated.
    #[arg(short, long = "group")]
    groups: Vec<String>,
}

/// Registers a directory as a project.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let add_args: AddArgs = commons::parse_args(&args)?;

    let raw_path = add_args.path.as_deref().unwrap_or(".");
    let path = paths::resolve_user_path(raw_path)
        .with_context(|| format!(t!("add.error.invalid_path"), path = raw_path))?;
    if !path.is_dir() {
        anyhow::bail!(t!("add.error.not_a_directory"), path = path.display());
    }

    let name = match add_args.name {
        Some(name) => Some(name),
        None => script_config::read_descriptor_name(&path),
    };
    let mut project = Project::new(path, name);
    project.name = commons::validate_name(&project.name).context(t!("add.hint.use_name_flag"))?;
    for group in &add_args.groups {
        project.groups.insert(commons::validate_name(group)?);
    }

    catalogue::add_project(state.catalogue_mut(), project.clone())?;

    println!("\n{}", t!("common.success").green().bold());
    println!(
        "{}",
        format_args!(
            t!("add.success.registered"),
            name = project.name.cyan(),
            path = project.path.display()
        )
    );
    if !project.groups.is_empty() {
        let groups: Vec<&str> = project.groups.iter().map(String::as_str).collect();
        println!(
            "{}",
            format_args!(t!("add.success.groups"), groups = groups.join(", ").yellow())
        );
    }
    if !script_config::descriptor_path(&project.path).exists() {
        println!("\n{}", t!("add.hint.no_descriptor").dimmed());
    }

    Ok(())
}
