// src/cli/handlers/init.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use super::commons;
use crate::{
    core::{paths, script_config},
    models::{Project, ProjectDescriptor},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Writes a starter pier.toml.")]
struct InitArgs {
    /// The project root. Defaults to the current directory.
    path: Option<String>,

    /// The project name written to the descriptor. Defaults to the directory name.
    #[arg(short, long)]
    name: Option<String>,
}

/// The main handler for the `init` command.
pub fn handle(args: Vec<String>, _state: &mut AppState) -> Result<()> {
    let init_args: InitArgs = commons::parse_args(&args)?;

    let raw_path = init_args.path.as_deref().unwrap_or(".");
    let target_dir = paths::resolve_user_path(raw_path)
        .with_context(|| format!(t!("add.error.invalid_path"), path = raw_path))?;
    if !target_dir.is_dir() {
        anyhow::bail!(t!("add.error.not_a_directory"), path = target_dir.display());
    }

    let name = Project::new(target_dir.clone(), init_args.name).name;
    let name = commons::validate_name(&name).context(t!("add.hint.use_name_flag"))?;

    let descriptor = ProjectDescriptor::new_for_init(&name);
    let written = script_config::write_descriptor(&target_dir, &descriptor)?;

    println!("\n{}", t!("common.success").green().bold());
    println!(
        "{}",
        format_args!(t!("init.success.written"), path = written.display())
    );
    println!("\n{}", t!("init.hint.next_steps").dimmed());
    Ok(())
}
