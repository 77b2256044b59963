// src/cli/handlers/remove.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

use super::commons;
use crate::{
    core::catalogue::{self, ProjectCatalogue},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Unregisters a project. Its files are left untouched.")]
struct RemoveArgs {
    /// The name of the project to unregister.
    name: String,

    /// The group of the project, when several share the name.
    #[arg(short, long)]
    group: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

/// Unregisters a project after confirmation.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let remove_args: RemoveArgs = commons::parse_args(&args)?;
    let group = remove_args.group.as_deref();

    let target = state.catalogue().find_project(&remove_args.name, group)?;

    println!("\n{}", t!("remove.info.header").yellow().bold());
    println!("  {:<8} {}", "Name:".blue(), target.name.cyan());
    println!("  {:<8} {}", "Path:".blue(), target.path.display());

    if !remove_args.yes
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("common.prompt.continue"))
            .default(false)
            .interact()?
    {
        println!("\n{}", t!("common.info.operation_cancelled"));
        return Ok(());
    }

    let removed = catalogue::remove_project(state.catalogue_mut(), &remove_args.name, group)?;

    println!(
        "\n{} {}",
        t!("common.success").green().bold(),
        format_args!(t!("remove.success.removed"), name = removed.name.cyan())
    );
    Ok(())
}
