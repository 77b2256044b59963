// src/cli/handlers/group.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

use super::commons;
use crate::{core::catalogue, state::AppState};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Edits group membership.")]
struct GroupArgs {
    #[command(subcommand)]
    action: GroupAction,
}

#[derive(Subcommand, Debug)]
enum GroupAction {
    /// Puts a project in a group.
    Add {
        project: String,
        group: String,
        /// A group the project is already in, when several share the name.
        #[arg(long = "in")]
        within: Option<String>,
    },
    /// Takes a project out of a group.
    Remove {
        project: String,
        group: String,
        /// A group the project is already in, when several share the name.
        #[arg(long = "in")]
        within: Option<String>,
    },
}

/// Adds or removes a group membership.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let group_args: GroupArgs = commons::parse_args(&args)?;

    match group_args.action {
        GroupAction::Add {
            project,
            group,
            within,
        } => {
            let group = commons::validate_name(&group)?;
            catalogue::add_group(state.catalogue_mut(), &project, within.as_deref(), &group)?;
            println!(
                "{} {}",
                t!("common.success").green().bold(),
                format_args!(t!("group.success.added"), name = project.cyan(), group = group.yellow())
            );
        }
        GroupAction::Remove {
            project,
            group,
            within,
        } => {
            catalogue::remove_group(state.catalogue_mut(), &project, within.as_deref(), &group)?;
            println!(
                "{} {}",
                t!("common.success").green().bold(),
                format_args!(t!("group.success.removed"), name = project.cyan(), group = group.yellow())
            );
        }
    }
    Ok(())
}
