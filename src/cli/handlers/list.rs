// src/cli/handlers/list.rs

use anyhow::{Result, anyhow};
use clap::Parser;

use super::commons;
use crate::{
    core::{
        catalogue::{self, ProjectCatalogue},
        graph_display,
    },
    models::ProjectFilter,
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Displays the catalogue as a tree of groups.")]
struct ListArgs {
    /// Only projects with this name.
    #[arg(short, long)]
    name: Option<String>,

    /// Only projects in this group.
    #[arg(short, long)]
    group: Option<String>,

    /// Show the path of each project.
    #[arg(short, long)]
    paths: bool,
}

/// Prints the catalogue, grouped.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let list_args: ListArgs = commons::parse_args(&args)?;

    if let Some(group) = &list_args.group {
        let known = catalogue::all_groups(state.catalogue());
        if !known.contains(group) {
            return Err(anyhow!(
                t!("list.error.unknown_group"),
                group = group,
                groups = known.join(", ")
            ));
        }
    }

    let filter = ProjectFilter {
        name: list_args.name,
        path: None,
        group: list_args.group,
    };
    let projects = state.catalogue().list_projects_matching(&filter);
    log::debug!("{} project(s) match {:?}", projects.len(), filter);

    graph_display::display_catalogue_tree(&projects, list_args.paths);
    Ok(())
}
