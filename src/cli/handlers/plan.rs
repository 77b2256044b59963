// src/cli/handlers/plan.rs

use anyhow::Result;
use clap::Parser;

use super::commons::{self, TargetArgs};
use crate::{core::graph_display, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows what `run` would execute, without running it.")]
struct PlanArgs {
    /// The script to plan.
    script: String,

    #[command(flatten)]
    target: TargetArgs,

    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,
}

/// Resolves a script and prints the forest without running it.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let plan_args: PlanArgs = commons::parse_args(&args)?;

    let forest = commons::build_run_plan(state.catalogue(), &plan_args.script, &plan_args.target)?;

    if plan_args.json {
        println!("{}", serde_json::to_string_pretty(&forest)?);
    } else {
        graph_display::display_run_plan(&plan_args.script, &forest);
    }
    Ok(())
}
