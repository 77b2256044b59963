// src/bin/pier.rs

//! The `pier` command line: parses, dispatches, then saves the catalogue if it changed.

use anyhow::Result;
use clap::Parser;
use colored::*;
use pier::{
    cli::{Cli, dispatcher, handlers::run::RunFailed},
    state::AppState,
    system::executor::ExecutionError,
};

/// The main entry point of the `pier` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // --- Centralized Error Handling ---
        // Interrupted commands exit silently, like the shell would.
        if matches!(
            e.downcast_ref::<ExecutionError>(),
            Some(ExecutionError::Interrupted { .. })
        ) {
            std::process::exit(130);
        }

        // The summary was already printed by the run handler.
        if e.downcast_ref::<RunFailed>().is_some() {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Loads the catalogue, runs the requested action and saves the catalogue if it changed.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut state = AppState::load()?;
    dispatcher::dispatch(cli.args, &mut state)?;

    if state.save_if_needed()? {
        log::debug!("Catalogue saved.");
    }
    Ok(())
}
