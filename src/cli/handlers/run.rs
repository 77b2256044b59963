// src/cli/handlers/run.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use thiserror::Error;

use super::commons::{self, TargetArgs};
use crate::{
    core::run_plan::{RunReport, RunSession},
    state::AppState,
    system::{
        executor::{self, ShellRunner},
        settings,
    },
};

/// Returned when a batch finished but something in it failed.
#[derive(Error, Debug)]
#[error("{failed} command(s) failed and {invalid} project(s) could not be run.")]
pub struct RunFailed {
    /// Commands that exited non-zero.
    pub failed: usize,
    /// Nodes whose project vanished.
    pub invalid: usize,
}

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs a script, after the scripts it depends on in other projects."
)]
struct RunArgs {
    /// The script to run.
    script: String,

    #[command(flatten)]
    target: TargetArgs,

    /// Stop at the first command that exits with a non-zero code.
    #[arg(long)]
    fail_fast: bool,

    /// Extra arguments for the command templates (`$1`, `$2`, ..., `$@`).
    #[arg(last = true)]
    extra: Vec<String>,
}

///
/// Main entry point for the 'run' command.
/// Resolves the whole plan first; nothing runs if any dependency is missing.
///
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let run_args: RunArgs = commons::parse_args(&args)?;
    let catalogue = state.catalogue();

    // 1. Resolve. Any error here stops the request before execution.
    let forest = commons::build_run_plan(catalogue, &run_args.script, &run_args.target)?;
    if forest.iter().all(|node| node.command_list().is_empty() && node.dependencies().is_empty()) {
        println!("{}", t!("run.info.nothing_to_run").yellow());
        return Ok(());
    }

    // 2. Execute, dependencies first.
    let settings = settings::load_settings()?;
    let runner = ShellRunner::new(settings.shell.clone());
    let mut session = RunSession::new(catalogue, runner)
        .with_echo(settings.echo_commands)
        .with_fail_fast(run_args.fail_fast);
    session.reset();

    let extra_args = run_args.extra.join(" ");
    session.run_all(&forest, &extra_args).map_err(|e| {
        if executor::is_missing_program(&e) {
            anyhow!(e).context(format!(
                t!("run.error.shell_not_found"),
                shell = settings.shell.program.display()
            ))
        } else {
            anyhow!(e)
        }
    })?;

    // 3. Summary.
    let report = session.report();
    print_summary(report);
    if report.is_success() {
        Ok(())
    } else {
        Err(RunFailed {
            failed: report.failed.len(),
            invalid: report.invalid.len(),
        }
        .into())
    }
}

fn print_summary(report: &RunReport) {
    if report.is_success() {
        println!(
            "\n{}",
            format!(t!("run.success.summary"), executed = report.executed, skipped = report.skipped)
                .green()
        );
        return;
    }

    println!(
        "\n{}",
        format!(t!("run.warning.summary"), executed = report.executed, failed = report.failed.len())
            .yellow()
            .bold()
    );
    for failure in &report.failed {
        println!(
            "  {} {}:{} {}",
            "✗".red(),
            failure.project.cyan(),
            failure.script,
            format_args!(t!("run.label.exit_code"), code = failure.code)
        );
    }
    for name in &report.invalid {
        println!("  {} {} {}", "✗".red(), name.cyan(), t!("run.label.invalid"));
    }
}
