// src/core/run_plan.rs

use crate::core::catalogue::ProjectCatalogue;
use crate::core::template::build_command_line;
use crate::models::{RunConfiguration, ScriptKey};
use crate::system::executor::{self, ExecutionError, ProcessRunner};
use colored::*;
use std::collections::HashSet;

/// Outcome of running one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// The node's commands were run (or skipped as already executed).
    Ran,
    /// The node could not be matched back to a project; its commands were not run.
    Invalid,
}

/// A command that finished with a non-zero exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCommand {
    /// Project name.
    pub project: String,
    /// Script name.
    pub script: String,
    /// Exit status.
    pub code: i32,
}

/// What happened during one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Commands launched.
    pub executed: usize,
    /// Scripts skipped because they already ran in this batch.
    pub skipped: usize,
    /// Commands that exited non-zero.
    pub failed: Vec<FailedCommand>,
    /// Names of nodes whose project could not be found at run time.
    pub invalid: Vec<String>,
}

impl RunReport {
    /// No failures and no invalid nodes.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.invalid.is_empty()
    }
}

/// Runs run plan forests, one batch at a time.
///
/// The session owns the execution stack: a `path@script` key runs at most
/// once between two calls to [`RunSession::reset`], however many nodes and
/// forest roots reach it.
pub struct RunSession<'a, C: ProjectCatalogue + ?Sized, R: ProcessRunner> {
    catalogue: &'a C,
    runner: R,
    executed: HashSet<ScriptKey>,
    echo_commands: bool,
    fail_fast: bool,
    report: RunReport,
}

impl<C: ProjectCatalogue + ?Sized, R: ProcessRunner> std::fmt::Debug for RunSession<'_, C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSession")
            .field("executed", &self.executed.len())
            .field("echo_commands", &self.echo_commands)
            .field("fail_fast", &self.fail_fast)
            .field("report", &self.report)
            .finish()
    }
}

impl<'a, C: ProjectCatalogue + ?Sized, R: ProcessRunner> RunSession<'a, C, R> {
    /// A session that echoes commands and keeps going after failures.
    pub fn new(catalogue: &'a C, runner: R) -> Self {
        Self {
            catalogue,
            runner,
            executed: HashSet::new(),
            echo_commands: true,
            fail_fast: false,
            report: RunReport::default(),
        }
    }

    /// Print `→ <command>` before each command.
    pub fn with_echo(mut self, echo_commands: bool) -> Self {
        self.echo_commands = echo_commands;
        self
    }

    /// Stop the batch at the first non-zero exit.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Starts a new batch: forgets what was executed and clears the report.
    pub fn reset(&mut self) {
        self.executed.clear();
        self.report = RunReport::default();
    }

    /// The current batch so far.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// The process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs every root of `forest`, in order, as one batch.
    pub fn run_all(
        &mut self,
        forest: &[RunConfiguration],
        extra_args: &str,
    ) -> Result<&RunReport, ExecutionError> {
        for node in forest {
            self.run(node, extra_args)?;
        }
        Ok(&self.report)
    }

    /// Runs `node`'s dependencies, then `node`'s own commands.
    ///
    /// A node whose project cannot be found is reported and skipped without
    /// affecting its siblings.
    ///
    /// # Errors
    /// Returns an error when a command cannot be launched, is interrupted, or
    /// exits non-zero while fail-fast is on. The batch should stop then.
    pub fn run(
        &mut self,
        node: &RunConfiguration,
        extra_args: &str,
    ) -> Result<NodeStatus, ExecutionError> {
        for dependency in node.dependencies() {
            self.run(dependency, extra_args)?;
        }

        if node.command_list().is_empty() {
            return Ok(NodeStatus::Ran);
        }

        let project = match self.catalogue.find_project(node.name(), node.group()) {
            Ok(project) => project,
            Err(e) => return Ok(self.invalid(node, &e.to_string())),
        };
        let config = match self.catalogue.load_script_config(&project) {
            Ok(config) => config,
            Err(e) => return Ok(self.invalid(node, &e.to_string())),
        };

        for (script, template) in node.command_list() {
            let key = ScriptKey::new(config.path(), script);
            if !self.executed.insert(key.clone()) {
                log::debug!("'{}' already executed in this batch. Skipping.", key);
                self.report.skipped += 1;
                continue;
            }

            let command = build_command_line(template, extra_args);
            let command_line = match executor::in_directory(config.path(), &command) {
                Ok(line) => line,
                Err(e) => return Ok(self.invalid(node, &e.to_string())),
            };

            if self.echo_commands {
                println!("{} {}", "→".blue(), command.green());
            }
            log::debug!("Running '{}' for '{}': {}", script, node.name(), command_line);

            let code = self.runner.passthrough(&command_line)?;
            self.report.executed += 1;
            if code != 0 {
                log::warn!(
                    "Script '{}' of '{}' exited with code {}.",
                    script,
                    node.name(),
                    code
                );
                self.report.failed.push(FailedCommand {
                    project: node.name().to_string(),
                    script: script.clone(),
                    code,
                });
                if self.fail_fast {
                    return Err(ExecutionError::NonZeroExit { command, code });
                }
            }
        }

        Ok(NodeStatus::Ran)
    }

    fn invalid(&mut self, node: &RunConfiguration, reason: &str) -> NodeStatus {
        eprintln!(
            "{} Skipping '{}': {}",
            "Warning:".yellow(),
            node.name().cyan(),
            reason
        );
        self.report.invalid.push(node.name().to_string());
        NodeStatus::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::{ResolutionStack, Resolver};
    use crate::core::testing::{InMemoryCatalogue, RecordingRunner};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn plan(catalogue: &InMemoryCatalogue, script: &str, roots: &[&str]) -> Vec<RunConfiguration> {
        let candidates: Vec<_> = roots.iter().map(|r| catalogue.project(r, None)).collect();
        let (forest, _) = Resolver::new(catalogue)
            .resolve(script, &candidates, ResolutionStack::new())
            .unwrap();
        forest
    }

    fn session(catalogue: &InMemoryCatalogue) -> RunSession<'_, InMemoryCatalogue, RecordingRunner> {
        RunSession::new(catalogue, RecordingRunner::new()).with_echo(false)
    }

    fn stack_catalogue() -> InMemoryCatalogue {
        InMemoryCatalogue::new()
            .with_project(
                "web",
                "/work/web",
                &[],
                r#"
                [scripts]
                start = ["install", "serve"]
                install = "npm ci"
                serve = "npm start -- --port=$1"

                [dependencies]
                start = [{ project = "api", scripts = { start = true } }]
                "#,
            )
            .with_project(
                "api",
                "/work/api",
                &[],
                r#"
                [scripts]
                start = "cargo run -- $@"

                [dependencies]
                start = [{ project = "db", scripts = { start = "up" } }]
                "#,
            )
            .with_project(
                "db",
                "/work/db",
                &[],
                r#"
                [scripts]
                up = "docker compose up -d"
                "#,
            )
    }

    #[test]
    fn test_dependencies_run_before_dependents() {
        // --- Setup ---
        let catalogue = stack_catalogue();
        let forest = plan(&catalogue, "start", &["web"]);
        let mut session = session(&catalogue);

        // --- Execute ---
        let status = session.run(&forest[0], "").unwrap();

        // --- Assert ---
        assert_eq!(status, NodeStatus::Ran);
        assert_eq!(
            session.runner().bare_commands(),
            vec![
                "docker compose up -d",
                "cargo run -- ",
                "npm ci",
                "npm start -- --port=",
            ]
        );
        assert_eq!(session.report().executed, 4);
        assert!(session.report().is_success());
    }

    #[test]
    fn test_commands_run_from_the_project_directory() {
        let catalogue = stack_catalogue();
        let forest = plan(&catalogue, "up", &["db"]);
        let mut session = session(&catalogue);

        session.run_all(&forest, "").unwrap();
        assert_eq!(
            session.runner().commands,
            vec!["cd /work/db && docker compose up -d"]
        );
    }

    #[test]
    fn test_extra_args_apply_to_every_command() {
        let catalogue = stack_catalogue();
        let forest = plan(&catalogue, "start", &["web"]);
        let mut session = session(&catalogue);

        session.run_all(&forest, "8080 --verbose").unwrap();
        assert_eq!(
            session.runner().bare_commands(),
            vec![
                "docker compose up -d 8080 --verbose",
                "cargo run -- 8080 --verbose",
                "npm ci 8080 --verbose",
                "npm start -- --port=8080 --verbose",
            ]
        );
    }

    #[test]
    fn test_rerun_without_reset_is_suppressed() {
        // --- Setup ---
        let catalogue = stack_catalogue();
        let forest = plan(&catalogue, "up", &["db"]);
        let mut session = session(&catalogue);

        // --- Execute & Assert ---
        session.run(&forest[0], "").unwrap();
        session.run(&forest[0], "").unwrap();
        assert_eq!(session.runner().commands.len(), 1);
        assert_eq!(session.report().skipped, 1);

        session.reset();
        assert_eq!(session.report(), &RunReport::default());
        session.run(&forest[0], "").unwrap();
        assert_eq!(session.runner().commands.len(), 2);
    }

    #[test]
    fn test_same_script_reached_through_two_nodes_runs_once() {
        // `shared:ci` and `shared:lint` both carry the `lint` command.
        let catalogue = InMemoryCatalogue::new()
            .with_project(
                "web",
                "/work/web",
                &[],
                r#"
                [scripts]
                ci = ["lint"]
                lint = "eslint ."

                [dependencies]
                ci = [{ project = "shared", scripts = { ci = true, lint = true } }]
                "#,
            )
            .with_project(
                "shared",
                "/work/shared",
                &[],
                r#"
                [scripts]
                ci = ["lint"]
                lint = "cargo clippy"
                "#,
            );
        let forest = plan(&catalogue, "ci", &["web"]);
        assert_eq!(forest[0].node_count(), 3);

        let mut session = session(&catalogue);
        let report = session.run_all(&forest, "").unwrap().clone();

        assert_eq!(
            session.runner().bare_commands(),
            vec!["cargo clippy", "eslint ."]
        );
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_invalid_node_does_not_stop_siblings() {
        // --- Setup ---
        let mut catalogue = stack_catalogue();
        let forest = plan(&catalogue, "start", &["web"]);
        // The project disappears between planning and running.
        catalogue.forget("/work/api");
        let mut session = session(&catalogue);

        // --- Execute ---
        let report = session.run_all(&forest, "").unwrap().clone();

        // --- Assert ---
        assert_eq!(
            session.runner().bare_commands(),
            vec!["docker compose up -d", "npm ci", "npm start -- --port="]
        );
        assert_eq!(report.invalid, vec!["api"]);
        assert!(!report.is_success());
    }

    #[test]
    fn test_invalid_root_reports_invalid_status() {
        let node = RunConfiguration::new(
            "ghost".to_string(),
            None,
            IndexMap::from([("build".to_string(), "make".to_string())]),
            Vec::new(),
        );
        let catalogue = InMemoryCatalogue::new();
        let mut session = session(&catalogue);

        assert_eq!(session.run(&node, "").unwrap(), NodeStatus::Invalid);
        assert!(session.runner().commands.is_empty());
    }

    #[test]
    fn test_non_zero_exit_is_recorded_and_batch_continues() {
        let catalogue = stack_catalogue();
        let forest = plan(&catalogue, "start", &["web"]);
        let mut session = RunSession::new(&catalogue, RecordingRunner::new().failing("cargo run", 101))
            .with_echo(false);

        let report = session.run_all(&forest, "").unwrap().clone();
        assert_eq!(session.runner().commands.len(), 4);
        assert_eq!(
            report.failed,
            vec![FailedCommand {
                project: "api".to_string(),
                script: "start".to_string(),
                code: 101,
            }]
        );
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let catalogue = stack_catalogue();
        let forest = plan(&catalogue, "start", &["web"]);
        let mut session = RunSession::new(&catalogue, RecordingRunner::new().failing("cargo run", 2))
            .with_echo(false)
            .with_fail_fast(true);

        let result = session.run_all(&forest, "");
        assert!(matches!(result, Err(ExecutionError::NonZeroExit { code: 2, .. })));
        assert_eq!(session.runner().commands.len(), 2);
    }

    #[test]
    fn test_interrupted_command_aborts_batch() {
        let catalogue = stack_catalogue();
        let forest = plan(&catalogue, "start", &["web"]);
        let mut session =
            RunSession::new(&catalogue, RecordingRunner::new().interrupted("docker")).with_echo(false);

        let result = session.run_all(&forest, "");
        assert!(matches!(result, Err(ExecutionError::Interrupted { .. })));
        assert_eq!(session.runner().commands.len(), 1);
    }
}
