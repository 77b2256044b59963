// src/cli/dispatcher.rs

use anyhow::Result;

use crate::{cli::handlers, state::AppState};

/// Defines a system command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut AppState) -> Result<()>,
}

/// The single source of truth for all system commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        aliases: &["register", "reg"],
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "remove",
        aliases: &["rm", "unregister"],
        handler: handlers::remove::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "group",
        aliases: &[],
        handler: handlers::group::handle,
    },
    CommandDefinition {
        name: "info",
        aliases: &[],
        handler: handlers::info::handle,
    },
    CommandDefinition {
        name: "init",
        aliases: &["new"],
        handler: handlers::init::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "plan",
        aliases: &[],
        handler: handlers::plan::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Splits the raw arguments into the command to run and its arguments.
///
/// `pier <action> [args...]` runs the action. Anything else is a script
/// name, so `pier <script> [args...]` is a shortcut for `pier run <script> [args...]`.
fn route(mut all_args: Vec<String>) -> Option<(&'static CommandDefinition, Vec<String>)> {
    let first = all_args.first()?;
    match find_command(first) {
        Some(command) => {
            all_args.remove(0);
            Some((command, all_args))
        }
        None => find_command("run").map(|run| (run, all_args)),
    }
}

/// The main application dispatcher.
pub fn dispatch(all_args: Vec<String>, state: &mut AppState) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    match route(all_args) {
        Some((command, args)) => {
            log::debug!("Routing to '{}' with {:?}", command.name, args);
            (command.handler)(args, state)
        }
        None => {
            println!("{}", t!("dispatch.info.no_action"));
            Ok(())
        }
    }
}
