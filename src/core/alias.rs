// src/core/alias.rs

use crate::core::script_config::ProjectScriptConfig;
use crate::models::ScriptValue;
use indexmap::IndexMap;
use std::collections::HashSet;

/// The result of flattening one script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptExpansion {
    names: Vec<String>,
    commands: IndexMap<String, String>,
}

impl ScriptExpansion {
    /// Every defined script reached, aliases included, in visit order.
    /// Dependency propagation is matched against these names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Literal scripts reached, in visit order. Alias names never appear here.
    #[cfg(test)]
    pub(crate) fn commands(&self) -> &IndexMap<String, String> {
        &self.commands
    }

    /// The directly runnable commands: literal scripts with a non-blank command.
    pub fn into_runnable(self) -> IndexMap<String, String> {
        self.commands
            .into_iter()
            .filter(|(_, command)| !command.trim().is_empty())
            .collect()
    }
}

/// Flattens a script into the literal commands it stands for.
///
/// A literal script yields exactly one command. An alias is expanded depth-first,
/// in list order. Each name is expanded at most once, which also makes self- and
/// mutually-referencing aliases terminate.
pub fn expand_script(name: &str, config: &ProjectScriptConfig) -> ScriptExpansion {
    let mut expansion = ScriptExpansion::default();
    let mut visited = HashSet::new();
    expand_into(name, config, &mut visited, &mut expansion);
    expansion
}

fn expand_into(
    name: &str,
    config: &ProjectScriptConfig,
    visited: &mut HashSet<String>,
    expansion: &mut ScriptExpansion,
) {
    if !visited.insert(name.to_string()) {
        log::trace!("Script '{}' already expanded. Skipping.", name);
        return;
    }

    match config.get_script(name) {
        Some(ScriptValue::Literal(command)) => {
            expansion.names.push(name.to_string());
            expansion.commands.insert(name.to_string(), command);
        }
        Some(ScriptValue::Alias(targets)) => {
            log::trace!("Expanding alias '{}' into {:?}", name, targets);
            expansion.names.push(name.to_string());
            for target in &targets {
                expand_into(target, config, visited, expansion);
            }
        }
        None => {
            log::debug!(
                "Script '{}' is not defined in '{}'. Nothing to expand.",
                name,
                config.path().display()
            );
        }
    }
}
