// src/core/mod.rs

/// Script alias expansion.
pub mod alias;
/// The registered projects and their persistence.
pub mod catalogue;
/// Tree rendering for `list` and `plan`.
pub mod graph_display;
/// Config directory lookup and user path expansion.
pub mod paths;
/// Dependency resolution into a run plan forest.
pub mod resolver;
/// Execution of a run plan forest.
pub mod run_plan;
/// Per-project `pier.toml` access.
pub mod script_config;
/// Positional argument substitution.
pub mod template;

#[cfg(test)]
pub(crate) mod testing;
