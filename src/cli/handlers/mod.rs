// src/cli/handlers/mod.rs

/// `add`: registers a project directory.
pub mod add;
/// Helpers shared by the handlers.
pub mod commons;
/// `group`: adds or removes group memberships.
pub mod group;
/// `info`: shows one project and its scripts.
pub mod info;
/// `init`: writes a starter `pier.toml`.
pub mod init;
/// `list`: prints the catalogue tree.
pub mod list;
/// `plan`: prints a run plan without executing it.
pub mod plan;
/// `remove`: unregisters a project.
pub mod remove;
/// `run`: resolves and executes a script.
pub mod run;
