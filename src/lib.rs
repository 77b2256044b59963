//! pier: a project catalogue with a dependency-aware script runner.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Argument parsing and the command handlers.
pub mod cli;
/// File names and environment variables.
pub mod constants;
/// Resolution, execution and the catalogue.
pub mod core;
/// Catalogue, descriptor and run plan types.
pub mod models;
/// The catalogue loaded for one invocation.
pub mod state;
pub mod system;
