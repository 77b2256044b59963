//! # System Interaction Layer
//!
//! The boundary between the resolver/executor core and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: launches command lines through the configured shell with the
//!   terminal's stdio attached (`ProcessRunner`, `ShellRunner`).
//! - **`settings`**: loads `settings.toml`, which selects that shell.

/// Shell command execution.
pub mod executor;
/// `settings.toml` loading.
pub mod settings;
