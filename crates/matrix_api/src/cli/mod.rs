//! Command-line interface definitions and handlers.

mod commands;
mod send;

pub use commands::{Cli, Commands};
pub use send::{build_session, run_command};
