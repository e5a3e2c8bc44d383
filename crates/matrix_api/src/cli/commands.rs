//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Talk to a Matrix homeserver's client-server API.
#[derive(Debug, Parser)]
#[command(name = "matrix-api", version, about)]
pub struct Cli {
    /// Configuration file (defaults to the layered matrix_api.toml lookup)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Homeserver base URL
    #[arg(long, global = true, env = "MATRIX_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Access token
    #[arg(long, global = true, env = "MATRIX_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Act as this user id (application services)
    #[arg(long, global = true)]
    pub identity: Option<String>,

    /// Give up after this many rate-limited retries
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send an arbitrary request and print the JSON response
    Send {
        /// HTTP method (GET, PUT, DELETE, POST)
        method: String,

        /// Path below the API prefix, e.g. /account/whoami
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,

        /// Query parameter as key=value (repeatable)
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,

        /// Header as name=value (repeatable)
        #[arg(long = "header", value_name = "NAME=VALUE")]
        header: Vec<String>,

        /// API prefix override, e.g. /_matrix/media/r0
        #[arg(long)]
        api_path: Option<String>,
    },

    /// Print a user's display name
    Displayname {
        /// Fully qualified user id, e.g. @alice:example.org
        user_id: String,
    },

    /// Resolve a room alias to a room id
    RoomId {
        /// Room alias, e.g. #ops:example.org
        alias: String,
    },
}
