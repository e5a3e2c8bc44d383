//! matrix-api CLI binary.
//!
//! Sends requests to a Matrix homeserver through the rate-limit aware
//! client and prints the JSON response.

use clap::Parser;
use matrix_api::{AsyncHttpApi, LoggingConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, build_session, run_command};

    // Load .env before clap reads env-backed flags
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_logging(&LoggingConfig::new(log_level).with_json_logs(cli.json_logs))
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    let session = build_session(&cli)?;
    let api = AsyncHttpApi::new(session)?;

    let output = run_command(&api, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
