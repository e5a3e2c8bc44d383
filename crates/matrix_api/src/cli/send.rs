//! Command handlers.

use super::{Cli, Commands};
use matrix_api::{
    ApiRequest, ApiSession, AsyncHttpApi, ConfigError, ConfigErrorKind, JsonError,
    MatrixApiConfig, MatrixApiResult, RetryPolicy,
};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

/// Merge the config file, environment and command-line flags into a session.
#[instrument(skip(cli))]
pub fn build_session(cli: &Cli) -> Result<ApiSession, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => MatrixApiConfig::from_file(path)?,
        None => MatrixApiConfig::load()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(identity) = &cli.identity {
        config.identity = Some(identity.clone());
    }
    if let Some(max_retries) = cli.max_retries {
        config.retry = RetryPolicy {
            max_retries: Some(max_retries),
            ..config.retry
        };
    }

    debug!(base_url = ?config.base_url, "Resolved configuration");
    config.into_session()
}

/// Split `key=value` arguments.
pub fn parse_pairs(pairs: &[String], field: &str) -> Result<Vec<(String, String)>, ConfigError> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| {
                    ConfigError::new(ConfigErrorKind::InvalidValue {
                        field: field.to_string(),
                        reason: format!("expected KEY=VALUE, got '{}'", pair),
                    })
                })
        })
        .collect()
}

/// Run the selected command and return what should be printed.
pub async fn run_command(api: &AsyncHttpApi, command: Commands) -> MatrixApiResult<JsonValue> {
    match command {
        Commands::Send {
            method,
            path,
            body,
            query,
            header,
            api_path,
        } => {
            let mut request = ApiRequest::new(method, path);
            if let Some(body) = body {
                let body: JsonValue = serde_json::from_str(&body)
                    .map_err(|e| JsonError::new(format!("Invalid --body JSON: {}", e)))?;
                request = request.with_json(body);
            }
            for (key, value) in parse_pairs(&query, "query")? {
                request = request.with_query(key, value);
            }
            for (name, value) in parse_pairs(&header, "header")? {
                request = request.with_header(name, value);
            }
            if let Some(api_path) = api_path {
                request = request.with_api_path(api_path);
            }
            api.send(request).await
        }
        Commands::Displayname { user_id } => {
            Ok(JsonValue::String(api.get_display_name(&user_id).await?))
        }
        Commands::RoomId { alias } => Ok(JsonValue::String(api.get_room_id(&alias).await?)),
    }
}
