//! Tests for layered session configuration.

use matrix_api_core::{MatrixApiConfig, RetryPolicy, DEFAULT_429_WAIT_MS, MATRIX_V2_API_PATH};
use matrix_api_error::ConfigErrorKind;
use std::io::Write;
use tempfile::Builder;

#[test]
fn test_defaults_match_bundled_file() -> anyhow::Result<()> {
    let mut temp_file = Builder::new().suffix(".toml").tempfile()?;
    writeln!(temp_file, "# nothing overridden")?;

    let config = MatrixApiConfig::from_file(temp_file.path())?;
    let defaults = MatrixApiConfig::default();

    assert_eq!(config, defaults);
    assert_eq!(config.api_path, MATRIX_V2_API_PATH);
    assert_eq!(config.default_429_wait_ms, DEFAULT_429_WAIT_MS);
    assert!(config.validate_cert);
    assert_eq!(config.retry, RetryPolicy::unbounded());
    Ok(())
}

#[test]
fn test_config_from_file() -> anyhow::Result<()> {
    let mut temp_file = Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        temp_file,
        r#"
base_url = "https://matrix.example.org"
token = "1234"
identity = "@bot:example.org"
default_429_wait_ms = 250
validate_cert = false

[retry]
max_retries = 3
max_wait_ms = 10_000
"#
    )?;

    let config = MatrixApiConfig::from_file(temp_file.path())?;
    assert_eq!(config.base_url.as_deref(), Some("https://matrix.example.org"));
    assert_eq!(config.default_429_wait_ms, 250);
    assert!(!config.validate_cert);
    assert_eq!(config.retry.max_retries, Some(3));
    assert_eq!(config.retry.max_wait_ms, Some(10_000));

    let session = config.into_session()?;
    assert_eq!(session.base_url(), "https://matrix.example.org");
    assert_eq!(session.token(), "1234");
    assert_eq!(session.identity().as_deref(), Some("@bot:example.org"));
    assert_eq!(*session.default_429_wait_ms(), 250);
    assert!(!*session.validate_cert());
    assert_eq!(*session.retry(), RetryPolicy::bounded(3).with_max_wait_ms(10_000));
    Ok(())
}

#[test]
fn test_into_session_requires_base_url() {
    let config = MatrixApiConfig {
        token: Some("1234".to_string()),
        ..Default::default()
    };
    let err = config.into_session().unwrap_err();
    assert_eq!(
        err.kind(),
        &ConfigErrorKind::MissingField("base_url".to_string())
    );
}

#[test]
fn test_into_session_requires_token() {
    let config = MatrixApiConfig {
        base_url: Some("https://matrix.example.org".to_string()),
        ..Default::default()
    };
    let err = config.into_session().unwrap_err();
    assert_eq!(err.kind(), &ConfigErrorKind::MissingField("token".to_string()));
}

#[test]
fn test_missing_file_is_an_error() {
    let err = MatrixApiConfig::from_file("/definitely/not/here/matrix_api.toml").unwrap_err();
    assert!(matches!(err.kind(), ConfigErrorKind::Load(_)));
}

#[test]
fn test_token_is_not_serialized() -> anyhow::Result<()> {
    let config = MatrixApiConfig {
        base_url: Some("https://matrix.example.org".to_string()),
        token: Some("secret".to_string()),
        ..Default::default()
    };
    let json = serde_json::to_string(&config)?;
    assert!(!json.contains("secret"));
    Ok(())
}
