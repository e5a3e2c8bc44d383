//! Layered configuration for building an [`ApiSession`].
//!
//! Sources are merged in this order, later ones winning:
//! - Bundled defaults (include_str! from matrix_api.toml)
//! - `~/.config/matrix_api/matrix_api.toml`
//! - `./matrix_api.toml`
//! - `MATRIX_API_*` environment variables

use crate::{ApiSession, DEFAULT_429_WAIT_MS, MATRIX_V2_API_PATH, RetryPolicy};
use config::{Config, Environment, File, FileFormat};
use matrix_api_error::{ConfigError, ConfigErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../matrix_api.toml");

/// Session settings as read from configuration files and the environment.
///
/// # Example
///
/// ```toml
/// base_url = "https://matrix.example.org"
/// token = "syt_..."
/// default_429_wait_ms = 2000
///
/// [retry]
/// max_retries = 10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatrixApiConfig {
    /// Homeserver base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Access token
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Optional `user_id` override
    #[serde(default)]
    pub identity: Option<String>,

    /// API prefix
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Fallback wait for 429 responses, in milliseconds
    #[serde(default = "default_429_wait_ms")]
    pub default_429_wait_ms: u64,

    /// Verify TLS certificates
    #[serde(default = "default_validate_cert")]
    pub validate_cert: bool,

    /// Rate-limit retry bounds
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_api_path() -> String {
    MATRIX_V2_API_PATH.to_string()
}

fn default_429_wait_ms() -> u64 {
    DEFAULT_429_WAIT_MS
}

fn default_validate_cert() -> bool {
    true
}

impl Default for MatrixApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            identity: None,
            api_path: default_api_path(),
            default_429_wait_ms: default_429_wait_ms(),
            validate_cert: default_validate_cert(),
            retry: RetryPolicy::default(),
        }
    }
}

impl MatrixApiConfig {
    /// Load configuration from a specific file path, on top of the bundled
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration from file");

        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Load(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?;

        Self::deserialize_from(config)
    }

    /// Load configuration with precedence: environment > current dir >
    /// home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use matrix_api_core::MatrixApiConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let session = MatrixApiConfig::load()?.into_session()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> Result<Self, ConfigError> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/matrix_api/matrix_api.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("matrix_api").required(false))
            .add_source(
                Environment::with_prefix("MATRIX_API")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().map_err(|e| {
            ConfigError::new(ConfigErrorKind::Load(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?;

        Self::deserialize_from(config)
    }

    fn deserialize_from(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize().map_err(|e| {
            ConfigError::new(ConfigErrorKind::Load(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
    }

    /// Build an [`ApiSession`] from these settings.
    ///
    /// # Errors
    ///
    /// Fails when `base_url` or `token` is missing, or when the session
    /// builder rejects a value.
    pub fn into_session(self) -> Result<ApiSession, ConfigError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingField("base_url".into())))?;
        let token = self
            .token
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingField("token".into())))?;

        let mut builder = ApiSession::builder();
        builder
            .base_url(base_url)
            .token(token)
            .api_path(self.api_path)
            .default_429_wait_ms(self.default_429_wait_ms)
            .validate_cert(self.validate_cert)
            .retry(self.retry);
        if let Some(identity) = self.identity {
            builder.identity(identity);
        }
        builder.build()
    }
}
