//! Configuration error types.

/// Specific configuration error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// HTTP method outside GET, PUT, DELETE and POST
    #[display("Unsupported HTTP method: {}", _0)]
    UnsupportedMethod(String),

    /// Missing required field
    #[display("Missing required field: {}", _0)]
    MissingField(String),

    /// Invalid field value
    #[display("Invalid value for '{}': {}", field, reason)]
    InvalidValue {
        /// The field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Builder validation failed
    #[display("Validation failed: {}", _0)]
    Validation(String),

    /// Configuration sources could not be read or deserialized
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
}

/// Configuration error with source location.
///
/// Raised before any network I/O happens; never retried.
///
/// # Examples
///
/// ```
/// use matrix_api_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::UnsupportedMethod("PATCH".into()));
/// assert!(format!("{}", err).contains("Unsupported HTTP method: PATCH"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given kind at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}

/// Convert from derive_builder validation messages.
impl From<String> for ConfigError {
    #[track_caller]
    fn from(msg: String) -> Self {
        Self::new(ConfigErrorKind::Validation(msg))
    }
}

/// Convert from derive_builder missing-field errors.
impl From<derive_builder::UninitializedFieldError> for ConfigError {
    #[track_caller]
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::new(ConfigErrorKind::MissingField(err.field_name().to_string()))
    }
}
