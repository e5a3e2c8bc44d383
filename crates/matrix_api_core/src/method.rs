//! Supported HTTP verbs.

use matrix_api_error::{ConfigError, ConfigErrorKind};
use std::str::FromStr;

/// HTTP methods the client-server API is called with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// POST
    Post,
}

impl HttpMethod {
    /// Parse a method name, case-insensitively.
    ///
    /// Anything other than GET, PUT, DELETE or POST is rejected with
    /// [`ConfigErrorKind::UnsupportedMethod`].
    ///
    /// # Examples
    ///
    /// ```
    /// use matrix_api_core::HttpMethod;
    ///
    /// assert_eq!(HttpMethod::parse("put").unwrap(), HttpMethod::Put);
    /// assert!(HttpMethod::parse("PATCH").is_err());
    /// ```
    #[track_caller]
    pub fn parse(method: &str) -> Result<Self, ConfigError> {
        let upper = method.to_uppercase();
        Self::from_str(&upper)
            .map_err(|_| ConfigError::new(ConfigErrorKind::UnsupportedMethod(upper)))
    }
}
