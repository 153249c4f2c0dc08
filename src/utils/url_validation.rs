//! Validation of the recognition server base URL
//!
//! The `server` option is a bare base URL (`http://host:port`). The client
//! appends the endpoint path itself, so the configured value must not carry a
//! path, query or fragment of its own. Private and loopback hosts are
//! allowed.

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors that can occur during server URL validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Server URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("Server URL must not contain a path, got: {0}")]
    PathNotAllowed(String),

    #[error("Server URL must not contain a query or fragment")]
    QueryNotAllowed,

    #[error("Server URL must not contain credentials")]
    CredentialsNotAllowed,
}

/// Validates a recognition server base URL
///
/// Checks that the value:
/// 1. is non-empty and parseable
/// 2. uses `http` or `https`
/// 3. has a host
/// 4. has no path beyond `/`, no query, no fragment, no credentials
///
/// Returns the normalized base without a trailing slash, ready for
/// `format!("{base}/asr")`.
///
/// # Example
/// ```rust
/// use sova_stt::utils::url_validation::validate_server_url;
///
/// assert_eq!(
///     validate_server_url("http://192.168.1.10:8888/").unwrap(),
///     "http://192.168.1.10:8888"
/// );
/// assert!(validate_server_url("http://example.com/asr").is_err());
/// ```
pub fn validate_server_url(raw: &str) -> Result<String, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let parsed = Url::parse(trimmed)?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        warn!("Server URL contains credentials, rejecting");
        return Err(UrlValidationError::CredentialsNotAllowed);
    }

    if parsed.path() != "/" && !parsed.path().is_empty() {
        return Err(UrlValidationError::PathNotAllowed(parsed.path().to_string()));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(UrlValidationError::QueryNotAllowed);
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
