//! Configuration types for the Sova ASR provider.
//!
//! The host surface is a single `server` base URL. Everything else here is
//! fixed by the server protocol; the two timeout knobs exist for embedders
//! and tests that need tighter budgets than the defaults.

use std::time::Duration;

use super::super::base::STTError;
use crate::utils::url_validation::validate_server_url;

// =============================================================================
// Constants
// =============================================================================

/// Recognition endpoint path, appended to the server base URL.
pub const ASR_ENDPOINT_PATH: &str = "/asr";

/// Multipart field carrying the audio file.
pub const AUDIO_FIELD_NAME: &str = "audio_blob_0";

/// File name announced for the audio part.
pub const AUDIO_FILE_NAME: &str = "stream.wav";

/// MIME type of the audio part.
pub const AUDIO_MIME_TYPE: &str = "audio/wav";

/// Sample rate the server expects, in Hz.
pub const SOVA_SAMPLE_RATE: u32 = 16000;

/// Budget for the whole request/response exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Language tags the server recognizes.
pub const SUPPORTED_LANGUAGES: &[&str] = &["ru-RU"];

/// Display name reported to the host.
pub const PROVIDER_NAME: &str = "Sova STT";

// =============================================================================
// Main Configuration
// =============================================================================

/// Configuration for [`SovaSTT`](super::SovaSTT).
///
/// # Example
///
/// ```rust
/// use sova_stt::core::stt::sova::SovaSTTConfig;
/// use std::time::Duration;
///
/// let config = SovaSTTConfig::new("http://192.168.1.10:8888/")
///     .unwrap()
///     .with_stream_timeout(Duration::from_secs(60));
///
/// assert_eq!(config.asr_url(), "http://192.168.1.10:8888/asr");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SovaSTTConfig {
    /// Server base URL without trailing slash.
    server: String,

    /// Budget for connect + send + receive of one request.
    pub request_timeout: Duration,

    /// Optional budget for draining the inbound audio stream.
    ///
    /// `None` waits for the stream to finish however long it takes; the
    /// caller can still cancel by dropping the future.
    pub stream_timeout: Option<Duration>,
}

impl SovaSTTConfig {
    /// Create a configuration for the given server base URL.
    pub fn new(server: &str) -> Result<Self, STTError> {
        let server = validate_server_url(server)
            .map_err(|e| STTError::ConfigurationError(format!("Invalid server URL: {e}")))?;

        Ok(Self {
            server,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            stream_timeout: None,
        })
    }

    /// Normalized server base URL.
    #[inline]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Full recognition endpoint URL.
    pub fn asr_url(&self) -> String {
        format!("{}{}", self.server, ASR_ENDPOINT_PATH)
    }

    /// Set the request/response budget.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Bound the time spent draining the inbound stream.
    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = Some(timeout);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout.is_zero() {
            return Err("Request timeout must be greater than zero".to_string());
        }

        if let Some(stream_timeout) = self.stream_timeout
            && stream_timeout.is_zero()
        {
            return Err("Stream timeout must be greater than zero".to_string());
        }

        Ok(())
    }
}
