mod base;
pub mod sova;

// Re-export public types and traits
pub use base::{
    AudioBitRates, AudioChannels, AudioCodecs, AudioFormats, AudioSampleRates, AudioStream,
    ProviderCapabilities, STTError, SpeechMetadata, SpeechProvider, SpeechResult,
    SpeechResultState,
};

// Re-export Sova implementation
pub use sova::{SovaSTT, SovaSTTConfig};

/// Supported STT providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum STTProvider {
    /// Self-hosted Sova ASR REST API
    Sova,
}

impl std::fmt::Display for STTProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            STTProvider::Sova => write!(f, "sova"),
        }
    }
}

impl std::str::FromStr for STTProvider {
    type Err = STTError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sova" | "sova-asr" | "sova_asr" | "sova-stt" | "sova_stt" => Ok(STTProvider::Sova),
            _ => Err(STTError::ConfigurationError(format!(
                "Unsupported STT provider: {s}. Supported providers: sova"
            ))),
        }
    }
}

/// Factory function creating the speech provider for a host configuration
///
/// # Arguments
/// * `server` - Recognition server base URL (e.g. `http://192.168.1.10:8888`)
///
/// # Returns
/// * `Result<Box<dyn SpeechProvider>, STTError>` - A boxed provider or a
///   configuration error for an unusable URL
///
/// # Examples
/// ```rust
/// use sova_stt::core::stt::create_stt_provider;
///
/// let provider = create_stt_provider("http://localhost:8888").unwrap();
/// assert_eq!(provider.name(), "Sova STT");
/// assert_eq!(provider.supported_languages(), vec!["ru-RU".to_string()]);
///
/// assert!(create_stt_provider("localhost").is_err());
/// ```
pub fn create_stt_provider(server: &str) -> Result<Box<dyn SpeechProvider>, STTError> {
    create_stt_provider_from_enum(STTProvider::Sova, server)
}

/// Factory function to create STT providers using the enum directly
pub fn create_stt_provider_from_enum(
    provider: STTProvider,
    server: &str,
) -> Result<Box<dyn SpeechProvider>, STTError> {
    match provider {
        STTProvider::Sova => Ok(Box::new(SovaSTT::new(server)?)),
    }
}

/// Get a list of all supported STT providers
pub fn get_supported_stt_providers() -> Vec<&'static str> {
    vec!["sova"]
}
