//! Provider-facing vocabulary shared by speech-to-text backends.
//!
//! The host platform talks to every backend through [`SpeechProvider`]: it
//! reads the advertised capability lists, then hands over one audio session
//! at a time as an [`AudioStream`] and receives a [`SpeechResult`].

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lazy, finite, non-restartable sequence of audio chunks for one session.
pub type AudioStream = BoxStream<'static, Bytes>;

// =============================================================================
// Audio capability enums
// =============================================================================

/// Container formats a provider can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudioFormats {
    Wav,
    Ogg,
}

impl AudioFormats {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "WAV",
            Self::Ogg => "OGG",
        }
    }
}

impl std::fmt::Display for AudioFormats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audio codecs a provider can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudioCodecs {
    Pcm,
    Opus,
}

impl AudioCodecs {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pcm => "PCM",
            Self::Opus => "OPUS",
        }
    }
}

impl std::fmt::Display for AudioCodecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sample bit depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioBitRates {
    Bitrate8,
    Bitrate16,
    Bitrate24,
    Bitrate32,
}

impl AudioBitRates {
    /// Bits per sample.
    #[inline]
    pub fn value(&self) -> u16 {
        match self {
            Self::Bitrate8 => 8,
            Self::Bitrate16 => 16,
            Self::Bitrate24 => 24,
            Self::Bitrate32 => 32,
        }
    }
}

impl TryFrom<u16> for AudioBitRates {
    type Error = STTError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(Self::Bitrate8),
            16 => Ok(Self::Bitrate16),
            24 => Ok(Self::Bitrate24),
            32 => Ok(Self::Bitrate32),
            other => Err(STTError::ConfigurationError(format!(
                "Unsupported bit rate: {other}"
            ))),
        }
    }
}

/// Sample rates in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioSampleRates {
    Samplerate8000,
    Samplerate11000,
    Samplerate16000,
    Samplerate18900,
    Samplerate22000,
    Samplerate32000,
    Samplerate37800,
    Samplerate44100,
    Samplerate48000,
}

impl AudioSampleRates {
    /// Sample rate in Hz.
    #[inline]
    pub fn value(&self) -> u32 {
        match self {
            Self::Samplerate8000 => 8000,
            Self::Samplerate11000 => 11000,
            Self::Samplerate16000 => 16000,
            Self::Samplerate18900 => 18900,
            Self::Samplerate22000 => 22000,
            Self::Samplerate32000 => 32000,
            Self::Samplerate37800 => 37800,
            Self::Samplerate44100 => 44100,
            Self::Samplerate48000 => 48000,
        }
    }
}

impl TryFrom<u32> for AudioSampleRates {
    type Error = STTError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8000 => Ok(Self::Samplerate8000),
            11000 => Ok(Self::Samplerate11000),
            16000 => Ok(Self::Samplerate16000),
            18900 => Ok(Self::Samplerate18900),
            22000 => Ok(Self::Samplerate22000),
            32000 => Ok(Self::Samplerate32000),
            37800 => Ok(Self::Samplerate37800),
            44100 => Ok(Self::Samplerate44100),
            48000 => Ok(Self::Samplerate48000),
            other => Err(STTError::ConfigurationError(format!(
                "Unsupported sample rate: {other}"
            ))),
        }
    }
}

/// Channel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChannels {
    Mono,
    Stereo,
}

impl AudioChannels {
    /// Channel count.
    #[inline]
    pub fn value(&self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

impl TryFrom<u16> for AudioChannels {
    type Error = STTError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            other => Err(STTError::ConfigurationError(format!(
                "Unsupported channel count: {other}"
            ))),
        }
    }
}

// =============================================================================
// Session metadata and results
// =============================================================================

/// Description of the audio the host is about to stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechMetadata {
    /// BCP-47 language tag (e.g. "ru-RU")
    pub language: String,
    pub format: AudioFormats,
    pub codec: AudioCodecs,
    pub bit_rate: AudioBitRates,
    pub sample_rate: AudioSampleRates,
    pub channel: AudioChannels,
}

impl Default for SpeechMetadata {
    fn default() -> Self {
        Self {
            language: "ru-RU".to_string(),
            format: AudioFormats::Wav,
            codec: AudioCodecs::Pcm,
            bit_rate: AudioBitRates::Bitrate16,
            sample_rate: AudioSampleRates::Samplerate16000,
            channel: AudioChannels::Mono,
        }
    }
}

/// Outcome of a transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechResultState {
    Success,
    Error,
}

/// Transcription result returned to the host.
///
/// `text` is always empty when `state` is [`SpeechResultState::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResult {
    pub text: String,
    pub state: SpeechResultState,
}

impl SpeechResult {
    /// Successful transcription carrying the recognized text.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            state: SpeechResultState::Success,
        }
    }

    /// Failed transcription.
    pub fn error() -> Self {
        Self {
            text: String::new(),
            state: SpeechResultState::Error,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.state == SpeechResultState::Success
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Failure kinds of a recognition exchange.
///
/// These never reach the host directly: providers log them and return
/// [`SpeechResult::error`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum STTError {
    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// DNS, connect, reset or other transport failure
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The request/response exchange exceeded its budget
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// The inbound audio stream did not finish in time
    #[error("Audio stream not finished after {0}ms")]
    StreamTimeout(u64),

    /// Response body is not JSON or does not have the expected shape
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Server answered with a non-zero response code
    #[error("Recognition rejected by server (response_code {0})")]
    RecognitionRejected(i64),
}

impl STTError {
    /// Short machine-readable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationError(_) => "configuration",
            Self::NetworkError(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::StreamTimeout(_) => "stream_timeout",
            Self::ProtocolError(_) => "protocol",
            Self::RecognitionRejected(_) => "application",
        }
    }
}

// =============================================================================
// Provider capability set
// =============================================================================

/// Serializable snapshot of what a provider accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderCapabilities {
    pub name: String,
    pub languages: Vec<String>,
    pub formats: Vec<AudioFormats>,
    pub codecs: Vec<AudioCodecs>,
    pub bit_rates: Vec<u16>,
    pub sample_rates: Vec<u32>,
    pub channels: Vec<u16>,
}

/// Speech-to-text backend as seen by the host platform.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    fn supported_languages(&self) -> Vec<String>;

    fn supported_formats(&self) -> Vec<AudioFormats>;

    fn supported_codecs(&self) -> Vec<AudioCodecs>;

    fn supported_bit_rates(&self) -> Vec<AudioBitRates>;

    fn supported_sample_rates(&self) -> Vec<AudioSampleRates>;

    fn supported_channels(&self) -> Vec<AudioChannels>;

    /// Transcribe one audio session.
    ///
    /// Always resolves to a [`SpeechResult`]; failures are reported through
    /// its state, never as an error or panic.
    async fn process_audio_stream(
        &self,
        metadata: SpeechMetadata,
        stream: AudioStream,
    ) -> SpeechResult;

    /// Whether `metadata` falls within the advertised capability lists.
    fn check_metadata(&self, metadata: &SpeechMetadata) -> bool {
        self.supported_languages().contains(&metadata.language)
            && self.supported_formats().contains(&metadata.format)
            && self.supported_codecs().contains(&metadata.codec)
            && self.supported_bit_rates().contains(&metadata.bit_rate)
            && self.supported_sample_rates().contains(&metadata.sample_rate)
            && self.supported_channels().contains(&metadata.channel)
    }

    /// Snapshot of all capability lists.
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            name: self.name().to_string(),
            languages: self.supported_languages(),
            formats: self.supported_formats(),
            codecs: self.supported_codecs(),
            bit_rates: self
                .supported_bit_rates()
                .iter()
                .map(AudioBitRates::value)
                .collect(),
            sample_rates: self
                .supported_sample_rates()
                .iter()
                .map(AudioSampleRates::value)
                .collect(),
            channels: self
                .supported_channels()
                .iter()
                .map(AudioChannels::value)
                .collect(),
        }
    }
}
