//! Sova ASR speech-to-text provider.
//!
//! Integrates a self-hosted [Sova ASR](https://github.com/sovaai/sova-asr)
//! recognition server. The provider buffers a whole audio session, wraps it
//! in a WAV container and posts it to `<server>/asr` in a single multipart
//! request.
//!
//! # Audio
//!
//! - Format: WAV container, PCM codec
//! - 16-bit, 16 kHz, mono
//! - Language: `ru-RU`
//!
//! # Request
//!
//! ```text
//! POST {server}/asr
//! Content-Type: multipart/form-data
//!
//! audio_blob_0 = stream.wav (audio/wav)
//! ```
//!
//! # Failure handling
//!
//! Transport faults, the 15 second request budget, malformed replies and
//! non-zero `response_code` values all end in a
//! [`SpeechResult`](super::SpeechResult) with state `Error` and empty text.
//! The distinguishing kind is logged.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use sova_stt::core::stt::{SpeechMetadata, SpeechProvider, create_stt_provider};
//!
//! let provider = create_stt_provider("http://192.168.1.10:8888")?;
//! let result = provider
//!     .process_audio_stream(SpeechMetadata::default(), audio_stream)
//!     .await;
//! ```

mod client;
pub mod config;
pub mod messages;


pub use client::SovaSTT;
pub use config::{
    ASR_ENDPOINT_PATH, AUDIO_FIELD_NAME, AUDIO_FILE_NAME, AUDIO_MIME_TYPE,
    DEFAULT_REQUEST_TIMEOUT, PROVIDER_NAME, SOVA_SAMPLE_RATE, SUPPORTED_LANGUAGES, SovaSTTConfig,
};
pub use messages::{AsrResponse, AsrResult, Hypothesis, RESPONSE_CODE_OK};
