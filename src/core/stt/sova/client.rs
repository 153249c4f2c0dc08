//! Sova ASR client implementation.
//!
//! # Architecture
//!
//! The Sova recognition server takes one complete WAV file per request, so a
//! session is handled in three strictly ordered steps:
//!
//! 1. Drain the inbound audio stream into one buffer (arrival order kept)
//! 2. Frame the buffer as WAV and POST it as multipart to `<server>/asr`
//! 3. Parse the JSON reply and map it to a [`SpeechResult`]
//!
//! The upload cannot start before the stream ends: the WAV header carries
//! the total payload length.
//!
//! Each call builds its own HTTP client and drops it on every exit path, so
//! no connection outlives the call. Dropping the returned future cancels the
//! in-flight request.

use std::pin::pin;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info, warn};

use super::super::base::{
    AudioBitRates, AudioChannels, AudioCodecs, AudioFormats, AudioSampleRates, AudioStream,
    STTError, SpeechMetadata, SpeechProvider, SpeechResult,
};
use super::config::{
    AUDIO_FIELD_NAME, AUDIO_FILE_NAME, AUDIO_MIME_TYPE, PROVIDER_NAME, SOVA_SAMPLE_RATE,
    SUPPORTED_LANGUAGES, SovaSTTConfig,
};
use super::messages::AsrResponse;
use crate::core::audio::wav::pcm_to_wav;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("sova-stt/", env!("CARGO_PKG_VERSION"));

/// Sova ASR provider.
///
/// Holds only read-only configuration, so one instance can serve any number
/// of concurrent sessions.
///
/// # Example
///
/// ```rust,no_run
/// use bytes::Bytes;
/// use sova_stt::core::stt::sova::SovaSTT;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let stt = SovaSTT::new("http://192.168.1.10:8888")?;
///
///     let chunks = vec![Bytes::from(vec![0u8; 3200]), Bytes::from(vec![0u8; 3200])];
///     let result = stt.transcribe(futures::stream::iter(chunks)).await;
///
///     println!("{:?}: {}", result.state, result.text);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SovaSTT {
    config: SovaSTTConfig,
}

impl SovaSTT {
    /// Create a provider for the given server base URL with default budgets.
    pub fn new(server: &str) -> Result<Self, STTError> {
        Self::with_config(SovaSTTConfig::new(server)?)
    }

    /// Create a provider from a full configuration.
    pub fn with_config(config: SovaSTTConfig) -> Result<Self, STTError> {
        config.validate().map_err(STTError::ConfigurationError)?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &SovaSTTConfig {
        &self.config
    }

    /// Transcribe one audio session.
    ///
    /// `stream` yields raw 16 kHz 16-bit mono PCM chunks (or an already
    /// framed WAV file). Every failure, whatever its kind, is logged and
    /// reported as [`SpeechResult::error`].
    pub async fn transcribe<S>(&self, stream: S) -> SpeechResult
    where
        S: Stream<Item = Bytes> + Send,
    {
        let started = Instant::now();
        let mut audio_bytes = 0;
        let mut wav_bytes = 0;

        let outcome = match self.collect_audio(stream).await {
            Ok(audio) => {
                audio_bytes = audio.len();
                let wav_data = pcm_to_wav(SOVA_SAMPLE_RATE, audio);
                wav_bytes = wav_data.len();
                self.recognize(wav_data).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(text) => {
                info!(
                    audio_bytes,
                    wav_bytes,
                    chars = text.chars().count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Sova STT transcription complete"
                );
                SpeechResult::success(text)
            }
            Err(e) => {
                error!(
                    kind = e.kind(),
                    error = %e,
                    audio_bytes,
                    wav_bytes,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Error running Sova STT"
                );
                SpeechResult::error()
            }
        }
    }

    /// Drain the inbound stream into one contiguous buffer.
    pub(crate) async fn collect_audio<S>(&self, stream: S) -> Result<Vec<u8>, STTError>
    where
        S: Stream<Item = Bytes> + Send,
    {
        match self.config.stream_timeout {
            Some(limit) => tokio::time::timeout(limit, drain_stream(stream))
                .await
                .map_err(|_| STTError::StreamTimeout(duration_ms(limit))),
            None => Ok(drain_stream(stream).await),
        }
    }

    /// Run one bounded request carrying an already framed WAV file.
    pub(crate) async fn recognize(&self, wav_data: Vec<u8>) -> Result<String, STTError> {
        debug!(wav_bytes = wav_data.len(), "Sending audio to Sova ASR");

        let budget = self.config.request_timeout;
        tokio::time::timeout(budget, self.send_request(wav_data))
            .await
            .unwrap_or(Err(STTError::Timeout(duration_ms(budget))))
    }

    /// Perform the single multipart POST and interpret the reply.
    ///
    /// The HTTP client lives only for this call.
    async fn send_request(&self, wav_data: Vec<u8>) -> Result<String, STTError> {
        let http_client = Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                STTError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
            })?;

        let file_part = Part::bytes(wav_data)
            .file_name(AUDIO_FILE_NAME)
            .mime_str(AUDIO_MIME_TYPE)
            .map_err(|e| STTError::ConfigurationError(format!("Invalid MIME type: {e}")))?;
        let form = Form::new().part(AUDIO_FIELD_NAME, file_part);

        let response = http_client
            .post(self.config.asr_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| STTError::NetworkError(format!("Request failed: {e}")))?;

        // The body is parsed whatever the status; a rejection still arrives as JSON
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Sova ASR answered with non-success status");
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| STTError::NetworkError(format!("Failed to read response: {e}")))?;
        debug!("Sova STT returned {}", String::from_utf8_lossy(&body));

        let parsed = AsrResponse::from_slice(&body)?;
        debug!(response_code = ?parsed.response_code(), "Sova ASR response code");

        let text = parsed.into_transcript()?;
        debug!(text = %text, "Sova ASR transcript");
        Ok(text)
    }
}

async fn drain_stream<S>(stream: S) -> Vec<u8>
where
    S: Stream<Item = Bytes>,
{
    let mut stream = pin!(stream);
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk);
    }
    debug!(bytes = buffer.len(), "Audio stream drained");
    buffer
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl SpeechProvider for SovaSTT {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn supported_languages(&self) -> Vec<String> {
        SUPPORTED_LANGUAGES.iter().map(|s| s.to_string()).collect()
    }

    fn supported_formats(&self) -> Vec<AudioFormats> {
        vec![AudioFormats::Wav]
    }

    fn supported_codecs(&self) -> Vec<AudioCodecs> {
        vec![AudioCodecs::Pcm]
    }

    fn supported_bit_rates(&self) -> Vec<AudioBitRates> {
        vec![AudioBitRates::Bitrate16]
    }

    fn supported_sample_rates(&self) -> Vec<AudioSampleRates> {
        vec![AudioSampleRates::Samplerate16000]
    }

    fn supported_channels(&self) -> Vec<AudioChannels> {
        vec![AudioChannels::Mono]
    }

    async fn process_audio_stream(
        &self,
        metadata: SpeechMetadata,
        stream: AudioStream,
    ) -> SpeechResult {
        if !self.check_metadata(&metadata) {
            debug!(?metadata, "Audio metadata outside advertised capabilities");
        }
        self.transcribe(stream).await
    }
}
