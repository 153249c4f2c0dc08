//! WAV container synthesis for raw PCM audio.
//!
//! The recognition server expects a self-describing WAV file, while the host
//! hands us bare little-endian PCM samples. This module prepends the minimal
//! 44-byte RIFF header the server understands.
//!
//! # Header layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0  | 4 | `"RIFF"` |
//! | 4  | 4 | chunk size (`payload + 44`) |
//! | 8  | 8 | `"WAVEfmt "` |
//! | 16 | 4 | fmt subchunk size (16) |
//! | 20 | 2 | audio format (1 = PCM) |
//! | 22 | 2 | channels |
//! | 24 | 4 | sample rate |
//! | 28 | 4 | byte rate |
//! | 32 | 2 | block align |
//! | 34 | 2 | bits per sample |
//! | 36 | 4 | `"data"` |
//! | 40 | 4 | data size (`payload`) |
//!
//! The chunk size field counts the full header (`payload + 44`), not the
//! canonical `payload + 36`. The server accepts this framing.

/// Size of the synthesized header in bytes.
pub const HEADER_SIZE: usize = 44;

/// Marker every RIFF container starts with.
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";

/// Format subchunk size for linear PCM.
const FMT_CHUNK_SIZE: i32 = 16;

/// Audio format tag for linear PCM.
const FORMAT_TAG_PCM: i16 = 1;

/// Sample rate agreed with the recognition server.
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Bit depth agreed with the recognition server.
pub const DEFAULT_BITS_PER_SAMPLE: u16 = 16;

/// PCM format parameters encoded into the WAV header.
///
/// The values must match the actual samples; a mismatch is not detected
/// locally, the server simply misinterprets the audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Number of channels
    pub channels: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::mono_16bit(DEFAULT_SAMPLE_RATE)
    }
}

impl PcmFormat {
    /// 16-bit mono PCM at the given sample rate.
    pub const fn mono_16bit(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
            channels: 1,
        }
    }

    /// Bytes per sample frame, saturating at `u16::MAX`.
    #[inline]
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bits_per_sample / 8)
    }

    /// Bytes per second of audio, saturating at `u32::MAX`.
    #[inline]
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(u32::from(self.block_align()))
    }

    /// Build the 44-byte header for a payload of `data_len` bytes.
    ///
    /// All numeric fields are signed on the wire. Values that do not fit
    /// (payloads beyond `i32::MAX - 44` bytes, out-of-range format
    /// parameters) saturate at the field maximum.
    pub fn wav_header(&self, data_len: usize) -> [u8; HEADER_SIZE] {
        let data_size = i32::try_from(data_len).unwrap_or(i32::MAX);
        let chunk_size = data_size.saturating_add(HEADER_SIZE as i32);

        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(RIFF_MAGIC);
        header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
        header[8..16].copy_from_slice(b"WAVEfmt ");
        header[16..20].copy_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        header[20..22].copy_from_slice(&FORMAT_TAG_PCM.to_le_bytes());
        header[22..24].copy_from_slice(&signed_i16(self.channels).to_le_bytes());
        header[24..28].copy_from_slice(&signed_i32(self.sample_rate).to_le_bytes());
        header[28..32].copy_from_slice(&signed_i32(self.byte_rate()).to_le_bytes());
        header[32..34].copy_from_slice(&signed_i16(self.block_align()).to_le_bytes());
        header[34..36].copy_from_slice(&signed_i16(self.bits_per_sample).to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&data_size.to_le_bytes());
        header
    }
}

#[inline]
fn signed_i16(value: u16) -> i16 {
    i16::try_from(value).unwrap_or(i16::MAX)
}

#[inline]
fn signed_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Check whether a buffer is already RIFF framed.
#[inline]
pub fn is_riff(data: &[u8]) -> bool {
    data.starts_with(RIFF_MAGIC)
}

/// Wrap 16-bit mono PCM into a WAV container.
///
/// Buffers that already start with `RIFF` are returned untouched, so
/// pre-framed audio is never double-wrapped. Never fails; an empty payload
/// yields a header-only file.
pub fn pcm_to_wav(sample_rate: u32, pcm: Vec<u8>) -> Vec<u8> {
    frame_pcm(&PcmFormat::mono_16bit(sample_rate), pcm)
}

/// Wrap PCM with an explicit format into a WAV container.
pub fn frame_pcm(format: &PcmFormat, pcm: Vec<u8>) -> Vec<u8> {
    if is_riff(&pcm) {
        return pcm;
    }

    let mut wav = Vec::with_capacity(HEADER_SIZE + pcm.len());
    wav.extend_from_slice(&format.wav_header(pcm.len()));
    wav.extend_from_slice(&pcm);
    wav
}
