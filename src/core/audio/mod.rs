//! Audio sources and container helpers.

pub mod source;
pub mod wav;

pub use source::read_chunks;
pub use wav::{PcmFormat, frame_pcm, is_riff, pcm_to_wav};
