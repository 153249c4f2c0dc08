pub mod audio;
pub mod stt;

// Re-export commonly used types for convenience
pub use audio::{PcmFormat, pcm_to_wav, read_chunks};
pub use stt::{
    AudioStream, STTError, STTProvider, SovaSTT, SovaSTTConfig, SpeechMetadata, SpeechProvider,
    SpeechResult, SpeechResultState, create_stt_provider, create_stt_provider_from_enum,
    get_supported_stt_providers,
};
