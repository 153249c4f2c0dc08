//! Message types for the Sova ASR `/asr` reply.
//!
//! The server answers with
//!
//! ```json
//! { "r": [ { "response_code": 0, "response": [ { "text": "..." } ] } ] }
//! ```
//!
//! Only the first result and its first hypothesis are used. Unknown fields
//! are ignored.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::super::base::STTError;

/// Response code signalling a successful recognition.
pub const RESPONSE_CODE_OK: i64 = 0;

/// Top-level reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrResponse {
    /// One entry per uploaded audio blob.
    pub r: Vec<AsrResult>,
}

/// Recognition result for one audio blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrResult {
    /// 0 on success, anything else is a server-side rejection.
    ///
    /// Whole-number floats (`0.0`) are accepted as their integer value.
    #[serde(deserialize_with = "whole_number")]
    pub response_code: i64,

    /// Recognition hypotheses, best first.
    #[serde(default)]
    pub response: Vec<Hypothesis>,
}

/// A single recognition hypothesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub text: String,
}

fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(code) = number.as_i64() {
        return Ok(code);
    }

    match number.as_f64() {
        Some(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(D::Error::custom(format!(
            "response_code must be a whole number, got {number}"
        ))),
    }
}

impl AsrResponse {
    /// Parse a reply body, ignoring whatever content type the server declared.
    pub fn from_slice(body: &[u8]) -> Result<Self, STTError> {
        serde_json::from_slice(body)
            .map_err(|e| STTError::ProtocolError(format!("Failed to parse response: {e}")))
    }

    /// Response code of the first result, if any.
    pub fn response_code(&self) -> Option<i64> {
        self.r.first().map(|result| result.response_code)
    }

    /// Extract the recognized text.
    ///
    /// A non-zero code is an application fault; a missing result or
    /// hypothesis is a protocol fault.
    pub fn into_transcript(self) -> Result<String, STTError> {
        let first = self
            .r
            .into_iter()
            .next()
            .ok_or_else(|| STTError::ProtocolError("Response contains no results".to_string()))?;

        if first.response_code != RESPONSE_CODE_OK {
            return Err(STTError::RecognitionRejected(first.response_code));
        }

        first
            .response
            .into_iter()
            .next()
            .map(|hypothesis| hypothesis.text)
            .ok_or_else(|| {
                STTError::ProtocolError("Successful response contains no hypotheses".to_string())
            })
    }
}
