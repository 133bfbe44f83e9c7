//! Speech-to-text boundary.

use async_trait::async_trait;
use thiserror::Error;

use pagevoice_protocols::Command;

/// Transcription failed; the reason is shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct TranscriptionError(pub String);

/// Produces the command captured during one activation.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Finish capture and return what was heard. Empty text means nothing
    /// usable was captured.
    async fn transcribe(&self) -> Result<Command, TranscriptionError>;
}

/// Yields preset text, for typed input and tests.
#[derive(Debug, Clone)]
pub struct TextTranscriber {
    outcome: Result<(String, f32), TranscriptionError>,
}

impl TextTranscriber {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            outcome: Ok((text.into(), confidence)),
        }
    }

    /// A transcriber that always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(TranscriptionError(reason.into())),
        }
    }
}

#[async_trait]
impl Transcriber for TextTranscriber {
    async fn transcribe(&self) -> Result<Command, TranscriptionError> {
        self.outcome
            .clone()
            .map(|(text, confidence)| Command::new(text, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_transcriber() {
        let command = TextTranscriber::new("next page", 0.93)
            .transcribe()
            .await
            .unwrap();
        assert_eq!(command.text(), "next page");
        assert_eq!(command.confidence(), 0.93);
    }

    #[tokio::test]
    async fn test_failing_transcriber() {
        let err = TextTranscriber::failing("microphone unavailable")
            .transcribe()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "microphone unavailable");
    }
}
