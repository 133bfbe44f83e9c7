//! Transcribed command input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A command as delivered by the transcription collaborator.
///
/// Immutable once created; the engine consumes it exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    text: String,
    #[serde(deserialize_with = "deserialize_confidence")]
    confidence: f32,
    /// Milliseconds since the Unix epoch on the wire, like `Date.now()`.
    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    timestamp: DateTime<Utc>,
}

impl Command {
    /// Create a command stamped with the current time.
    ///
    /// The confidence is clamped to `[0, 1]`; NaN is treated as zero.
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self::at(text, confidence, Utc::now())
    }

    /// Create a command with an explicit timestamp.
    pub fn at(text: impl Into<String>, confidence: f32, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            confidence: clamp_confidence(confidence),
            timestamp,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether the command carries any text worth interpreting.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Command::new("x", 1.7).confidence(), 1.0);
        assert_eq!(Command::new("x", -0.2).confidence(), 0.0);
        assert_eq!(Command::new("x", f32::NAN).confidence(), 0.0);
        assert_eq!(Command::new("x", 0.42).confidence(), 0.42);
    }

    #[test]
    fn test_has_text() {
        assert!(Command::new("next page", 1.0).has_text());
        assert!(!Command::new("   ", 1.0).has_text());
    }

    #[test]
    fn test_deserialize_with_epoch_millis() {
        let json = r#"{"text": "find shoes", "confidence": 0.93, "timestamp": 1700000000000}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command.text(), "find shoes");
        assert_eq!(command.timestamp().timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_deserialize_clamps_confidence() {
        let json = r#"{"text": "find shoes", "confidence": 3.5}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command.confidence(), 1.0);
    }

    #[test]
    fn test_deserialize_without_timestamp() {
        let json = r#"{"text": "next page", "confidence": 1.0}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command.text(), "next page");
    }
}
