//! Message contract between the extension and the command host.

use serde::{Deserialize, Serialize};

use crate::action::ActionResult;
use crate::command::Command;

/// Message type of the only request the host understands.
pub const EXECUTE_VOICE_COMMAND: &str = "EXECUTE_VOICE_COMMAND";

/// Request sent by the extension background context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtensionRequest {
    ExecuteVoiceCommand(Command),
}

/// Response returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtensionResponse {
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

impl From<&ActionResult> for ExtensionResponse {
    fn from(result: &ActionResult) -> Self {
        if result.success {
            Self::ok(result.message.clone())
        } else {
            Self::error(result.message.clone())
        }
    }
}
