//! Native-messaging host for the browser extension.
//!
//! Frames are a 4-byte little-endian length followed by that many bytes of
//! UTF-8 JSON, in both directions.

use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use pagevoice_core::{CommandFailure, VoiceController};
use pagevoice_protocols::{Command, ExtensionRequest, ExtensionResponse, EXECUTE_VOICE_COMMAND};

/// Largest accepted request body.
pub(crate) const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub(crate) enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message of {0} bytes exceeds the 1 MiB limit")]
    MessageTooLarge(usize),
}

/// Read one frame. `None` means the peer closed the stream between frames.
pub(crate) async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, HostError>
where
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u32_le().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if len > MAX_MESSAGE_BYTES {
        return Err(HostError::MessageTooLarge(len));
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

pub(crate) async fn write_frame<W>(writer: &mut W, response: &ExtensionResponse) -> Result<(), HostError>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(response)?;
    writer.write_u32_le(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Decode a request body into the command it carries, or the error text to
/// send back.
pub(crate) fn parse_request(body: &[u8]) -> Result<Command, String> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| format!("Invalid message: {}", e))?;
    let message_type = value.get("type").and_then(Value::as_str).unwrap_or("");
    if message_type != EXECUTE_VOICE_COMMAND {
        return Err(format!("Unsupported message type: {}", message_type));
    }
    match serde_json::from_value::<ExtensionRequest>(value) {
        Ok(ExtensionRequest::ExecuteVoiceCommand(command)) => Ok(command),
        Err(e) => Err(format!("Invalid message: {}", e)),
    }
}

/// Runs each request through the voice controller, one at a time.
pub(crate) struct MessageHost {
    controller: VoiceController,
}

impl MessageHost {
    pub(crate) fn new(controller: VoiceController) -> Self {
        Self { controller }
    }

    pub(crate) async fn handle(&mut self, body: &[u8]) -> ExtensionResponse {
        let command = match parse_request(body) {
            Ok(command) => command,
            Err(message) => {
                warn!("{}", message);
                return ExtensionResponse::error(message);
            }
        };
        debug!("Executing '{}'", command.text());
        match self.controller.submit(command).await {
            Some(result) => ExtensionResponse::from(&result),
            None => ExtensionResponse::error(CommandFailure::ClassificationMiss.to_string()),
        }
    }

    /// Answer frames until the reader is exhausted.
    pub(crate) async fn serve<R, W>(&mut self, reader: &mut R, writer: &mut W) -> Result<(), HostError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Native messaging host ready");
        while let Some(body) = read_frame(reader).await? {
            let response = self.handle(&body).await;
            write_frame(writer, &response).await?;
        }
        info!("Extension closed the connection");
        Ok(())
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
