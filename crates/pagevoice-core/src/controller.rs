//! Drives a voice interaction from activation to reported result.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use pagevoice_protocols::{ActionResult, Command, PageDom};

use crate::engine::CommandEngine;
use crate::error::CommandFailure;
use crate::session::{CommandSession, SessionState};
use crate::transcriber::Transcriber;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Owns the command session and wires transcription, the engine and the
/// page together. Every wait across a boundary is bounded by the session
/// timeout.
pub struct VoiceController {
    session: CommandSession,
    transcriber: Arc<dyn Transcriber>,
    engine: CommandEngine,
    page: Arc<dyn PageDom>,
    timeout: Duration,
}

impl VoiceController {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        engine: CommandEngine,
        page: Arc<dyn PageDom>,
    ) -> Self {
        Self {
            session: CommandSession::new(),
            transcriber,
            engine,
            page,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &CommandSession {
        &self.session
    }

    /// Start capturing. Ignored unless idle.
    pub fn press(&mut self) -> bool {
        self.session.press()
    }

    /// Stop capturing and run the captured command.
    pub async fn release(&mut self) -> SessionState {
        self.finish_capture(false).await
    }

    /// Activation was lost mid-capture; same as a release.
    pub async fn pointer_leave(&mut self) -> SessionState {
        self.finish_capture(true).await
    }

    /// Dismiss the reported result and return to idle.
    pub fn acknowledge(&mut self) -> Option<ActionResult> {
        self.session.acknowledge()
    }

    /// Run an already transcribed command through a full session cycle.
    ///
    /// Returns `None` when another interaction is in progress or the
    /// command is empty.
    pub async fn submit(&mut self, command: Command) -> Option<ActionResult> {
        if !self.session.press() {
            return None;
        }
        self.run_captured(command, false).await;
        self.session.acknowledge()
    }

    async fn finish_capture(&mut self, pointer_left: bool) -> SessionState {
        if self.session.state() != SessionState::Capturing {
            return self.session.state();
        }

        let transcribed = timeout(self.timeout, self.transcriber.transcribe()).await;
        match transcribed {
            Ok(Ok(command)) => self.run_captured(command, pointer_left).await,
            Ok(Err(e)) => {
                warn!("Transcription failed: {}", e);
                self.end_capture(pointer_left);
                self.session
                    .complete(CommandFailure::Transcription(e.to_string()).into());
            }
            Err(_) => {
                warn!("Transcription timed out after {:?}", self.timeout);
                self.session.time_out();
            }
        }
        self.session.state()
    }

    async fn run_captured(&mut self, command: Command, pointer_left: bool) {
        if !command.has_text() {
            info!("Nothing captured, back to idle");
            self.session.cancel();
            return;
        }
        self.end_capture(pointer_left);

        let handled = timeout(self.timeout, self.engine.handle(self.page.as_ref(), &command)).await;
        match handled {
            Ok(result) => {
                self.session.complete(result);
            }
            Err(_) => {
                warn!("Command '{}' timed out after {:?}", command.text(), self.timeout);
                self.session.time_out();
            }
        }
    }

    fn end_capture(&mut self, pointer_left: bool) {
        if pointer_left {
            self.session.pointer_leave();
        } else {
            self.session.release();
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
