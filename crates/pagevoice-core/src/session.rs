//! Voice interaction state machine.

use std::fmt;

use tracing::debug;
use uuid::Uuid;

use pagevoice_protocols::ActionResult;

use crate::error::CommandFailure;

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for activation.
    Idle,
    /// Capturing speech.
    Capturing,
    /// Running the command pipeline.
    Processing,
    /// Showing the result.
    Reporting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Capturing => write!(f, "capturing"),
            SessionState::Processing => write!(f, "processing"),
            SessionState::Reporting => write!(f, "reporting"),
        }
    }
}

/// The single command session.
///
/// Only transitions are exposed; each returns whether it applied. Calls
/// that do not fit the current state are ignored.
#[derive(Debug)]
pub struct CommandSession {
    state: SessionState,
    id: Option<Uuid>,
    result: Option<ActionResult>,
}

impl Default for CommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            id: None,
            result: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the interaction in progress, if any.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// The result being reported.
    pub fn result(&self) -> Option<&ActionResult> {
        self.result.as_ref()
    }

    /// `Idle → Capturing`; starts a new interaction.
    pub fn press(&mut self) -> bool {
        if self.state != SessionState::Idle {
            debug!("Ignoring activation while {}", self.state);
            return false;
        }
        self.id = Some(Uuid::new_v4());
        self.result = None;
        self.transition(SessionState::Capturing)
    }

    /// `Capturing → Processing` on release.
    pub fn release(&mut self) -> bool {
        self.finish_capture()
    }

    /// `Capturing → Processing` when activation is lost.
    pub fn pointer_leave(&mut self) -> bool {
        self.finish_capture()
    }

    /// `Capturing → Idle` when nothing usable was captured.
    pub fn cancel(&mut self) -> bool {
        if self.state != SessionState::Capturing {
            return false;
        }
        self.id = None;
        self.transition(SessionState::Idle)
    }

    /// `Processing → Reporting` with the pipeline's result.
    pub fn complete(&mut self, result: ActionResult) -> bool {
        if self.state != SessionState::Processing {
            return false;
        }
        self.result = Some(result);
        self.transition(SessionState::Reporting)
    }

    /// Force `Reporting` with a timeout error from any active state.
    pub fn time_out(&mut self) -> bool {
        if !matches!(self.state, SessionState::Capturing | SessionState::Processing) {
            return false;
        }
        self.result = Some(CommandFailure::Timeout.into());
        self.transition(SessionState::Reporting)
    }

    /// `Reporting → Idle`, handing back the reported result.
    pub fn acknowledge(&mut self) -> Option<ActionResult> {
        if self.state != SessionState::Reporting {
            return None;
        }
        self.id = None;
        self.transition(SessionState::Idle);
        self.result.take()
    }

    fn finish_capture(&mut self) -> bool {
        if self.state != SessionState::Capturing {
            return false;
        }
        self.transition(SessionState::Processing)
    }

    fn transition(&mut self, next: SessionState) -> bool {
        debug!("Session {}: {} -> {}", self.id_label(), self.state, next);
        self.state = next;
        true
    }

    fn id_label(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut session = CommandSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.press());
        assert!(session.id().is_some());
        assert_eq!(session.state(), SessionState::Capturing);
        assert!(session.release());
        assert_eq!(session.state(), SessionState::Processing);
        assert!(session.complete(ActionResult::failed("Command not recognized")));
        assert_eq!(session.state(), SessionState::Reporting);
        assert_eq!(session.result().unwrap().message, "Command not recognized");

        let result = session.acknowledge().unwrap();
        assert!(!result.success);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.id().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_press_ignored_unless_idle() {
        let mut session = CommandSession::new();
        session.press();
        let id = session.id();
        assert!(!session.press());
        assert_eq!(session.id(), id);

        session.release();
        assert!(!session.press());
        assert_eq!(session.state(), SessionState::Processing);

        session.complete(ActionResult::failed("x"));
        assert!(!session.press());
        assert_eq!(session.state(), SessionState::Reporting);
    }

    #[test]
    fn test_pointer_leave_finalizes_capture() {
        let mut session = CommandSession::new();
        session.press();
        assert!(session.pointer_leave());
        assert_eq!(session.state(), SessionState::Processing);
        assert!(!session.release());
    }

    #[test]
    fn test_cancel_empty_capture() {
        let mut session = CommandSession::new();
        session.press();
        assert!(session.cancel());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.id().is_none());
        assert!(!session.cancel());
    }

    #[test]
    fn test_time_out_reports_error() {
        let mut session = CommandSession::new();
        session.press();
        session.release();
        assert!(session.time_out());
        assert_eq!(session.state(), SessionState::Reporting);
        assert_eq!(
            session.result().unwrap().message,
            "Timed out waiting for the page to respond"
        );
        assert!(!session.time_out());
        assert!(!session.complete(ActionResult::failed("late")));
    }

    #[test]
    fn test_out_of_order_transitions_ignored() {
        let mut session = CommandSession::new();
        assert!(!session.release());
        assert!(!session.complete(ActionResult::failed("x")));
        assert!(session.acknowledge().is_none());
        assert!(!session.time_out());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_each_press_gets_new_id() {
        let mut session = CommandSession::new();
        session.press();
        let first = session.id();
        session.cancel();
        session.press();
        assert_ne!(session.id(), first);
    }
}
