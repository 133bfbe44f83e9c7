//! Terminal command outcomes.

use thiserror::Error;

use pagevoice_protocols::{ActionResult, NavDirection, PlanGoal};

/// Why a command cycle ended without acting on the page.
///
/// The `Display` text is the status message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandFailure {
    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Didn't catch that, please try again")]
    LowConfidence,

    #[error("Command not recognized")]
    ClassificationMiss,

    /// The intent was recognized but its parameters could not be read.
    #[error("Command not recognized")]
    SlotExtraction,

    #[error("No search box found on this page")]
    NoSearchBox,

    #[error("No filter controls found on this page")]
    NoFilterControls,

    #[error("No {0} button found on this page")]
    NoNavControl(NavDirection),

    /// Every planned candidate failed.
    #[error("Could not {verb}: page controls are no longer available")]
    Execution { verb: &'static str },

    #[error("Timed out waiting for the page to respond")]
    Timeout,
}

impl CommandFailure {
    /// The "nothing to act on" outcome for a goal.
    pub fn no_control(goal: &PlanGoal) -> Self {
        match goal {
            PlanGoal::Search { .. } => CommandFailure::NoSearchBox,
            PlanGoal::Filter(_) => CommandFailure::NoFilterControls,
            PlanGoal::Navigate { direction } => CommandFailure::NoNavControl(*direction),
        }
    }

    pub fn execution(goal: &PlanGoal) -> Self {
        CommandFailure::Execution { verb: goal.verb() }
    }
}

impl From<CommandFailure> for ActionResult {
    fn from(failure: CommandFailure) -> Self {
        ActionResult::failed(failure.to_string())
    }
}
