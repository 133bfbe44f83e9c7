//! PageVoice core engine.
//!
//! Turns a transcribed command into an action on the current page:
//! - [`classifier`] picks the intent
//! - [`slots`] extracts its parameters
//! - [`discovery`] finds candidate controls on the page
//! - [`planner`] orders them into an action plan
//! - [`executor`] runs the plan, falling back through candidates
//!
//! [`CommandEngine`] chains the stages for one command, and
//! [`VoiceController`] drives a whole voice interaction through the
//! [`CommandSession`] state machine.

pub mod classifier;
pub mod controller;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod executor;
pub mod planner;
pub mod session;
pub mod slots;
pub mod transcriber;

mod text;

pub use classifier::{IntentClassifier, IntentModel};
pub use controller::VoiceController;
pub use discovery::{discover, SelectorRule};
pub use engine::CommandEngine;
pub use error::CommandFailure;
pub use executor::{ActionExecutor, AttemptState, Execution};
pub use planner::ActionPlanner;
pub use session::{CommandSession, SessionState};
pub use slots::extract;
pub use transcriber::{TextTranscriber, Transcriber, TranscriptionError};
