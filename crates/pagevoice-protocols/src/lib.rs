//! # PageVoice Protocols
//!
//! Shared data model and interface definitions for PageVoice.
//! Contains only types and traits - no page access or decision logic.
//!
//! ## Core Types
//!
//! - [`Command`] - A transcribed command as produced by the speech collaborator
//! - [`Intent`] / [`Slots`] - Classification output and its parameters
//! - [`Control`] - A discovered interactive element
//! - [`ActionPlan`] / [`ActionResult`] - Planned and executed page actions
//! - [`PageDom`] - The page boundary every backend implements

pub mod action;
pub mod command;
pub mod control;
pub mod dom;
pub mod error;
pub mod intent;
pub mod message;

pub use action::{ActionPlan, ActionResult, Operation, PlanGoal, PlannedAction};
pub use command::Command;
pub use control::{Control, ControlKind};
pub use dom::{BoundingBox, DomEvent, ElementHandle, ElementSnapshot, NodeAttributes, PageDom};
pub use error::DomError;
pub use intent::{Comparator, FilterSlots, Intent, IntentKind, NavDirection, Slots};
pub use message::{ExtensionRequest, ExtensionResponse, EXECUTE_VOICE_COMMAND};
