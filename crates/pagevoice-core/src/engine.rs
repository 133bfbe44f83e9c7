//! One command through the whole pipeline.

use std::sync::Arc;

use tracing::{debug, info, warn};

use pagevoice_protocols::{ActionResult, Command, Control, Intent, PageDom, Slots};

use crate::classifier::{IntentClassifier, IntentModel};
use crate::discovery::discover;
use crate::error::CommandFailure;
use crate::executor::ActionExecutor;
use crate::planner::{control_kind_for, goal_for, ActionPlanner};
use crate::slots::extract;

/// Classify, extract, discover, plan and execute.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    classifier: IntentClassifier,
    planner: ActionPlanner,
    executor: ActionExecutor,
    min_command_confidence: f32,
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandEngine {
    pub fn new() -> Self {
        Self {
            classifier: IntentClassifier::new(),
            planner: ActionPlanner::new(),
            executor: ActionExecutor::new(),
            min_command_confidence: 0.0,
        }
    }

    /// Reject transcriptions below this confidence without classifying them.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_command_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Cap search and navigation plans at `max_candidates` entries.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.planner = self.planner.with_max_candidates(max_candidates);
        self
    }

    pub fn with_model(mut self, model: Arc<dyn IntentModel>, margin: f32) -> Self {
        self.classifier = self.classifier.with_model(model, margin);
        self
    }

    /// Run one command against the page. Every failure becomes a typed,
    /// user-facing result.
    pub async fn handle(&self, page: &dyn PageDom, command: &Command) -> ActionResult {
        let result = match self.run(page, command).await {
            Ok(result) => result,
            Err(failure) => {
                info!("Command '{}' failed: {}", command.text(), failure);
                failure.into()
            }
        };
        if let Err(e) = page.release_handles().await {
            warn!("Failed to release element handles: {}", e);
        }
        result
    }

    /// Classification and slot extraction only; never touches the page.
    pub fn interpret(&self, command: &Command) -> Result<(Intent, Slots), CommandFailure> {
        if command.confidence() < self.min_command_confidence {
            return Err(CommandFailure::LowConfidence);
        }

        let intent = self.classifier.classify(command.text());
        if intent.is_unknown() {
            return Err(CommandFailure::ClassificationMiss);
        }
        debug!("Classified '{}' as {} ({:.2})", command.text(), intent.kind, intent.confidence);

        let slots = extract(command.text(), &intent).ok_or(CommandFailure::SlotExtraction)?;
        if matches!(slots, Slots::Search { ref query } if query.is_empty()) {
            return Err(CommandFailure::SlotExtraction);
        }
        debug!("Slots: {:?}", slots);
        Ok((intent, slots))
    }

    /// Candidate controls for an interpreted command.
    pub async fn discover_for(&self, page: &dyn PageDom, slots: &Slots) -> Vec<Control> {
        discover(page, control_kind_for(slots)).await
    }

    async fn run(&self, page: &dyn PageDom, command: &Command) -> Result<ActionResult, CommandFailure> {
        let (intent, slots) = self.interpret(command)?;
        let controls = self.discover_for(page, &slots).await;
        let plan = self
            .planner
            .plan(&intent, &slots, &controls)
            .ok_or_else(|| CommandFailure::no_control(&goal_for(&slots)))?;

        let result = self.executor.execute(page, &plan).await;
        if result.success {
            info!("Command '{}': {}", command.text(), result.message);
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
