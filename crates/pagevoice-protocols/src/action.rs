//! Action plans and their results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::control::Control;
use crate::intent::{FilterSlots, NavDirection};

/// What the executor does with a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    /// Assign a value, fire `input`/`change`, then try to submit.
    SetValueAndSubmit { value: String },
    Click,
    /// Scroll the control into view and focus it.
    Scroll,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::SetValueAndSubmit { value } => write!(f, "set value '{}' and submit", value),
            Operation::Click => write!(f, "click"),
            Operation::Scroll => write!(f, "scroll into view"),
        }
    }
}

/// One candidate action in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub control: Control,
    pub operation: Operation,
    pub confidence: f32,
}

/// What a plan is trying to achieve; drives the status message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "goal", rename_all = "lowercase")]
pub enum PlanGoal {
    Search { query: String },
    Filter(FilterSlots),
    Navigate { direction: NavDirection },
}

impl PlanGoal {
    /// Status message reported when an attempt succeeds.
    pub fn success_message(&self) -> String {
        match self {
            PlanGoal::Search { query } => format!("Searched for: {}", query),
            PlanGoal::Filter(slots) => format!("Filter attempted: {}", slots),
            PlanGoal::Navigate { direction } => format!("Went to {} page", direction),
        }
    }

    /// Verb phrase used when every candidate fails.
    pub fn verb(&self) -> &'static str {
        match self {
            PlanGoal::Search { .. } => "search",
            PlanGoal::Filter(_) => "apply filter",
            PlanGoal::Navigate { .. } => "navigate",
        }
    }
}

/// Ordered primary-plus-fallback candidates for one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    goal: PlanGoal,
    entries: Vec<PlannedAction>,
}

impl ActionPlan {
    /// Build a plan; entries are ordered by descending rank score, keeping
    /// the given order among equal scores.
    pub fn new(goal: PlanGoal, mut entries: Vec<PlannedAction>) -> Self {
        entries.sort_by(|a, b| {
            b.control
                .rank_score()
                .partial_cmp(&a.control.rank_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { goal, entries }
    }

    /// Keep only the best `len` candidates.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn goal(&self) -> &PlanGoal {
        &self.goal
    }

    pub fn entries(&self) -> &[PlannedAction] {
        &self.entries
    }

    pub fn primary(&self) -> Option<&PlannedAction> {
        self.entries.first()
    }

    pub fn fallbacks(&self) -> &[PlannedAction] {
        self.entries.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Terminal output of one command cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_control: Option<Control>,
}

impl ActionResult {
    pub fn succeeded(message: impl Into<String>, control: Control) -> Self {
        Self {
            success: true,
            message: message.into(),
            executed_control: Some(control),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            executed_control: None,
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
