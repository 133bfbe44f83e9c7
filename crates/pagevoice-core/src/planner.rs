//! Action planning: intent + slots + controls into an ordered plan.

use tracing::debug;

use pagevoice_protocols::{
    ActionPlan, Control, ControlKind, Intent, Operation, PlanGoal, PlannedAction, Slots,
};

/// Deterministic planner; performs no I/O.
///
/// Search and navigation plans keep every matching control unless a cap is
/// set with [`with_max_candidates`](Self::with_max_candidates).
#[derive(Debug, Clone, Default)]
pub struct ActionPlanner {
    max_candidates: Option<usize>,
}

impl ActionPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the plan length; zero is treated as one.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = Some(max_candidates.max(1));
        self
    }

    pub fn max_candidates(&self) -> Option<usize> {
        self.max_candidates
    }

    /// Build a plan, or `None` when no control of the relevant kind exists.
    pub fn plan(&self, intent: &Intent, slots: &Slots, controls: &[Control]) -> Option<ActionPlan> {
        let goal = goal_for(slots);
        let entries: Vec<PlannedAction> = match slots {
            Slots::Search { query } => of_kind(controls, ControlKind::SearchInput)
                .map(|control| PlannedAction {
                    control: control.clone(),
                    operation: Operation::SetValueAndSubmit {
                        value: query.clone(),
                    },
                    confidence: entry_confidence(intent, control),
                })
                .collect(),
            Slots::Filter(filter) => of_kind(controls, ControlKind::FilterControl)
                .map(|control| PlannedAction {
                    control: control.clone(),
                    operation: filter_operation(control, &filter.value_text()),
                    confidence: entry_confidence(intent, control),
                })
                .collect(),
            Slots::Navigate { direction } => of_kind(controls, ControlKind::NavControl)
                .filter(|control| control.direction() == Some(*direction))
                .map(|control| PlannedAction {
                    control: control.clone(),
                    operation: Operation::Click,
                    confidence: entry_confidence(intent, control),
                })
                .collect(),
        };

        if entries.is_empty() {
            debug!("No controls to plan {} with", goal.verb());
            return None;
        }

        // Filtering is best effort: only the top control is tried.
        let cap = match slots {
            Slots::Filter(_) => Some(1),
            _ => self.max_candidates,
        };
        let mut plan = ActionPlan::new(goal, entries);
        if let Some(cap) = cap {
            plan.truncate(cap);
        }
        debug!(
            "Planned {} candidate(s); primary {} on {}",
            plan.len(),
            plan.entries()[0].operation,
            plan.entries()[0].control.describe()
        );
        Some(plan)
    }
}

/// The goal a set of slots describes.
pub fn goal_for(slots: &Slots) -> PlanGoal {
    match slots {
        Slots::Search { query } => PlanGoal::Search {
            query: query.clone(),
        },
        Slots::Filter(filter) => PlanGoal::Filter(filter.clone()),
        Slots::Navigate { direction } => PlanGoal::Navigate {
            direction: *direction,
        },
    }
}

/// The control kind discovery should look for.
pub fn control_kind_for(slots: &Slots) -> ControlKind {
    match slots {
        Slots::Search { .. } => ControlKind::SearchInput,
        Slots::Filter(_) => ControlKind::FilterControl,
        Slots::Navigate { .. } => ControlKind::NavControl,
    }
}

fn of_kind(controls: &[Control], kind: ControlKind) -> impl Iterator<Item = &Control> {
    controls.iter().filter(move |c| c.kind() == kind)
}

fn entry_confidence(intent: &Intent, control: &Control) -> f32 {
    (intent.confidence as f64 * control.rank_score()).clamp(0.0, 1.0) as f32
}

/// Text fields get the value typed in; clickable controls get clicked;
/// anything else is brought into view for the user.
fn filter_operation(control: &Control, value: &str) -> Operation {
    let clickable = matches!(control.tag_name(), "button" | "a" | "select")
        || control.attribute("role") == Some("button")
        || matches!(control.attribute("type"), Some("checkbox" | "radio"));
    if control.accepts_text() && control.tag_name() != "select" {
        Operation::SetValueAndSubmit {
            value: value.to_string(),
        }
    } else if clickable {
        Operation::Click
    } else {
        Operation::Scroll
    }
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
