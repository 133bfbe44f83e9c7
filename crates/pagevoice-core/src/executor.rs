//! Plan execution with fallback.

use std::fmt;

use tracing::{debug, info, warn};

use pagevoice_protocols::{
    ActionPlan, ActionResult, DomError, DomEvent, ElementHandle, Operation, PageDom, PlannedAction,
};

use crate::error::CommandFailure;

/// Lifecycle of one plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Pending,
    Attempting,
    Succeeded,
    Failed,
}

/// How a value assignment was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMethod {
    FormSubmit,
    ButtonClick,
    EnterKey,
}

impl fmt::Display for SubmitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitMethod::FormSubmit => write!(f, "form submit"),
            SubmitMethod::ButtonClick => write!(f, "submit button"),
            SubmitMethod::EnterKey => write!(f, "Enter key"),
        }
    }
}

/// Outcome of running a plan, with the final state of every entry.
#[derive(Debug, Clone)]
pub struct Execution {
    pub result: ActionResult,
    pub attempts: Vec<AttemptState>,
}

/// Runs action plans against a page. The only component that writes to it.
#[derive(Debug, Clone, Default)]
pub struct ActionExecutor;

impl ActionExecutor {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(&self, page: &dyn PageDom, plan: &ActionPlan) -> ActionResult {
        self.execute_detailed(page, plan).await.result
    }

    /// Try the primary entry, then each fallback, until one succeeds.
    pub async fn execute_detailed(&self, page: &dyn PageDom, plan: &ActionPlan) -> Execution {
        let mut attempts = vec![AttemptState::Pending; plan.len()];

        if plan.is_empty() {
            return Execution {
                result: CommandFailure::no_control(plan.goal()).into(),
                attempts,
            };
        }

        for (index, entry) in plan.entries().iter().enumerate() {
            attempts[index] = AttemptState::Attempting;
            debug!(
                "Attempt {}/{}: {} on {}",
                index + 1,
                plan.len(),
                entry.operation,
                entry.control.describe()
            );

            match self.attempt(page, entry).await {
                Ok(()) => {
                    attempts[index] = AttemptState::Succeeded;
                    let message = plan.goal().success_message();
                    info!("{}", message);
                    return Execution {
                        result: ActionResult::succeeded(message, entry.control.clone()),
                        attempts,
                    };
                }
                Err(e) => {
                    attempts[index] = AttemptState::Failed;
                    if e.is_stale() {
                        warn!("Control {} went stale, trying next candidate", entry.control.handle());
                    } else {
                        warn!("Attempt on {} failed: {}", entry.control.handle(), e);
                    }
                }
            }
        }

        let failure = CommandFailure::execution(plan.goal());
        info!("{}", failure);
        Execution {
            result: failure.into(),
            attempts,
        }
    }

    async fn attempt(&self, page: &dyn PageDom, entry: &PlannedAction) -> Result<(), DomError> {
        let handle = entry.control.handle();
        if !page.is_attached(handle).await? {
            return Err(DomError::StaleElement(handle.to_string()));
        }

        match entry.operation {
            Operation::SetValueAndSubmit { ref value } => {
                page.set_value(handle, value).await?;
                page.dispatch_event(handle, DomEvent::Input).await?;
                page.dispatch_event(handle, DomEvent::Change).await?;
                // Success is optimistic once the value is in place.
                match self.submit(page, handle).await {
                    Ok(method) => debug!("Submitted {} via {}", handle, method),
                    Err(e) => warn!("Submitting {} failed: {}", handle, e),
                }
                Ok(())
            }
            Operation::Click => page.click(handle).await,
            Operation::Scroll => page.scroll_into_view(handle).await,
        }
    }

    /// Submit by the first available method; later methods are not tried
    /// once one has been attempted.
    async fn submit(
        &self,
        page: &dyn PageDom,
        handle: &ElementHandle,
    ) -> Result<SubmitMethod, DomError> {
        if page.submit_enclosing_form(handle).await? {
            return Ok(SubmitMethod::FormSubmit);
        }
        if let Some(button) = page.find_submit_button(handle).await? {
            page.click(&button.handle).await?;
            return Ok(SubmitMethod::ButtonClick);
        }
        for event in DomEvent::key_sequence("Enter") {
            page.dispatch_event(handle, event).await?;
        }
        Ok(SubmitMethod::EnterKey)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
