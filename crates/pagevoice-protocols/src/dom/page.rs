//! The page boundary trait.

use async_trait::async_trait;

use super::types::{DomEvent, ElementHandle, ElementSnapshot};
use crate::error::DomError;

/// Narrow capability surface over a live page.
///
/// Reads are element queries plus attachment checks. Writes are limited to
/// the operations the action executor performs; nothing else may mutate the
/// page.
#[async_trait]
pub trait PageDom: Send + Sync {
    /// URL of the page, for logging.
    async fn url(&self) -> Result<String, DomError>;

    /// All elements matching a CSS selector, in document order.
    ///
    /// Returns [`DomError::InvalidSelector`] when the backend cannot parse
    /// the selector.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, DomError>;

    /// Whether the element is still connected to the document.
    async fn is_attached(&self, element: &ElementHandle) -> Result<bool, DomError>;

    /// Assign the element's `value` property.
    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<(), DomError>;

    /// Dispatch a bubbling synthetic event on the element.
    async fn dispatch_event(&self, element: &ElementHandle, event: DomEvent)
        -> Result<(), DomError>;

    /// Dispatch a click on the element.
    async fn click(&self, element: &ElementHandle) -> Result<(), DomError>;

    /// Dispatch a submit event on the element's enclosing form.
    ///
    /// Returns `false` when the element has no enclosing form.
    async fn submit_enclosing_form(&self, element: &ElementHandle) -> Result<bool, DomError>;

    /// Find a visible submit-labelled button associated with the element:
    /// inside its form first, then anywhere in the document.
    async fn find_submit_button(
        &self,
        element: &ElementHandle,
    ) -> Result<Option<ElementSnapshot>, DomError>;

    /// Scroll the element into view and focus it.
    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DomError>;

    /// Free every element handle issued so far. Handles used afterwards may
    /// fail with [`DomError::StaleElement`].
    async fn release_handles(&self) -> Result<(), DomError> {
        Ok(())
    }
}
