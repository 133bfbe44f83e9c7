//! Page boundary errors.

use thiserror::Error;

/// Errors raised by a [`PageDom`](crate::PageDom) backend.
#[derive(Debug, Error)]
pub enum DomError {
    /// The selector could not be parsed by the backend.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The element is no longer attached to the document.
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// The page or one of its DOM APIs cannot be reached.
    #[error("Page unavailable: {0}")]
    Unavailable(String),

    /// The backend returned something it should not have.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl DomError {
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        DomError::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error only concerns the element it was raised for.
    pub fn is_stale(&self) -> bool {
        matches!(self, DomError::StaleElement(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_display() {
        let err = DomError::invalid_selector("input[", "unterminated attribute");
        let display = err.to_string();
        assert!(display.contains("input["));
        assert!(display.contains("unterminated attribute"));
    }

    #[test]
    fn test_is_stale() {
        assert!(DomError::StaleElement("el-1".to_string()).is_stale());
        assert!(!DomError::Unavailable("closed".to_string()).is_stale());
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors = vec![
            DomError::invalid_selector("a", "b"),
            DomError::StaleElement("x".to_string()),
            DomError::Unavailable("y".to_string()),
            DomError::Protocol("z".to_string()),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
