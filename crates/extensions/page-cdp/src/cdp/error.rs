//! CDP error types.

use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not found or not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// No attachable page target.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Script threw; carries the exception description.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// Whether the error means a remote object id no longer resolves.
    pub fn is_missing_object(&self) -> bool {
        matches!(self, CdpError::Protocol { message, .. }
            if message.contains("Could not find object") || message.contains("Cannot find context"))
    }

    /// Whether a script failed on a selector syntax error.
    pub fn is_selector_syntax(&self) -> bool {
        matches!(self, CdpError::JavaScript(message) if message.contains("SyntaxError"))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for pagevoice_protocols::DomError {
    fn from(e: CdpError) -> Self {
        use pagevoice_protocols::DomError;
        match e {
            e if e.is_missing_object() => DomError::StaleElement(e.to_string()),
            CdpError::ConnectionFailed(_)
            | CdpError::ChromeNotAvailable(_)
            | CdpError::WebSocket(_)
            | CdpError::Http(_)
            | CdpError::PageNotFound(_)
            | CdpError::Timeout(_)
            | CdpError::SessionClosed => DomError::Unavailable(e.to_string()),
            other => DomError::Protocol(other.to_string()),
        }
    }
}
