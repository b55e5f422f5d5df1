//! Error types for the portal search overlay.
//!
//! This module defines the centralized error type [`PortalSearchError`] and a type
//! alias [`Result`] used throughout the crate. Configuration errors are fatal and
//! surface at initialization; every other variant is local to a single request or
//! transition and is turned into dialog state by the event handler.

use crate::app::modes::DialogState;
use thiserror::Error;

/// The main error type for portal search operations.
///
/// # Examples
///
/// ```
/// use portalsearch::PortalSearchError;
///
/// fn resolve_url(url: Option<&str>) -> Result<String, PortalSearchError> {
///     url.map(str::to_string)
///         .ok_or_else(|| PortalSearchError::Configuration("url is mandatory".to_string()))
/// }
///
/// assert!(resolve_url(None).is_err());
/// ```
#[derive(Debug, Error)]
pub enum PortalSearchError {
    /// Configuration is invalid or missing.
    ///
    /// Raised when the mandatory `url` is absent or blank. Never recovered from:
    /// every derived asset and request URL would be malformed without it.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The search request could not be completed.
    ///
    /// Covers connection failures and non-success HTTP status codes.
    #[error("Network error: {0}")]
    Network(String),

    /// The search request exceeded the client-side timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The payload is neither a result object nor a one-element array wrapping one.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The dialog state machine rejected a transition.
    #[error("Invalid dialog transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// State the dialog was in.
        from: DialogState,
        /// State that was requested.
        to: DialogState,
    },

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PortalSearchError {
    /// Message shown to the user inside the popup when a request fails.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout(secs) => format!("The search service did not answer within {secs} seconds."),
            Self::Network(_) => "The search service could not be reached.".to_string(),
            Self::MalformedResponse(_) | Self::Json(_) => {
                "The search service returned an unreadable answer.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// A specialized `Result` type for portal search operations.
pub type Result<T> = std::result::Result<T, PortalSearchError>;
