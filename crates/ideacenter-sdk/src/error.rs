//! Error types for the Idea Center SDK.
//!
//! [`IdeaCenterError`] covers configuration problems, authentication failures,
//! scenario preconditions and assertions, and HTTP transport errors.

use std::fmt;

/// Errors that can occur when talking to the Idea Center API or running the suite.
#[derive(Debug)]
pub enum IdeaCenterError {
    /// Missing or invalid configuration (credentials, base URL, empty token).
    Configuration(String),
    /// The authentication endpoint rejected the credentials or returned no token.
    /// Carries the raw response body.
    Authentication(String),
    /// A scenario could not establish the state it needs before acting.
    Precondition(String),
    /// An expected status or body did not match.
    Assertion(String),
    /// Network or HTTP transport error.
    Network(reqwest::Error),
    /// The response body could not be decoded into the expected shape.
    InvalidResponse(String),
}

impl fmt::Display for IdeaCenterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Self::Authentication(body) => write!(f, "Failed to get JWT token: {}", body),
            Self::Precondition(msg) => write!(f, "Precondition failed: {}", msg),
            Self::Assertion(msg) => write!(f, "Assertion failed: {}", msg),
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for IdeaCenterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for IdeaCenterError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e)
    }
}

impl IdeaCenterError {
    /// Whether this error should stop the whole run rather than a single scenario.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Authentication(_))
    }
}
