//! Error types for the documents API.

use thiserror::Error;

/// Errors returned by a [`DocumentsApi`](super::DocumentsApi) call.
///
/// Variants carry strings rather than the underlying transport errors so the
/// value can be cloned into view state and scripted in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never completed (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("Server responded with status {status}")]
    Server { status: u16 },

    /// The body could not be decoded into the expected shape.
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// The configured base URL cannot address the endpoint.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    #[must_use]
    pub fn server(status: u16) -> Self {
        Self::Server { status }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404 })
    }

    /// Collapse into the reason shown by list and document views.
    #[must_use]
    pub fn reason(&self) -> ListError {
        match self {
            Self::Network(_) | Self::InvalidUrl(_) => ListError::Network,
            Self::Server { status } => ListError::Server(*status),
            Self::Decode(_) => ListError::Decode,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Server {
                status: status.as_u16(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Why a fetch failed, as far as the UI cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    Network,
    Server(u16),
    Decode,
}

impl ListError {
    pub fn as_str(self) -> &'static str {
        match self {
            ListError::Network => "network",
            ListError::Server(_) => "server",
            ListError::Decode => "decode",
        }
    }
}
