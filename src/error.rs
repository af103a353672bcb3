//! Error handling and custom error types
//!
//! Provides unified error handling across the gateway using thiserror. Every
//! variant is eventually rendered as the same `{error, details}` body by the
//! HTTP layer; the kind survives only in the message text.

use std::error::Error as StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not configured")]
    Configuration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Invalid response format from AI")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by the hosted model provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits to continue.")]
    CreditsExhausted,

    #[error("AI analysis failed: {0}")]
    Status(u16),

    #[error("No analysis content received from AI")]
    MissingContent,

    #[error("Unreadable completion from AI: {0}")]
    InvalidEnvelope(String),
}

impl UpstreamError {
    /// Map a non-success upstream status code to its caller-facing failure.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::CreditsExhausted,
            other => Self::Status(other),
        }
    }
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "ValidationError",
            Error::Configuration(_) | Error::InvalidConfig(_) => "ConfigurationError",
            Error::Upstream(_) => "UpstreamError",
            Error::MalformedResponse(_) => "MalformedResponseError",
            Error::Http(_) => "TransportError",
            Error::Io(_) | Error::Serialization(_) => "InternalError",
        }
    }

    /// Raw detail string: the kind, the message and every underlying source.
    pub fn details(&self) -> String {
        let mut details = format!("{}: {}", self.kind(), self);
        let mut source = self.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            // Variants that embed their source in the message would repeat it.
            if !details.contains(&cause_text) {
                details.push_str(&format!(" (caused by: {})", cause_text));
            }
            source = cause.source();
        }
        details
    }
}

pub type Result<T> = std::result::Result<T, Error>;
