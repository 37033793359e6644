use thiserror::Error;

use crate::retry::{IsRetryable, RetryFailure};

/// Errors from the AniList API client.
#[derive(Debug, Error)]
pub enum AniListError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<AniListError>,
    },
}

impl IsRetryable for AniListError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Parse(_) => true,
            Self::Shape(_) | Self::RetriesExhausted { .. } => false,
        }
    }
}

impl From<RetryFailure<AniListError>> for AniListError {
    fn from(failure: RetryFailure<AniListError>) -> Self {
        match failure {
            RetryFailure::Permanent(e) => e,
            RetryFailure::Exhausted { attempts, last } => Self::RetriesExhausted {
                attempts,
                last: Box::new(last),
            },
        }
    }
}
