//! Re-index error types.

use resource_processor_shared::ChallengeId;
use thiserror::Error;

/// Errors from triggering a challenge re-index.
///
/// `Rejected` and `Transport` both mean the downstream update did not happen for
/// that challenge; they share the same message so operators see one failure line
/// per challenge regardless of cause.
#[derive(Debug, Error)]
pub enum ReindexError {
    /// The endpoint answered but `result.status` was missing or outside `[200, 300)`.
    #[error("Failed to update challenge details of id {challenge_id} in Elasticsearch.")]
    Rejected {
        challenge_id: ChallengeId,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The request could not be completed (connect, timeout, body read).
    #[error("Failed to update challenge details of id {challenge_id} in Elasticsearch.")]
    Transport {
        challenge_id: ChallengeId,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ReindexError {
    /// Create a rejected error.
    pub fn rejected(challenge_id: ChallengeId, body: impl Into<String>) -> Self {
        Self::Rejected {
            challenge_id,
            body: body.into(),
        }
    }

    /// Create a client construction error.
    pub fn client(msg: impl Into<String>) -> Self {
        Self::Client(msg.into())
    }

    /// The challenge the failed call was for.
    pub fn challenge_id(&self) -> Option<ChallengeId> {
        match self {
            Self::Rejected { challenge_id, .. } | Self::Transport { challenge_id, .. } => {
                Some(*challenge_id)
            }
            Self::Client(_) => None,
        }
    }

    /// The raw response body, when the endpoint answered.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}
