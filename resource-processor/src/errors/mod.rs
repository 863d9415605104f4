//! Error types for the resource processor.

use thiserror::Error;

use resource_processor_repository::ReindexError;
use resource_processor_shared::{UnknownMessageKind, ValidationFailure};

/// Errors from the Kafka plumbing and the health endpoint.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Kafka-related error.
    #[error("Kafka error: {0}")]
    KafkaError(String),

    /// Health endpoint could not be served.
    #[error("Health check error: {0}")]
    HealthError(String),
}

impl IngestError {
    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::KafkaError(msg.into())
    }

    /// Create a health endpoint error.
    pub fn health(msg: impl Into<String>) -> Self {
        Self::HealthError(msg.into())
    }
}

impl From<rdkafka::error::KafkaError> for IngestError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::KafkaError(err.to_string())
    }
}

/// Why a single message produced no re-index.
///
/// None of these stop the consumption loop; they are logged and the message's
/// offset is committed anyway.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The payload is absent or is not valid JSON.
    #[error("Invalid message JSON.")]
    InvalidJson(#[source] Option<serde_json::Error>),

    /// The envelope's `topic` differs from the topic the message was read from.
    #[error(
        "The message topic {} doesn't match the Kafka topic {}.",
        .declared.as_deref().unwrap_or("<missing>"),
        .actual
    )]
    TopicMismatch {
        declared: Option<String>,
        actual: String,
    },

    /// `payload.type` is absent or empty.
    #[error("The message misses payload.type")]
    MissingType,

    /// `payload.type` is not one of the known kinds.
    #[error(transparent)]
    UnknownType(#[from] UnknownMessageKind),

    /// The message does not match its kind's schema.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The re-index call did not succeed.
    #[error(transparent)]
    Downstream(#[from] ReindexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_processor_shared::ChallengeId;

    #[test]
    fn test_messages() {
        assert_eq!(
            ProcessingError::InvalidJson(None).to_string(),
            "Invalid message JSON."
        );
        assert_eq!(
            ProcessingError::TopicMismatch {
                declared: Some("a".to_string()),
                actual: "b".to_string()
            }
            .to_string(),
            "The message topic a doesn't match the Kafka topic b."
        );
        assert_eq!(
            ProcessingError::MissingType.to_string(),
            "The message misses payload.type"
        );
        assert_eq!(
            ProcessingError::from(UnknownMessageKind("invalid".to_string())).to_string(),
            "Invalid payload type: invalid"
        );
        assert_eq!(
            ProcessingError::from(ReindexError::rejected(ChallengeId::new(7), "{}")).to_string(),
            "Failed to update challenge details of id 7 in Elasticsearch."
        );
    }
}
