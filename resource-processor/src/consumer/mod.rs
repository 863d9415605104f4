//! Consumer module.
//!
//! Receives raw messages from Kafka in batches and commits offsets per message.

mod kafka_consumer;
mod messages;

pub use kafka_consumer::KafkaConsumer;
pub use messages::{MessagePosition, RawMessage};

use async_trait::async_trait;

use crate::errors::IngestError;

/// Source of raw messages with manual offset commits.
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Subscribe to the configured topics.
    fn subscribe(&self) -> Result<(), IngestError>;

    /// Wait for the next batch of messages.
    ///
    /// Returns `Ok(None)` once the stream has ended. Not cancel safe: messages
    /// taken by a dropped call are only seen again after redelivery.
    async fn next_batch(&self) -> Result<Option<Vec<RawMessage>>, IngestError>;

    /// Mark the message at `position` as consumed.
    fn commit(&self, position: &MessagePosition) -> Result<(), IngestError>;
}
