//! Raw message types passed from the consumer to the orchestrator.

use std::borrow::Cow;
use std::fmt;

/// Where a message lives in Kafka.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessagePosition {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

impl MessagePosition {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
        }
    }

    /// The offset to commit once this message is done with.
    pub fn next_offset(&self) -> i64 {
        self.offset + 1
    }
}

impl fmt::Display for MessagePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.topic, self.partition, self.offset)
    }
}

/// A message as received from Kafka, before any decoding.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub position: MessagePosition,
    /// `None` for tombstones.
    pub payload: Option<Vec<u8>>,
}

impl RawMessage {
    pub fn new(
        topic: impl Into<String>,
        partition: i32,
        offset: i64,
        payload: Option<Vec<u8>>,
    ) -> Self {
        Self {
            position: MessagePosition::new(topic, partition, offset),
            payload,
        }
    }

    pub fn topic(&self) -> &str {
        &self.position.topic
    }

    /// Payload as text for logging.
    pub fn payload_text(&self) -> Cow<'_, str> {
        match &self.payload {
            Some(bytes) => String::from_utf8_lossy(bytes),
            None => Cow::Borrowed(""),
        }
    }
}
