//! Kafka consumer implementation for the resource processor.
//!
//! Consumes resource and registration events from Kafka topics and hands them to
//! the orchestrator in small batches.

use async_trait::async_trait;
use futures::StreamExt;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer as _, StreamConsumer},
    message::{BorrowedMessage, Message as KafkaMessage},
    Offset, TopicPartitionList,
};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::config::KafkaSettings;
use crate::consumer::{Consumer, MessagePosition, RawMessage};
use crate::errors::IngestError;
use crate::health::HealthCheck;

/// How long a health check waits for broker metadata.
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka consumer for resource and registration events.
pub struct KafkaConsumer {
    consumer: StreamConsumer,
    topics: Vec<String>,
    batch_size: usize,
    batch_timeout: Duration,
}

impl KafkaConsumer {
    /// Create a new Kafka consumer for the given topics.
    ///
    /// # Arguments
    ///
    /// * `settings` - Broker, group, TLS and batching settings
    /// * `topics` - Topics to subscribe to
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaConsumer)` - A new consumer instance
    /// * `Err(IngestError)` - If consumer creation fails
    pub fn new(settings: &KafkaSettings, topics: Vec<String>) -> Result<Self, IngestError> {
        let consumer: StreamConsumer = client_config(settings).create()?;

        info!(
            brokers = %settings.url,
            group_id = %settings.group_id,
            tls = settings.tls().is_some(),
            batch_size = settings.batch_size,
            batch_timeout_ms = settings.batch_timeout.as_millis() as u64,
            "Created Kafka consumer with batching"
        );

        Ok(Self {
            consumer,
            topics,
            batch_size: settings.batch_size.max(1),
            batch_timeout: settings.batch_timeout,
        })
    }

    /// Whether broker metadata can be fetched and lists at least one broker.
    pub fn check_connection(&self, timeout: Duration) -> bool {
        match self.consumer.fetch_metadata(None, timeout) {
            Ok(metadata) => !metadata.brokers().is_empty(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch Kafka metadata");
                false
            }
        }
    }
}

/// Build the client configuration for the given settings.
fn client_config(settings: &KafkaSettings) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", &settings.url)
        .set("group.id", &settings.group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest")
        .set("session.timeout.ms", "6000");

    match settings.tls() {
        Some((cert, key)) => {
            config
                .set("security.protocol", "ssl")
                .set("ssl.certificate.pem", cert)
                .set("ssl.key.pem", key);
        }
        None if settings.client_cert.is_some() || settings.client_cert_key.is_some() => {
            warn!("Only one of KAFKA_CLIENT_CERT and KAFKA_CLIENT_CERT_KEY is set, connecting without TLS");
        }
        None => {}
    }

    config
}

fn to_raw(msg: &BorrowedMessage<'_>) -> RawMessage {
    RawMessage::new(
        msg.topic(),
        msg.partition(),
        msg.offset(),
        msg.payload().map(|p| p.to_vec()),
    )
}

#[async_trait]
impl Consumer for KafkaConsumer {
    fn subscribe(&self) -> Result<(), IngestError> {
        let topics: Vec<&str> = self.topics.iter().map(|s| s.as_str()).collect();
        self.consumer.subscribe(&topics)?;

        info!(topics = ?self.topics, "Subscribed to Kafka topics");
        Ok(())
    }

    /// Waits for one message, then keeps collecting until the batch is full or
    /// the batch timeout has passed.
    async fn next_batch(&self) -> Result<Option<Vec<RawMessage>>, IngestError> {
        let mut stream = self.consumer.stream();

        let first = match stream.next().await {
            Some(Ok(msg)) => to_raw(&msg),
            Some(Err(e)) => return Err(e.into()),
            None => {
                info!("Kafka stream ended");
                return Ok(None);
            }
        };

        let mut batch = Vec::with_capacity(self.batch_size);
        batch.push(first);

        let deadline = Instant::now() + self.batch_timeout;
        while batch.len() < self.batch_size {
            match timeout_at(deadline, stream.next()).await {
                Ok(Some(Ok(msg))) => batch.push(to_raw(&msg)),
                Ok(Some(Err(e))) => {
                    // Keep what was collected; the error surfaces on the next poll.
                    warn!(error = %e, "Kafka error while filling batch");
                    break;
                }
                Ok(None) | Err(_) => break,
            }
        }

        debug!(count = batch.len(), "Received batch from Kafka");
        Ok(Some(batch))
    }

    fn commit(&self, position: &MessagePosition) -> Result<(), IngestError> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &position.topic,
            position.partition,
            Offset::Offset(position.next_offset()),
        )?;
        self.consumer.commit(&tpl, CommitMode::Async)?;

        debug!(position = %position, "Committed offset");
        Ok(())
    }
}

impl HealthCheck for KafkaConsumer {
    fn is_healthy(&self) -> bool {
        self.check_connection(METADATA_TIMEOUT)
    }
}
