//! Orchestrator module for the resource processor.
//!
//! Runs the consumption loop: every message is decoded, checked against its
//! delivery topic, dispatched, and then committed regardless of the outcome.

mod commit_guard;

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

use resource_processor_shared::ChallengeId;

use crate::consumer::{Consumer, MessagePosition, RawMessage};
use crate::errors::{IngestError, ProcessingError};
use crate::processor::Dispatcher;
use commit_guard::CommitGuard;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How often progress is logged.
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_secs(10),
        }
    }
}

/// Counters kept while the loop runs.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    processed: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    commit_failures: AtomicU64,
}

/// A point-in-time copy of [`ProcessingStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub commit_failures: u64,
}

impl ProcessingStats {
    fn record(&self, outcome: &Result<ChallengeId, ProcessingError>) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        match outcome {
            Ok(_) => self.succeeded.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.failed.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn record_commit_failure(&self) {
        self.commit_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            commit_failures: self.commit_failures.load(Ordering::Relaxed),
        }
    }
}

/// Decode a raw message body as JSON.
///
/// A tombstone (no payload) is treated like an undecodable body.
pub fn decode_message(message: &RawMessage) -> Result<Value, ProcessingError> {
    let payload = message
        .payload
        .as_deref()
        .ok_or(ProcessingError::InvalidJson(None))?;
    serde_json::from_slice(payload).map_err(|e| ProcessingError::InvalidJson(Some(e)))
}

/// Check that the message's declared `topic` equals the delivery topic.
pub fn check_topic(message: &Value, topic: &str) -> Result<(), ProcessingError> {
    let declared = message.get("topic");
    if declared.and_then(Value::as_str) == Some(topic) {
        return Ok(());
    }

    Err(ProcessingError::TopicMismatch {
        declared: declared.map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        actual: topic.to_string(),
    })
}

/// Orchestrator that drives the consumer and the dispatcher.
///
/// The orchestrator:
/// - Subscribes the consumer and pulls batches until the stream ends
/// - Processes messages strictly one at a time, in delivery order
/// - Commits every message exactly once after it has been handled
/// - Stops on Ctrl-C or [`Orchestrator::shutdown`], between messages
pub struct Orchestrator {
    consumer: Arc<dyn Consumer>,
    dispatcher: Dispatcher,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: Option<broadcast::Receiver<()>>,
    stats: Arc<ProcessingStats>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(consumer: Arc<dyn Consumer>, dispatcher: Dispatcher) -> Self {
        Self::with_config(consumer, dispatcher, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        consumer: Arc<dyn Consumer>,
        dispatcher: Dispatcher,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        Self {
            consumer,
            dispatcher,
            config,
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
            stats: Arc::new(ProcessingStats::default()),
        }
    }

    /// Run the consumption loop.
    ///
    /// Blocks until the consumer stream ends or a shutdown is requested. Per-message
    /// failures never end the loop; only a failed subscription does.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<(), IngestError> {
        info!("Starting resource processor orchestrator");

        self.consumer.subscribe()?;

        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .unwrap_or_else(|| self.shutdown_tx.subscribe());

        let signal_tx = self.shutdown_tx.clone();
        let signal_handle = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal");
                let _ = signal_tx.send(());
            }
        });

        info!("Ready to process messages from Kafka");

        let consumer = Arc::clone(&self.consumer);
        let period = self.config.progress_interval;
        let mut progress_timer = interval_at(Instant::now() + period, period);
        progress_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut prev = self.stats.snapshot();
        let mut prev_time = Instant::now();

        // Kept across iterations: a batch call dropped mid-way loses the messages it took.
        let mut next_batch = consumer.next_batch();

        loop {
            tokio::select! {
                batch = &mut next_batch => {
                    next_batch = consumer.next_batch();
                    match batch {
                        Ok(Some(messages)) => {
                            debug!(message_count = messages.len(), "Received batch from consumer");
                            if self.process_batch(messages, &mut shutdown_rx).await {
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("Consumer stream ended");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to receive messages from Kafka");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Anything the pending batch call already took stays uncommitted.
                    info!("Shutting down orchestrator");
                    break;
                }
                _ = progress_timer.tick() => {
                    let current = self.stats.snapshot();
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(prev_time).as_secs_f64();
                    let messages_per_sec = if elapsed_secs > 0.0 {
                        (current.processed.saturating_sub(prev.processed) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    info!(
                        messages_processed = current.processed,
                        messages_succeeded = current.succeeded,
                        messages_failed = current.failed,
                        messages_per_sec = format!("{:.2}", messages_per_sec),
                        "Processing progress"
                    );

                    prev = current;
                    prev_time = now;
                }
            }
        }

        signal_handle.abort();

        let totals = self.stats.snapshot();
        info!(
            messages_processed = totals.processed,
            messages_succeeded = totals.succeeded,
            messages_failed = totals.failed,
            commit_failures = totals.commit_failures,
            "Orchestrator shutdown complete"
        );
        Ok(())
    }

    /// Process a batch in order. Returns `true` if a shutdown stopped it early.
    async fn process_batch(
        &self,
        batch: Vec<RawMessage>,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> bool {
        let total = batch.len();

        for (index, message) in batch.iter().enumerate() {
            if shutdown_requested(shutdown_rx) {
                info!(
                    remaining = total - index,
                    "Shutdown requested, leaving remaining messages uncommitted"
                );
                return true;
            }
            let _ = self.process_message(message).await;
        }

        false
    }

    /// Run one message through the pipeline and commit it.
    pub async fn process_message(
        &self,
        message: &RawMessage,
    ) -> Result<ChallengeId, ProcessingError> {
        let position = &message.position;
        let _commit = CommitGuard::new(self.consumer.as_ref(), position, &self.stats);

        info!(
            topic = %position.topic,
            partition = position.partition,
            offset = position.offset,
            message = %message.payload_text(),
            "Handle Kafka event message"
        );

        let outcome = self.handle(message).await;
        self.stats.record(&outcome);

        match &outcome {
            Ok(challenge_id) => debug!(
                position = %position,
                challenge_id = %challenge_id,
                "Message processed"
            ),
            Err(e) => log_failure(position, e),
        }

        outcome
    }

    async fn handle(&self, message: &RawMessage) -> Result<ChallengeId, ProcessingError> {
        let value = decode_message(message)?;
        check_topic(&value, message.topic())?;
        self.dispatcher.dispatch(&value).await
    }

    /// Request a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// A sender that triggers a graceful shutdown when sent to.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Counters collected so far.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

fn shutdown_requested(shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    match shutdown_rx.try_recv() {
        Ok(()) | Err(TryRecvError::Lagged(_)) | Err(TryRecvError::Closed) => true,
        Err(TryRecvError::Empty) => false,
    }
}

fn log_failure(position: &MessagePosition, err: &ProcessingError) {
    match err {
        ProcessingError::InvalidJson(source) => error!(
            position = %position,
            error = ?source,
            "{}", err
        ),
        ProcessingError::TopicMismatch { .. } | ProcessingError::MissingType => {
            error!(position = %position, "{}", err)
        }
        ProcessingError::Validation(failure) => warn!(
            position = %position,
            violations = failure.violations().len(),
            error = %err,
            "Message failed validation"
        ),
        _ => error!(
            position = %position,
            error = %err,
            details = ?err,
            "Failed to process message"
        ),
    }
}
