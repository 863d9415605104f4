//! Dependency initialization and wiring for the resource processor.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::consumer::KafkaConsumer;
use crate::health::HealthCheck;
use crate::orchestrator::Orchestrator;
use crate::processor::{Dispatcher, ResourceHandler};
use crate::{ProcessorError, Settings};
use resource_processor_repository::{EsFeederConfig, EsFeederProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Probe used by the health endpoint.
    pub health_check: Arc<dyn HealthCheck>,
    /// Address the health endpoint listens on.
    pub health_addr: SocketAddr,
}

impl Dependencies {
    /// Initialize all dependencies from the given settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ProcessorError)` - If the HTTP client or the Kafka consumer cannot be created
    pub fn new(settings: &Settings) -> Result<Self, ProcessorError> {
        info!(
            kafka_url = %settings.kafka.url,
            kafka_group_id = %settings.kafka.group_id,
            resource_topic = %settings.resource_topic,
            registration_topic = %settings.registration_topic,
            update_es_url = %settings.update_es_url,
            "Initializing dependencies"
        );

        let feeder_config = EsFeederConfig::new(settings.update_es_url.clone())
            .with_timeout(settings.update_es_timeout);
        let provider = EsFeederProvider::new(feeder_config).map_err(|e| {
            ProcessorError::config(format!("Failed to create ES feeder client: {}", e))
        })?;

        let consumer = Arc::new(KafkaConsumer::new(&settings.kafka, settings.topics())?);

        info!("Kafka consumer created");

        let dispatcher = Dispatcher::new(ResourceHandler::new(Arc::new(provider)));
        let orchestrator = Orchestrator::new(consumer.clone(), dispatcher);

        Ok(Self {
            orchestrator,
            health_check: consumer,
            health_addr: SocketAddr::from(([0, 0, 0, 0], settings.port)),
        })
    }
}
