//! Resource Processor Main Entry Point
//!
//! Consumes challenge resource and registration events from Kafka and asks the
//! ES feeder to re-index the affected challenge.

use dotenv::dotenv;
use resource_processor::config::LogSettings;
use resource_processor::{health, Dependencies, ProcessorError, Settings};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing(log: &LogSettings) {
    if log.disabled {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "resource_processor={0},resource_processor_repository={0}",
            log.level
        ))
    });

    if log.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "resource-processor",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "resource-processor",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), ProcessorError> {
    // Load environment variables from .env file
    dotenv().ok();

    // Tracing must be up before the remaining settings are parsed
    init_tracing(&LogSettings::from_env());

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    info!("Starting challenge resource processor");

    let mut deps = match Dependencies::new(&settings) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = health::create_app(deps.health_check.clone());
    let health_addr = deps.health_addr;
    tokio::spawn(async move {
        if let Err(e) = health::run_server(app, health_addr).await {
            error!(error = %e, "Health endpoint stopped");
        }
    });

    match deps.orchestrator.run().await {
        Ok(()) => {
            info!("Resource processor stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Resource processor failed");
            Err(e.into())
        }
    }
}
