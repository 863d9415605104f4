//! Configuration module.
//!
//! Reads settings from the environment and wires the processor's dependencies.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{KafkaSettings, LogSettings, Settings};
