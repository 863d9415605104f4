//! # Resource Processor Repository
//!
//! This crate provides the interface used to trigger a challenge re-index and a
//! concrete implementation that calls the ES feeder service over HTTP.

pub mod config;
pub mod errors;
pub mod es_feeder;
pub mod interfaces;
pub mod types;

pub use config::EsFeederConfig;
pub use errors::ReindexError;
pub use es_feeder::{check_response, EsFeederProvider};
pub use interfaces::ReindexProvider;
pub use types::{ReindexParam, ReindexRequest};
