//! ES feeder implementation of the re-index provider.
//!
//! The ES feeder service refreshes a challenge's search document when it
//! receives a `PUT` with the challenge id.

mod provider;
mod response;

pub use provider::EsFeederProvider;
pub use response::check_response;
