//! Re-index provider trait definition.

use async_trait::async_trait;
use resource_processor_shared::ChallengeId;

use crate::errors::ReindexError;

/// Triggers a search-index refresh for a challenge.
///
/// Implementations make exactly one attempt per call; there is no retry at this
/// layer or above it.
#[async_trait]
pub trait ReindexProvider: Send + Sync {
    /// Ask the downstream service to re-index one challenge.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The service reported success
    /// * `Err(ReindexError)` - The call failed or the service did not report success
    async fn reindex_challenge(&self, challenge_id: ChallengeId) -> Result<(), ReindexError>;
}
