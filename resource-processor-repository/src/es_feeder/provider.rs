//! ES feeder HTTP provider.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use resource_processor_shared::ChallengeId;

use crate::config::EsFeederConfig;
use crate::errors::ReindexError;
use crate::es_feeder::response::check_response;
use crate::interfaces::ReindexProvider;
use crate::types::ReindexRequest;

/// Re-index provider backed by the ES feeder HTTP endpoint.
///
/// The HTTP status code of the answer is not used; success is decided by the
/// `result.status` field of the response body.
///
/// # Example
///
/// ```ignore
/// use resource_processor_repository::{EsFeederConfig, EsFeederProvider, ReindexProvider};
///
/// let config = EsFeederConfig::new("https://api.topcoder-dev.com/v4/esfeeder/challenges");
/// let provider = EsFeederProvider::new(config)?;
/// provider.reindex_challenge(ChallengeId::new(30075466)).await?;
/// ```
pub struct EsFeederProvider {
    client: Client,
    config: EsFeederConfig,
}

impl EsFeederProvider {
    /// Create a new provider.
    ///
    /// # Returns
    ///
    /// * `Ok(EsFeederProvider)` - A new provider instance
    /// * `Err(ReindexError)` - If the URL is invalid or the client cannot be built
    pub fn new(config: EsFeederConfig) -> Result<Self, ReindexError> {
        Url::parse(&config.url).map_err(|e| {
            ReindexError::client(format!("Invalid ES feeder URL {}: {}", config.url, e))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReindexError::client(e.to_string()))?;

        info!(
            url = %config.url,
            timeout_ms = config.timeout.as_millis() as u64,
            "Created ES feeder provider"
        );

        Ok(Self { client, config })
    }

    /// The configured endpoint.
    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl ReindexProvider for EsFeederProvider {
    #[instrument(skip(self), fields(url = %self.config.url))]
    async fn reindex_challenge(&self, challenge_id: ChallengeId) -> Result<(), ReindexError> {
        let request = ReindexRequest::single(challenge_id);

        let response = self
            .client
            .put(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ReindexError::Transport {
                challenge_id,
                source,
            })?;

        let http_status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ReindexError::Transport {
                challenge_id,
                source,
            })?;

        debug!(
            challenge_id = %challenge_id,
            http_status = http_status.as_u16(),
            body_len = body.len(),
            "Received ES feeder response"
        );

        check_response(challenge_id, &body)
    }
}
