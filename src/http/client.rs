use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::RateLimitConfig;

/// Rate-limited HTTP client wrapping reqwest with client-side request pacing.
///
/// The import platform serializes job state transitions per job; pacing on
/// our side keeps bursty workflows (submission fetches every sheet) from
/// tripping the platform's own limits. Responses are never cached - every
/// workflow invocation reads fresh remote state.
#[derive(Debug, Clone)]
pub struct RateLimitedHttpClient {
    client: reqwest::Client,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl RateLimitedHttpClient {
    pub fn new(settings: &RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(settings.requests_per_second.max(1))
            .expect("clamped to at least 1");
        let burst = NonZeroU32::new(settings.burst_capacity.max(1))
            .expect("clamped to at least 1");
        let quota = Quota::per_second(per_second).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: reqwest::Client::new(),
            rate_limiter,
        }
    }

    /// Execute a prepared request once rate limiting permits.
    pub async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        debug!("Executing platform API request with rate limiting");
        request.send().await
    }

    /// Access the underlying reqwest client for request building.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }
}
