//! Process-wide limiter for callers that do not hold one explicitly.

use std::sync::{Arc, OnceLock};

use crate::{McpRateLimiter, RateLimitConfig};

static SHARED_LIMITER: OnceLock<Arc<McpRateLimiter>> = OnceLock::new();

/// Returns the process limiter, building it from the environment on first
/// access.
pub fn shared_limiter() -> Arc<McpRateLimiter> {
    Arc::clone(SHARED_LIMITER.get_or_init(|| {
        let config = RateLimitConfig::from_env().unwrap_or_else(|error| {
            tracing::warn!(
                error = %error,
                "invalid rate limit environment, using default policy"
            );
            RateLimitConfig::default()
        });
        Arc::new(McpRateLimiter::new(config))
    }))
}

/// Installs `limiter` as the process limiter. Fails with the already installed
/// instance if one exists.
pub fn install_shared_limiter(
    limiter: Arc<McpRateLimiter>,
) -> Result<Arc<McpRateLimiter>, Arc<McpRateLimiter>> {
    match SHARED_LIMITER.set(Arc::clone(&limiter)) {
        Ok(()) => Ok(limiter),
        Err(_) => Err(shared_limiter()),
    }
}
