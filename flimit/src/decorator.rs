//! Rate-limiting wrapper for "invoke tool by name" entry points.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use flimit::{McpRateLimiter, RateLimitConfig, RateLimitExceeded, rate_limited};
//!
//! async fn invoke(tool_name: String, payload: u32) -> Result<String, RateLimitExceeded> {
//!     Ok(format!("{tool_name}:{payload}"))
//! }
//!
//! let limiter = Arc::new(McpRateLimiter::new(RateLimitConfig::new(1, 60).unwrap()));
//! let guarded = rate_limited(limiter, invoke);
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # runtime.block_on(async {
//! assert_eq!(guarded.call("echo", 7).await.unwrap(), "echo:7");
//! assert!(guarded.call("echo", 8).await.is_err());
//! # });
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::{McpRateLimiter, RateLimitExceeded};

/// Wraps `inner` so every call is admitted by the limiter under the name of
/// the tool being invoked.
pub fn rate_limited<F>(limiter: Arc<McpRateLimiter>, inner: F) -> RateLimited<F> {
    RateLimited { limiter, inner }
}

#[derive(Clone)]
pub struct RateLimited<F> {
    limiter: Arc<McpRateLimiter>,
    inner: F,
}

impl<F> RateLimited<F> {
    /// Checks, records, then forwards all arguments to the wrapped callable.
    /// A rejection is returned as-is through `E`'s `From` conversion and the
    /// wrapped callable is not invoked.
    pub async fn call<A, Fut, T, E>(&self, tool_name: &str, args: A) -> Result<T, E>
    where
        F: Fn(String, A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<RateLimitExceeded>,
    {
        self.limiter.check_rate_limit(tool_name)?;
        self.limiter.record_call(tool_name);
        (self.inner)(tool_name.to_string(), args).await
    }

    /// Type name of the wrapped callable, unchanged by wrapping.
    pub fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn limiter(&self) -> &Arc<McpRateLimiter> {
        &self.limiter
    }
}
