//! Admission control for tool invocations.
//!
//! A [`McpRateLimiter`] enforces a [`RateLimitConfig`] per tool name over a
//! sliding time window and is safe to share across tasks and threads.

mod config;
mod decorator;
mod error;
mod hooks;
mod limiter;
mod shared;

pub mod prelude {
    pub use crate::{
        McpRateLimiter, RateLimitConfig, RateLimitExceeded, RateLimitHooks, RateLimited,
        rate_limited,
    };
}

pub use config::{MAX_CALLS_ENV, RateLimitConfig, TOOL_LIMITS_ENV, WINDOW_SECONDS_ENV};
pub use decorator::{RateLimited, rate_limited};
pub use error::{ConfigError, RateLimitExceeded};
pub use hooks::{NoopRateLimitHooks, RateLimitHooks};
pub use limiter::McpRateLimiter;
pub use shared::{install_shared_limiter, shared_limiter};
