//! Admission and configuration errors.
//!
//! ```rust
//! use flimit::RateLimitExceeded;
//!
//! let error = RateLimitExceeded {
//!     tool_name: "dev.fcp.recipes.generate".to_string(),
//!     limit: 3,
//!     window: 60,
//!     retry_after: 12.4,
//! };
//!
//! assert_eq!(error.status().as_u16(), 429);
//! assert_eq!(error.retry_after_secs(), 13);
//! ```

use http::header::{HeaderName, HeaderValue, RETRY_AFTER};
use http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

/// A tool was invoked more often than its window allows.
///
/// Expected and recoverable: the caller should retry after `retry_after`
/// seconds.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "rate limit exceeded for tool '{tool_name}': {limit} calls per {window}s, retry after {retry_after:.1}s"
)]
pub struct RateLimitExceeded {
    pub tool_name: String,
    pub limit: u32,
    pub window: u64,
    pub retry_after: f64,
}

impl RateLimitExceeded {
    pub const ERROR_CODE: &'static str = "rate_limit_exceeded";

    pub fn status(&self) -> StatusCode {
        StatusCode::TOO_MANY_REQUESTS
    }

    /// Whole seconds to wait, rounded up.
    pub fn retry_after_secs(&self) -> u64 {
        self.retry_after.max(0.0).ceil() as u64
    }

    pub fn retry_after_header(&self) -> (HeaderName, HeaderValue) {
        (RETRY_AFTER, HeaderValue::from(self.retry_after_secs()))
    }

    pub fn error_body(&self) -> Value {
        json!({
            "error": Self::ERROR_CODE,
            "message": format!(
                "Rate limit exceeded for tool '{}'. Retry after {} seconds.",
                self.tool_name,
                self.retry_after_secs()
            ),
            "tool_name": self.tool_name,
            "limit": self.limit,
            "window": self.window,
            "retry_after": self.retry_after,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive integer")]
    NonPositive { field: &'static str },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
