//! Observation points for admission decisions.
//!
//! ```rust
//! use flimit::{NoopRateLimitHooks, RateLimitHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn RateLimitHooks) {}
//!
//! let hooks = NoopRateLimitHooks;
//! assert_hooks_trait(&hooks);
//! ```

use crate::RateLimitExceeded;

pub trait RateLimitHooks: Send + Sync {
    fn on_call_recorded(&self, _tool_name: &str, _calls_in_window: usize, _limit: u32) {}

    fn on_rejected(&self, _error: &RateLimitExceeded) {}

    fn on_reset(&self, _tool_name: Option<&str>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRateLimitHooks;

impl RateLimitHooks for NoopRateLimitHooks {}
