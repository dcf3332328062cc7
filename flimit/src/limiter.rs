//! Per-tool sliding-window limiter.
//!
//! Every tool owns an ordered list of accepted-call timestamps. Entries at or
//! before `now - window_seconds` are expired and purged lazily whenever the
//! list is read or written. A tool whose list empties is forgotten.
//!
//! [`McpRateLimiter::check_rate_limit`] and [`McpRateLimiter::record_call`]
//! are each atomic but not atomic with respect to each other, so concurrent
//! callers may overshoot a limit by a small bounded amount. Use
//! [`McpRateLimiter::try_acquire`] when the decision and the append must
//! happen under one lock acquisition.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fcommon::ManualClock;
//! use flimit::{McpRateLimiter, RateLimitConfig};
//!
//! let clock = Arc::new(ManualClock::new(0.0));
//! let limiter = McpRateLimiter::with_clock(RateLimitConfig::new(2, 60).unwrap(), clock.clone());
//!
//! for _ in 0..2 {
//!     limiter.check_rate_limit("t").unwrap();
//!     limiter.record_call("t");
//! }
//! assert!(limiter.check_rate_limit("t").is_err());
//!
//! clock.advance(60.0);
//! assert_eq!(limiter.get_remaining("t"), 2);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use fcommon::{Clock, SystemClock};
use parking_lot::Mutex;

use crate::{NoopRateLimitHooks, RateLimitConfig, RateLimitExceeded, RateLimitHooks};

pub struct McpRateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    hooks: Arc<dyn RateLimitHooks>,
    calls: Mutex<HashMap<String, VecDeque<f64>>>,
}

impl std::fmt::Debug for McpRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpRateLimiter")
            .field("config", &self.config)
            .field("tracked_tools", &self.calls.lock().len())
            .finish()
    }
}

impl Default for McpRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl McpRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            hooks: Arc::new(NoopRateLimitHooks),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RateLimitHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn get_limit_for_tool(&self, tool_name: &str) -> u32 {
        self.config.get_limit_for_tool(tool_name)
    }

    /// Fails when the tool has already used its budget for the current window.
    /// Never records a call.
    pub fn check_rate_limit(&self, tool_name: &str) -> Result<(), RateLimitExceeded> {
        let now = self.clock.now();
        let limit = self.get_limit_for_tool(tool_name);

        let rejection = {
            let mut calls = self.calls.lock();
            match calls.get_mut(tool_name) {
                Some(timestamps) => {
                    self.purge(timestamps, now);
                    let rejection = self.over_limit(tool_name, timestamps, limit, now);
                    if timestamps.is_empty() {
                        calls.remove(tool_name);
                    }
                    rejection
                }
                None => self.over_limit(tool_name, &VecDeque::new(), limit, now),
            }
        };

        match rejection {
            Some(error) => {
                self.hooks.on_rejected(&error);
                Err(error)
            }
            None => Ok(()),
        }
    }

    /// Appends the current time to the tool's history without checking the
    /// limit.
    pub fn record_call(&self, tool_name: &str) {
        let now = self.clock.now();
        let in_window = {
            let mut calls = self.calls.lock();
            let timestamps = calls.entry(tool_name.to_string()).or_default();
            self.purge(timestamps, now);
            timestamps.push_back(now);
            timestamps.len()
        };

        self.hooks
            .on_call_recorded(tool_name, in_window, self.get_limit_for_tool(tool_name));
    }

    /// Checks and records under a single lock acquisition, so admitted calls
    /// never exceed the limit.
    pub fn try_acquire(&self, tool_name: &str) -> Result<(), RateLimitExceeded> {
        let now = self.clock.now();
        let limit = self.get_limit_for_tool(tool_name);

        let outcome = {
            let mut calls = self.calls.lock();
            let timestamps = calls.entry(tool_name.to_string()).or_default();
            self.purge(timestamps, now);
            let outcome = match self.over_limit(tool_name, timestamps, limit, now) {
                Some(error) => Err(error),
                None => {
                    timestamps.push_back(now);
                    Ok(timestamps.len())
                }
            };
            if timestamps.is_empty() {
                calls.remove(tool_name);
            }
            outcome
        };

        match outcome {
            Ok(in_window) => {
                self.hooks.on_call_recorded(tool_name, in_window, limit);
                Ok(())
            }
            Err(error) => {
                self.hooks.on_rejected(&error);
                Err(error)
            }
        }
    }

    pub fn get_remaining(&self, tool_name: &str) -> u32 {
        let limit = self.get_limit_for_tool(tool_name);
        let used = self.call_count(tool_name);
        limit.saturating_sub(u32::try_from(used).unwrap_or(u32::MAX))
    }

    /// Number of recorded calls still inside the window.
    pub fn call_count(&self, tool_name: &str) -> usize {
        let now = self.clock.now();
        let mut calls = self.calls.lock();
        match calls.get_mut(tool_name) {
            Some(timestamps) => {
                self.purge(timestamps, now);
                let count = timestamps.len();
                if count == 0 {
                    calls.remove(tool_name);
                }
                count
            }
            None => 0,
        }
    }

    /// Tools with at least one call still inside the window.
    pub fn tracked_tools(&self) -> Vec<String> {
        self.prune_expired();
        let mut names: Vec<String> = self.calls.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Purges every tool's history and drops tools left with no calls.
    /// Returns how many tools were dropped.
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now();
        let mut calls = self.calls.lock();
        let before = calls.len();
        calls.retain(|_, timestamps| {
            self.purge(timestamps, now);
            !timestamps.is_empty()
        });
        before - calls.len()
    }

    /// Clears one tool's history, or every tool's when `tool_name` is `None`.
    pub fn reset(&self, tool_name: Option<&str>) {
        {
            let mut calls = self.calls.lock();
            match tool_name {
                Some(name) => {
                    calls.remove(name);
                }
                None => calls.clear(),
            }
        }
        self.hooks.on_reset(tool_name);
    }

    fn purge(&self, timestamps: &mut VecDeque<f64>, now: f64) {
        let cutoff = now - self.config.window_seconds() as f64;
        while timestamps.front().is_some_and(|oldest| *oldest <= cutoff) {
            timestamps.pop_front();
        }
    }

    fn over_limit(
        &self,
        tool_name: &str,
        timestamps: &VecDeque<f64>,
        limit: u32,
        now: f64,
    ) -> Option<RateLimitExceeded> {
        if timestamps.len() < limit as usize {
            return None;
        }

        let window = self.config.window_seconds();
        // A zero override rejects with no history; the full window is the
        // honest wait in that case.
        let retry_after = match timestamps.front() {
            Some(oldest) => (oldest + window as f64 - now).max(0.0),
            None => window as f64,
        };

        Some(RateLimitExceeded {
            tool_name: tool_name.to_string(),
            limit,
            window,
            retry_after,
        })
    }
}
