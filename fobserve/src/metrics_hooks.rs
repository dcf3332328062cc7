//! Metrics-based observability hooks for tool execution and admission control.
//!
//! ```rust
//! use flimit::RateLimitHooks;
//! use fobserve::MetricsObservabilityHooks;
//!
//! fn accepts_rate_limit_hooks(_hooks: &dyn RateLimitHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_rate_limit_hooks(&hooks);
//! ```

use std::time::Duration;

use flimit::{RateLimitExceeded, RateLimitHooks};
use ftooling::{
    ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "fgovern_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "fgovern_tool_execution_success_total",
            "tool_name" => result.tool_name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "fgovern_tool_execution_duration_seconds",
            "tool_name" => result.tool_name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let tool_name = error
            .tool_name
            .clone()
            .unwrap_or_else(|| tool_call.name.clone());

        metrics::counter!(
            "fgovern_tool_execution_failure_total",
            "tool_name" => tool_name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "fgovern_tool_execution_duration_seconds",
            "tool_name" => tool_name,
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl RateLimitHooks for MetricsObservabilityHooks {
    fn on_call_recorded(&self, tool_name: &str, calls_in_window: usize, limit: u32) {
        metrics::counter!(
            "fgovern_rate_limit_recorded_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
        metrics::gauge!(
            "fgovern_rate_limit_window_utilization",
            "tool_name" => tool_name.to_string()
        )
        .set(utilization(calls_in_window, limit));
    }

    fn on_rejected(&self, error: &RateLimitExceeded) {
        metrics::counter!(
            "fgovern_rate_limit_rejected_total",
            "tool_name" => error.tool_name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "fgovern_rate_limit_retry_after_seconds",
            "tool_name" => error.tool_name.clone()
        )
        .record(error.retry_after);
    }

    fn on_reset(&self, tool_name: Option<&str>) {
        metrics::counter!(
            "fgovern_rate_limit_reset_total",
            "scope" => if tool_name.is_some() { "tool" } else { "all" }
        )
        .increment(1);
    }
}

/// Fraction of the window budget in use; a blocked tool (limit 0) reads as full.
fn utilization(calls_in_window: usize, limit: u32) -> f64 {
    if limit == 0 {
        return 1.0;
    }
    calls_in_window as f64 / f64::from(limit)
}
