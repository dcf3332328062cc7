//! Tracing-based observability hooks for tool execution and admission control.
//!
//! Rate-limit rejections are expected caller behaviour and are logged at
//! `info`. Other caller mistakes log at `warn`; only handler faults reach
//! `error`.
//!
//! ```rust
//! use flimit::RateLimitHooks;
//! use fobserve::TracingObservabilityHooks;
//! use ftooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//! fn accepts_rate_limit_hooks(_hooks: &dyn RateLimitHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! accepts_rate_limit_hooks(&hooks);
//! ```

use std::time::Duration;

use flimit::{RateLimitExceeded, RateLimitHooks};
use ftooling::{
    ToolCall, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult,
    ToolRuntimeHooks,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            user_id = %context.user_id,
            role = ?context.role,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = result.tool_name,
            tool_call_id = tool_call.id,
            user_id = %context.user_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let trace_id = context.trace_id.as_ref().map(|id| id.as_str());
        let elapsed_ms = elapsed.as_millis() as u64;

        if error.kind == ToolErrorKind::RateLimited {
            tracing::info!(
                phase = "tool",
                event = "execution_rejected",
                tool_name = tool_call.name,
                tool_call_id = tool_call.id,
                user_id = %context.user_id,
                trace_id,
                elapsed_ms,
                error = %error
            );
        } else if error.is_user_error() {
            tracing::warn!(
                phase = "tool",
                event = "execution_failure",
                tool_name = tool_call.name,
                tool_call_id = tool_call.id,
                user_id = %context.user_id,
                trace_id,
                elapsed_ms,
                error_kind = ?error.kind,
                retryable = error.retryable,
                error = %error
            );
        } else {
            tracing::error!(
                phase = "tool",
                event = "execution_failure",
                tool_name = tool_call.name,
                tool_call_id = tool_call.id,
                user_id = %context.user_id,
                trace_id,
                elapsed_ms,
                error_kind = ?error.kind,
                retryable = error.retryable,
                error = %error
            );
        }
    }
}

impl RateLimitHooks for TracingObservabilityHooks {
    fn on_call_recorded(&self, tool_name: &str, calls_in_window: usize, limit: u32) {
        tracing::debug!(
            phase = "rate_limit",
            event = "call_recorded",
            tool_name,
            calls_in_window = calls_in_window as u64,
            limit
        );
    }

    fn on_rejected(&self, error: &RateLimitExceeded) {
        tracing::info!(
            phase = "rate_limit",
            event = "rejected",
            tool_name = error.tool_name,
            limit = error.limit,
            window_seconds = error.window,
            retry_after = error.retry_after
        );
    }

    fn on_reset(&self, tool_name: Option<&str>) {
        tracing::debug!(phase = "rate_limit", event = "reset", tool_name);
    }
}
