use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use flimit::{RateLimitExceeded, RateLimitHooks};
use ftooling::{
    ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks,
};

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_call, context)
        }));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_call, context, result, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        }));
    }
}

/// Panics raised by the inner hooks are caught and discarded.
pub struct SafeRateLimitHooks<H> {
    inner: H,
}

impl<H> SafeRateLimitHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> RateLimitHooks for SafeRateLimitHooks<H>
where
    H: RateLimitHooks,
{
    fn on_call_recorded(&self, tool_name: &str, calls_in_window: usize, limit: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_recorded(tool_name, calls_in_window, limit)
        }));
    }

    fn on_rejected(&self, error: &RateLimitExceeded) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_rejected(error)));
    }

    fn on_reset(&self, tool_name: Option<&str>) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_reset(tool_name)));
    }
}
