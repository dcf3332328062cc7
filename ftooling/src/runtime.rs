//! Tool runtime trait, the registry-backed dispatcher, and its rate-limited
//! wrapper.
//!
//! [`DefaultToolRuntime`] resolves a call against the [`ToolRegistry`],
//! enforces the tool's permission flags against the caller's role, injects
//! `user_id`, checks required arguments and declared dependencies, and then
//! runs the handler (optionally under a timeout).
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ftooling::{
//!     DefaultToolRuntime, ToolCall, ToolExecutionContext, ToolOutput, ToolRegistration,
//!     ToolRegistry, ToolRuntime, signature,
//! };
//! use serde_json::{Map, Value, json};
//!
//! async fn whoami(_args: Map<String, Value>, ctx: ToolExecutionContext) -> ToolOutput {
//!     Ok(json!(ctx.user_id.as_str()))
//! }
//!
//! let mut registry = ToolRegistry::new();
//! ToolRegistration::new("dev.fcp.profile.whoami")
//!     .register(&mut registry, &signature!(whoami(user_id: String)), whoami)
//!     .expect("unique name");
//! let runtime = DefaultToolRuntime::new(Arc::new(registry));
//!
//! let result = block_on(runtime.execute(
//!     ToolCall::new("call-1", "whoami", Value::Null),
//!     ToolExecutionContext::new("user-9"),
//! ));
//! assert_eq!(result.unwrap().output, json!("user-9"));
//!
//! # fn block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread()
//! #         .enable_all()
//! #         .build()
//! #         .expect("runtime")
//! #         .block_on(future)
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use flimit::McpRateLimiter;
use futures_timer::Delay;
use futures_util::future::{Either, select};
use serde_json::Value;

use crate::{
    NoopToolRuntimeHooks, ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult,
    ToolFuture, ToolMetadata, ToolOutput, ToolRegistry, ToolRuntimeHooks, USER_ID_PARAM,
    into_object,
};

pub trait ToolRuntime: Send + Sync {
    /// Identifies the runtime in logs. Wrappers forward the inner name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Canonical name of the tool a call named `requested` would run, or
    /// `None` when this runtime cannot serve it.
    fn resolve_tool_name(&self, requested: &str) -> Option<String> {
        Some(requested.to_string())
    }

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
    timeout: Option<Duration>,
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
            timeout: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Handlers still running after `timeout` fail with a retryable
    /// [`ToolErrorKind::Timeout`](crate::ToolErrorKind::Timeout).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn dispatch(
        &self,
        tool_call: &ToolCall,
        context: ToolExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        let tool = self.registry.resolve(&tool_call.name).ok_or_else(|| {
            ToolError::not_found(format!("tool '{}' is not registered", tool_call.name))
        })?;

        authorize(&tool, &context)?;
        let mut args = into_object(tool_call.arguments.clone())?;
        args.insert(
            USER_ID_PARAM.to_string(),
            Value::String(context.user_id.as_str().to_string()),
        );

        if let Some(missing) = tool
            .required_parameters()
            .into_iter()
            .find(|parameter| !args.contains_key(*parameter))
        {
            return Err(ToolError::invalid_arguments(format!(
                "missing required argument '{missing}'"
            ))
            .with_tool_name(tool.name.clone()));
        }

        if let Some(missing) = tool
            .dependencies
            .iter()
            .find(|dependency| !context.dependencies.contains(dependency.as_str()))
        {
            return Err(ToolError::execution(format!(
                "dependency '{missing}' is not available"
            ))
            .with_tool_name(tool.name.clone()));
        }

        let output = self
            .run_handler(&tool, args, context)
            .await
            .map_err(|error| {
                if error.tool_name.is_some() {
                    error
                } else {
                    error.with_tool_name(tool.name.clone())
                }
            })?;

        Ok(ToolExecutionResult::new(
            tool_call.id.clone(),
            tool.name.clone(),
            output,
        ))
    }

    async fn run_handler(
        &self,
        tool: &ToolMetadata,
        args: serde_json::Map<String, Value>,
        context: ToolExecutionContext,
    ) -> ToolOutput {
        let future = tool.handler.call(args, context);
        let Some(limit) = self.timeout else {
            return future.await;
        };

        match select(future, Delay::new(limit)).await {
            Either::Left((output, _)) => output,
            Either::Right(((), _)) => Err(ToolError::timeout(format!(
                "tool '{}' did not finish within {}ms",
                tool.name,
                limit.as_millis()
            ))),
        }
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn resolve_tool_name(&self, requested: &str) -> Option<String> {
        self.registry.resolve(requested).map(|tool| tool.name.clone())
    }

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_execution_start(&tool_call, &context);

            let outcome = self
                .dispatch(&tool_call, context.clone())
                .await
                .map_err(|error| error.with_tool_call_id(tool_call.id.clone()));

            match &outcome {
                Ok(result) => {
                    self.hooks
                        .on_execution_success(&tool_call, &context, result, started.elapsed())
                }
                Err(error) => {
                    self.hooks
                        .on_execution_failure(&tool_call, &context, error, started.elapsed())
                }
            }
            outcome
        })
    }
}

fn authorize(tool: &ToolMetadata, context: &ToolExecutionContext) -> Result<(), ToolError> {
    if tool.requires_admin && !context.role.is_admin() {
        return Err(
            ToolError::unauthorized(format!("tool '{}' requires admin access", tool.name))
                .with_tool_name(tool.name.clone()),
        );
    }
    if tool.requires_write && !context.role.can_write() {
        return Err(
            ToolError::unauthorized(format!("tool '{}' requires write access", tool.name))
                .with_tool_name(tool.name.clone()),
        );
    }
    Ok(())
}

/// Checks and records every call against a shared limiter before handing it
/// to the wrapped runtime. Rejected calls never reach the inner runtime.
///
/// Admission is keyed on the canonical tool name reported by the inner
/// runtime, so a short name and its full dotted name share one budget. Calls
/// the inner runtime cannot resolve pass straight through without touching
/// the limiter.
#[derive(Clone)]
pub struct RateLimitedRuntime<R> {
    inner: R,
    limiter: Arc<McpRateLimiter>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl<R> RateLimitedRuntime<R> {
    pub fn new(inner: R, limiter: Arc<McpRateLimiter>) -> Self {
        Self {
            inner,
            limiter,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    /// Hooks told about calls rejected here. Admitted calls are reported by
    /// the inner runtime.
    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn limiter(&self) -> &Arc<McpRateLimiter> {
        &self.limiter
    }
}

impl<R> ToolRuntime for RateLimitedRuntime<R>
where
    R: ToolRuntime,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn resolve_tool_name(&self, requested: &str) -> Option<String> {
        self.inner.resolve_tool_name(requested)
    }

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            let Some(tool_name) = self.inner.resolve_tool_name(&tool_call.name) else {
                return self.inner.execute(tool_call, context).await;
            };

            let started = Instant::now();
            if let Err(exceeded) = self.limiter.check_rate_limit(&tool_name) {
                let error =
                    ToolError::rate_limited(exceeded).with_tool_call_id(tool_call.id.clone());
                self.hooks.on_execution_start(&tool_call, &context);
                self.hooks
                    .on_execution_failure(&tool_call, &context, &error, started.elapsed());
                return Err(error);
            }
            self.limiter.record_call(&tool_name);
            self.inner.execute(tool_call, context).await
        })
    }
}
