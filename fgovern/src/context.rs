//! Process-level container for the tool registry and the rate limiter.
//!
//! Build one [`GovernanceContext`] at startup, registering every tool on the
//! builder, then share it (it is cheap to clone) with whatever dispatches
//! calls.
//!
//! ```rust
//! use fgovern::prelude::*;
//! use serde_json::{Map, Value, json};
//!
//! async fn ping(_args: Map<String, Value>, _ctx: ToolExecutionContext) -> ToolOutput {
//!     Ok(json!("pong"))
//! }
//!
//! let context = GovernanceContext::builder()
//!     .rate_limit_config(RateLimitConfig::new(10, 60).expect("valid config"))
//!     .tool(ToolRegistration::new("dev.fcp.health.ping"), &signature!(ping()), ping)
//!     .expect("unique name")
//!     .build();
//!
//! assert_eq!(context.registry().len(), 1);
//! assert_eq!(context.limiter().get_remaining("dev.fcp.health.ping"), 10);
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::{
    ConfigError, DefaultToolRuntime, HandlerSignature, McpRateLimiter, McpToolDescriptor,
    NoopRateLimitHooks, NoopToolRuntimeHooks, RateLimitConfig, RateLimitHooks, RateLimitedRuntime,
    RegistrationError, ToolHandler, ToolRegistration, ToolRegistry, ToolRuntimeHooks,
};

pub type GovernedRuntime = RateLimitedRuntime<DefaultToolRuntime>;

/// One registry and one limiter, shared by every dispatcher in the process.
#[derive(Clone)]
pub struct GovernanceContext {
    registry: Arc<ToolRegistry>,
    limiter: Arc<McpRateLimiter>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    timeout: Option<Duration>,
}

impl GovernanceContext {
    pub fn builder() -> GovernanceContextBuilder {
        GovernanceContextBuilder::new()
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn limiter(&self) -> &Arc<McpRateLimiter> {
        &self.limiter
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn mcp_tool_list(&self) -> Vec<McpToolDescriptor> {
        self.registry.get_mcp_tool_list()
    }

    /// A dispatcher over this context's registry whose entry point is guarded
    /// by this context's limiter. Budgets are keyed by full tool name.
    pub fn runtime(&self) -> GovernedRuntime {
        let mut runtime = DefaultToolRuntime::new(Arc::clone(&self.registry))
            .with_hooks(Arc::clone(&self.tool_hooks));
        if let Some(timeout) = self.timeout {
            runtime = runtime.with_timeout(timeout);
        }
        RateLimitedRuntime::new(runtime, Arc::clone(&self.limiter))
            .with_hooks(Arc::clone(&self.tool_hooks))
    }
}

pub struct GovernanceContextBuilder {
    registry: ToolRegistry,
    rate_limit_config: RateLimitConfig,
    limiter: Option<Arc<McpRateLimiter>>,
    rate_limit_hooks: Arc<dyn RateLimitHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    timeout: Option<Duration>,
}

impl GovernanceContextBuilder {
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
            rate_limit_config: RateLimitConfig::default(),
            limiter: None,
            rate_limit_hooks: Arc::new(NoopRateLimitHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
            timeout: None,
        }
    }

    /// Registers a tool, failing fast on a duplicate or malformed name.
    pub fn tool<H>(
        mut self,
        registration: ToolRegistration,
        signature: &HandlerSignature,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: ToolHandler + Clone + 'static,
    {
        registration.register(&mut self.registry, signature, handler)?;
        Ok(self)
    }

    pub fn registry_mut(&mut self) -> &mut ToolRegistry {
        &mut self.registry
    }

    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = config;
        self
    }

    /// Reads the rate-limit configuration from the process environment.
    pub fn rate_limit_config_from_env(self) -> Result<Self, ConfigError> {
        Ok(self.rate_limit_config(RateLimitConfig::from_env()?))
    }

    /// Uses an existing limiter; the configured limits and rate-limit hooks
    /// are then ignored.
    pub fn limiter(mut self, limiter: Arc<McpRateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Uses the process-wide limiter from [`flimit::shared_limiter`].
    pub fn shared_limiter(self) -> Self {
        self.limiter(flimit::shared_limiter())
    }

    pub fn rate_limit_hooks(mut self, hooks: Arc<dyn RateLimitHooks>) -> Self {
        self.rate_limit_hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = hooks;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> GovernanceContext {
        let limiter = self.limiter.unwrap_or_else(|| {
            Arc::new(McpRateLimiter::new(self.rate_limit_config).with_hooks(self.rate_limit_hooks))
        });

        GovernanceContext {
            registry: Arc::new(self.registry),
            limiter,
            tool_hooks: self.tool_hooks,
            timeout: self.timeout,
        }
    }
}

impl Default for GovernanceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
