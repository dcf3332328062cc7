//! Runtime wiring helpers for dispatch and observability.

use std::sync::Arc;

use crate::{
    DefaultToolRuntime, GovernanceContextBuilder, GovernedRuntime, McpRateLimiter,
    MetricsObservabilityHooks, RateLimitedRuntime, SafeRateLimitHooks, SafeToolHooks,
    ToolRegistry, TracingObservabilityHooks,
};

pub fn governed_runtime(
    registry: Arc<ToolRegistry>,
    limiter: Arc<McpRateLimiter>,
) -> GovernedRuntime {
    RateLimitedRuntime::new(DefaultToolRuntime::new(registry), limiter)
}

/// Logs tool execution and admission decisions through `tracing`.
pub fn traced(builder: GovernanceContextBuilder) -> GovernanceContextBuilder {
    builder
        .tool_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)))
        .rate_limit_hooks(Arc::new(SafeRateLimitHooks::new(TracingObservabilityHooks)))
}

/// Reports tool execution and admission decisions through `metrics`.
pub fn metered(builder: GovernanceContextBuilder) -> GovernanceContextBuilder {
    builder
        .tool_hooks(Arc::new(SafeToolHooks::new(MetricsObservabilityHooks)))
        .rate_limit_hooks(Arc::new(SafeRateLimitHooks::new(MetricsObservabilityHooks)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Map, Value, json};

    use crate::{
        GovernanceContext, McpRateLimiter, RateLimitConfig, ToolCall, ToolErrorKind,
        ToolExecutionContext, ToolOutput, ToolRegistration, ToolRegistry, ToolRuntime, signature,
    };

    use super::{governed_runtime, metered, traced};

    async fn echo(args: Map<String, Value>, _ctx: ToolExecutionContext) -> ToolOutput {
        Ok(Value::Object(args))
    }

    #[tokio::test]
    async fn governed_runtime_limits_short_and_full_names_together() {
        let mut registry = ToolRegistry::new();
        ToolRegistration::new("dev.fcp.test.echo")
            .register(&mut registry, &signature!(echo(user_id: String)), echo)
            .expect("echo registers");
        let limiter = Arc::new(McpRateLimiter::new(
            RateLimitConfig::new(10, 60)
                .expect("valid config")
                .with_tool_limit("dev.fcp.test.echo", 1),
        ));
        let runtime = governed_runtime(Arc::new(registry), Arc::clone(&limiter));

        let mut admitted = 0;
        for index in 0..10 {
            if runtime
                .execute(
                    ToolCall::new(format!("c{index}"), "echo", json!({})),
                    ToolExecutionContext::new("u"),
                )
                .await
                .is_ok()
            {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);

        let error = runtime
            .execute(
                ToolCall::new("full", "dev.fcp.test.echo", json!({})),
                ToolExecutionContext::new("u"),
            )
            .await
            .expect_err("the full name draws on the same budget");
        assert_eq!(error.kind, ToolErrorKind::RateLimited);
        assert_eq!(limiter.tracked_tools(), vec!["dev.fcp.test.echo"]);
    }

    #[tokio::test]
    async fn observed_builders_still_dispatch() {
        for builder in [
            traced(GovernanceContext::builder()),
            metered(GovernanceContext::builder()),
        ] {
            let context = builder
                .tool(
                    ToolRegistration::new("dev.fcp.test.echo"),
                    &signature!(echo(user_id: String)),
                    echo,
                )
                .expect("echo registers")
                .build();

            let result = context
                .runtime()
                .execute(
                    ToolCall::new("a", "echo", json!({"x": 1})),
                    ToolExecutionContext::new("u"),
                )
                .await
                .expect("dispatch succeeds");
            assert_eq!(result.output, json!({"x": 1, "user_id": "u"}));
        }
    }
}
