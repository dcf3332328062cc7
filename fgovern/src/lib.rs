//! Unified facade over the fgovern workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the registry, schema derivation, dispatch, and admission
//! control crates, and provides [`GovernanceContext`] to hold the one
//! registry and one limiter a process needs.

mod macros;

pub mod context;
pub mod prelude;
pub mod runtime;
pub mod util;

pub use fcommon;
pub use flimit;
pub use fobserve;
pub use ftooling;
#[doc(hidden)]
pub use serde_json;

pub use fcommon::{
    BoxFuture, Clock, ManualClock, MetadataMap, Registry, SystemClock, TraceId, UserId,
};
pub use flimit::{
    ConfigError, MAX_CALLS_ENV, McpRateLimiter, NoopRateLimitHooks, RateLimitConfig,
    RateLimitExceeded, RateLimitHooks, RateLimited, TOOL_LIMITS_ENV, WINDOW_SECONDS_ENV,
    install_shared_limiter, rate_limited, shared_limiter,
};
pub use fobserve::{
    MetricsObservabilityHooks, SafeRateLimitHooks, SafeToolHooks, TracingObservabilityHooks,
};
pub use ftooling::{
    CallerRole, DefaultToolRuntime, Dependencies, HandlerSignature, McpToolDescriptor,
    NoopToolRuntimeHooks, ParamType, Parameter, RateLimitedRuntime, RegistrationError,
    SchemaType, ToolCall, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult,
    ToolFilter, ToolFuture, ToolHandler, ToolMetadata, ToolOutput, ToolRegistration, ToolRegistry,
    ToolRuntime, ToolRuntimeHooks, USER_ID_PARAM, derive_schema, into_object, optional_i64,
    optional_string, parse_json_object, parse_json_value, required_string, signature,
};

pub use context::{GovernanceContext, GovernanceContextBuilder, GovernedRuntime};
pub use runtime::{governed_runtime, metered, traced};
pub use util::{admin_context, reader_context, tool_call, writer_context};

#[cfg(test)]
mod tests {
    use crate::CallerRole;

    #[test]
    fn fg_context_macro_applies_role_shorthand() {
        assert_eq!(crate::fg_context!("user-1").role, CallerRole::Reader);
        assert_eq!(crate::fg_context!(writer => "user-1").role, CallerRole::Writer);
        assert_eq!(crate::fg_context!(admin => "user-1").role, CallerRole::Admin);
    }

    #[test]
    fn fg_call_macro_builds_json_arguments() {
        let query = "tempeh";
        let call = crate::fg_call!("call-1", "search", { "query": query, "tags": ["vegan"] });

        assert_eq!(call.id, "call-1");
        assert_eq!(call.arguments["query"], "tempeh");
        assert_eq!(call.arguments["tags"][0], "vegan");
    }

    #[test]
    fn signature_macro_is_reexported() {
        let signature = crate::signature!(search(user_id: String, query: String));
        assert_eq!(signature.parameters.len(), 2);
    }
}
