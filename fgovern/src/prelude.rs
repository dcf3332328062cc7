//! Common imports for most fgovern applications.

pub use crate::{
    admin_context, governed_runtime, metered, reader_context, tool_call,
    traced, writer_context,
};
pub use crate::{fg_call, fg_context, signature};
pub use crate::{
    CallerRole, DefaultToolRuntime, GovernanceContext, GovernanceContextBuilder, GovernedRuntime,
    HandlerSignature, McpRateLimiter, McpToolDescriptor, Parameter, RateLimitConfig,
    RateLimitExceeded, RateLimitedRuntime, RegistrationError, ToolCall, ToolError, ToolErrorKind,
    ToolExecutionContext, ToolExecutionResult, ToolFilter, ToolHandler, ToolMetadata, ToolOutput,
    ToolRegistration, ToolRegistry, ToolRuntime,
};
