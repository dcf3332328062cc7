//! Capability layer for registering, describing, and dispatching tools.
//!
//! Tools are registered once at startup through [`ToolRegistration`], which
//! derives each tool's input schema from its [`HandlerSignature`]. The
//! resulting [`ToolRegistry`] is then shared read-only with a
//! [`ToolRuntime`] that resolves and executes calls.

mod args;
mod error;
mod hooks;
mod macros;
mod registration;
mod registry;
mod runtime;
mod schema;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        CallerRole, DefaultToolRuntime, HandlerSignature, Parameter, RateLimitedRuntime,
        RegistrationError, ToolCall, ToolError, ToolErrorKind, ToolExecutionContext,
        ToolExecutionResult, ToolFuture, ToolHandler, ToolMetadata, ToolOutput, ToolRegistration,
        ToolRegistry, ToolRuntime, signature,
    };
}

pub use args::{
    into_object, optional_i64, optional_string, parse_json_object, parse_json_value,
    required_string,
};
pub use error::{RegistrationError, ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registration::ToolRegistration;
pub use registry::{McpToolDescriptor, ToolFilter, ToolRegistry};
pub use runtime::{DefaultToolRuntime, RateLimitedRuntime, ToolRuntime};
pub use schema::{HandlerSignature, ParamType, Parameter, SchemaType, USER_ID_PARAM, derive_schema};
pub use tool::{ToolFuture, ToolHandler, ToolMetadata, ToolOutput};
pub use types::{CallerRole, Dependencies, ToolCall, ToolExecutionContext, ToolExecutionResult};
