//! Handler contract and the immutable metadata kept for each registered tool.
//!
//! Any `Fn(Map<String, Value>, ToolExecutionContext) -> impl Future` closure or
//! async function is a [`ToolHandler`].
//!
//! ```rust
//! use ftooling::{ToolError, ToolExecutionContext, ToolHandler, required_string};
//! use serde_json::{Map, Value, json};
//!
//! async fn echo(args: Map<String, Value>, _ctx: ToolExecutionContext) -> Result<Value, ToolError> {
//!     Ok(json!({ "echo": required_string(&args, "text")? }))
//! }
//!
//! fn assert_handler<H: ToolHandler>(_handler: &H) {}
//! assert_handler(&echo);
//! ```

use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use fcommon::BoxFuture;
use serde_json::{Map, Value};

use crate::{ToolError, ToolExecutionContext};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub type ToolOutput = Result<Value, ToolError>;

pub trait ToolHandler: Send + Sync {
    fn call(
        &self,
        args: Map<String, Value>,
        context: ToolExecutionContext,
    ) -> ToolFuture<'static, ToolOutput>;
}

impl<F, Fut> ToolHandler for F
where
    F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync,
    Fut: Future<Output = ToolOutput> + Send + 'static,
{
    fn call(
        &self,
        args: Map<String, Value>,
        context: ToolExecutionContext,
    ) -> ToolFuture<'static, ToolOutput> {
        Box::pin(self(args, context))
    }
}

/// One registered capability. Never mutated after registration; the registry
/// hands out shared references.
#[derive(Clone)]
pub struct ToolMetadata {
    pub name: String,
    pub handler: Arc<dyn ToolHandler>,
    pub description: String,
    pub category: Option<String>,
    pub requires_write: bool,
    pub requires_admin: bool,
    /// Parameters supplied by the dispatcher rather than the caller.
    pub dependencies: BTreeSet<String>,
    pub schema: Value,
}

impl ToolMetadata {
    /// Final dot-delimited segment of the name.
    pub fn short_name(&self) -> &str {
        short_name_of(&self.name)
    }

    pub fn required_parameters(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|required| required.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl Debug for ToolMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolMetadata")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("requires_write", &self.requires_write)
            .field("requires_admin", &self.requires_admin)
            .field("dependencies", &self.dependencies)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

pub(crate) fn short_name_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    async fn noop(_args: Map<String, Value>, _ctx: ToolExecutionContext) -> ToolOutput {
        Ok(Value::Null)
    }

    fn metadata(name: &str, schema: Value) -> ToolMetadata {
        ToolMetadata {
            name: name.to_string(),
            handler: Arc::new(noop),
            description: String::new(),
            category: None,
            requires_write: false,
            requires_admin: false,
            dependencies: BTreeSet::new(),
            schema,
        }
    }

    #[test]
    fn short_name_is_last_segment() {
        assert_eq!(
            metadata("dev.fcp.nutrition.get_taste_profile", Value::Null).short_name(),
            "get_taste_profile"
        );
        assert_eq!(metadata("flat", Value::Null).short_name(), "flat");
    }

    #[test]
    fn required_parameters_read_from_schema() {
        let tool = metadata(
            "t",
            json!({"type": "object", "properties": {}, "required": ["a", "b"]}),
        );
        assert_eq!(tool.required_parameters(), vec!["a", "b"]);
        assert!(metadata("t", Value::Null).required_parameters().is_empty());
    }

    #[tokio::test]
    async fn async_functions_are_handlers() {
        let tool = metadata("t", Value::Null);
        let output = tool
            .handler
            .call(Map::new(), ToolExecutionContext::new("user-1"))
            .await
            .expect("noop should succeed");
        assert_eq!(output, Value::Null);
    }

    #[test]
    fn debug_omits_handler() {
        let rendered = format!("{:?}", metadata("dev.fcp.t", Value::Null));
        assert!(rendered.contains("dev.fcp.t"));
        assert!(!rendered.contains("handler"));
    }
}
