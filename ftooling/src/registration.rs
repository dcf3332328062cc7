//! Declarative tool registration.
//!
//! [`ToolRegistration`] collects a tool's identity and permissions, builds its
//! [`ToolMetadata`] (deriving the input schema from the handler signature
//! unless one is given) and registers it. The handler is handed back
//! untouched so it can still be called directly.
//!
//! ```rust
//! use ftooling::{ToolExecutionContext, ToolOutput, ToolRegistration, ToolRegistry, signature};
//! use serde_json::{Map, Value, json};
//!
//! async fn get_taste_profile(args: Map<String, Value>, ctx: ToolExecutionContext) -> ToolOutput {
//!     Ok(json!({"user": ctx.user_id.as_str(), "name": args.get("name")}))
//! }
//!
//! let mut registry = ToolRegistry::new();
//! let handler = ToolRegistration::new("dev.fcp.nutrition.get_taste_profile")
//!     .description("Returns the caller's taste profile")
//!     .category("nutrition")
//!     .register(
//!         &mut registry,
//!         &signature!(get_taste_profile(user_id: String, name: String, count: i64 = 10)),
//!         get_taste_profile,
//!     )
//!     .expect("name is unique");
//!
//! let tool = registry.get("dev.fcp.nutrition.get_taste_profile").unwrap();
//! assert_eq!(tool.schema["required"], json!(["name"]));
//! # let _ = handler;
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    HandlerSignature, RegistrationError, ToolHandler, ToolMetadata, ToolRegistry, derive_schema,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolRegistration {
    name: String,
    description: String,
    category: Option<String>,
    requires_write: bool,
    requires_admin: bool,
    dependencies: BTreeSet<String>,
    schema: Option<Value>,
}

impl ToolRegistration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn requires_write(mut self, requires_write: bool) -> Self {
        self.requires_write = requires_write;
        self
    }

    pub fn requires_admin(mut self, requires_admin: bool) -> Self {
        self.requires_admin = requires_admin;
        self
    }

    /// Marks a parameter as injected by the dispatcher.
    pub fn dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.insert(name.into());
        self
    }

    pub fn dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(names.into_iter().map(Into::into));
        self
    }

    /// Uses `schema` verbatim; no derivation happens.
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(self, signature: &HandlerSignature, handler: Arc<dyn ToolHandler>) -> ToolMetadata {
        let schema = match self.schema {
            Some(schema) => schema,
            None => derive_schema(signature, &self.dependencies),
        };

        ToolMetadata {
            name: self.name,
            handler,
            description: self.description,
            category: self.category,
            requires_write: self.requires_write,
            requires_admin: self.requires_admin,
            dependencies: self.dependencies,
            schema,
        }
    }

    /// Builds and registers the tool, returning `handler` unchanged.
    pub fn register<H>(
        self,
        registry: &mut ToolRegistry,
        signature: &HandlerSignature,
        handler: H,
    ) -> Result<H, RegistrationError>
    where
        H: ToolHandler + Clone + 'static,
    {
        let metadata = self.build(signature, Arc::new(handler.clone()));
        registry.register(metadata)?;
        Ok(handler)
    }
}
