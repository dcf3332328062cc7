//! Tool registry keyed by full dotted name, with a short-name index.
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//!
//! use ftooling::{ToolExecutionContext, ToolMetadata, ToolRegistry, ToolOutput};
//! use serde_json::{Map, Value, json};
//!
//! async fn noop(_args: Map<String, Value>, _ctx: ToolExecutionContext) -> ToolOutput {
//!     Ok(Value::Null)
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register(ToolMetadata {
//!         name: "dev.fcp.nutrition.get_taste_profile".to_string(),
//!         handler: Arc::new(noop),
//!         description: "Reads a taste profile".to_string(),
//!         category: Some("nutrition".to_string()),
//!         requires_write: false,
//!         requires_admin: false,
//!         dependencies: BTreeSet::new(),
//!         schema: json!({"type": "object", "properties": {}, "required": []}),
//!     })
//!     .expect("first registration succeeds");
//!
//! assert!(registry.get_by_short_name("get_taste_profile").is_some());
//! assert_eq!(registry.get_categories(), vec!["nutrition".to_string()]);
//! ```

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use fcommon::Registry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RegistrationError;
use crate::ToolMetadata;

/// Filters for [`ToolRegistry::list_tools`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolFilter {
    pub category: Option<String>,
    pub requires_write: Option<bool>,
    pub requires_admin: Option<bool>,
}

impl ToolFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn requires_write(mut self, requires_write: bool) -> Self {
        self.requires_write = Some(requires_write);
        self
    }

    pub fn requires_admin(mut self, requires_admin: bool) -> Self {
        self.requires_admin = Some(requires_admin);
        self
    }

    pub fn matches(&self, tool: &ToolMetadata) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| tool.category.as_ref() == Some(category))
            && self
                .requires_write
                .is_none_or(|flag| tool.requires_write == flag)
            && self
                .requires_admin
                .is_none_or(|flag| tool.requires_admin == flag)
    }
}

/// Protocol-facing description of a tool as shown to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<ToolMetadata>>,
    short_names: Registry<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when a tool with the same full name exists. A short name shared
    /// with an earlier tool is re-pointed at this one.
    pub fn register(
        &mut self,
        metadata: ToolMetadata,
    ) -> Result<Arc<ToolMetadata>, RegistrationError> {
        validate_name(&metadata.name)?;
        if self.tools.contains_key(metadata.name.as_str()) {
            return Err(RegistrationError::DuplicateTool {
                name: metadata.name,
            });
        }

        let name = metadata.name.clone();
        let short_name = metadata.short_name().to_string();
        let metadata = Arc::new(metadata);

        if let Some(previous) = self.short_names.insert(short_name.clone(), name.clone()) {
            tracing::warn!(
                short_name = %short_name,
                previous = %previous,
                replacement = %name,
                "short tool name now resolves to a different tool"
            );
        }
        self.tools.insert(name.clone(), Arc::clone(&metadata));

        tracing::info!(
            tool_name = %name,
            category = metadata.category.as_deref(),
            requires_write = metadata.requires_write,
            requires_admin = metadata.requires_admin,
            "registered tool"
        );
        Ok(metadata)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ToolMetadata>> {
        self.tools.get(name).cloned()
    }

    pub fn get_by_short_name(&self, short_name: &str) -> Option<Arc<ToolMetadata>> {
        self.short_names
            .get(short_name)
            .and_then(|name| self.get(name))
    }

    /// Full name first, then short name.
    pub fn resolve(&self, name: &str) -> Option<Arc<ToolMetadata>> {
        self.get(name).or_else(|| self.get_by_short_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Order is unspecified; use [`ToolRegistry::get_mcp_tool_list`] for a
    /// stable order.
    pub fn list_tools(&self, filter: &ToolFilter) -> Vec<Arc<ToolMetadata>> {
        self.tools
            .values()
            .filter(|tool| filter.matches(tool))
            .cloned()
            .collect()
    }

    /// Every tool in protocol shape, sorted by name.
    pub fn get_mcp_tool_list(&self) -> Vec<McpToolDescriptor> {
        let mut tools: Vec<McpToolDescriptor> = self
            .tools
            .values()
            .map(|tool| McpToolDescriptor {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: tool.schema.clone(),
            })
            .collect();
        tools.sort_by(|left, right| left.name.cmp(&right.name));
        tools
    }

    pub fn get_categories(&self) -> Vec<String> {
        self.tools
            .values()
            .filter_map(|tool| tool.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn get_all_names(&self) -> HashSet<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.tools.clear();
        self.short_names.clear();
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), RegistrationError> {
    let reason = if name.trim().is_empty() {
        "name must not be empty"
    } else if name.split('.').any(str::is_empty) {
        "dotted segments must not be empty"
    } else {
        return Ok(());
    };

    Err(RegistrationError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use serde_json::{Map, Value, json};

    use super::*;
    use crate::{ToolExecutionContext, ToolOutput};

    async fn noop(_args: Map<String, Value>, _ctx: ToolExecutionContext) -> ToolOutput {
        Ok(Value::Null)
    }

    fn tool(name: &str) -> ToolMetadata {
        ToolMetadata {
            name: name.to_string(),
            handler: Arc::new(noop),
            description: format!("{name} description"),
            category: None,
            requires_write: false,
            requires_admin: false,
            dependencies: BTreeSet::new(),
            schema: json!({"type": "object", "properties": {}, "required": []}),
        }
    }

    fn categorized(name: &str, category: &str) -> ToolMetadata {
        ToolMetadata {
            category: Some(category.to_string()),
            ..tool(name)
        }
    }

    #[test]
    fn second_registration_under_same_name_fails() {
        let mut registry = ToolRegistry::new();
        registry
            .register(tool("dev.fcp.a"))
            .expect("first registration succeeds");

        let different = ToolMetadata {
            description: "totally different".to_string(),
            requires_admin: true,
            ..tool("dev.fcp.a")
        };
        let error = registry.register(different).expect_err("duplicate must fail");
        assert_eq!(
            error,
            RegistrationError::DuplicateTool {
                name: "dev.fcp.a".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("dev.fcp.a").expect("original kept").description,
            "dev.fcp.a description"
        );
    }

    #[test]
    fn malformed_names_are_rejected() {
        let mut registry = ToolRegistry::new();
        for name in ["", "  ", "dev..fcp", "dev.fcp."] {
            assert!(matches!(
                registry.register(tool(name)),
                Err(RegistrationError::InvalidName { .. })
            ));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn lookups_return_none_for_unknown_names() {
        let registry = ToolRegistry::new();
        assert!(registry.get("dev.fcp.missing").is_none());
        assert!(registry.get_by_short_name("missing").is_none());
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn short_name_index_resolves_and_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("a.b.x")).expect("register a.b.x");
        assert_eq!(
            registry.get_by_short_name("x").expect("short lookup").name,
            "a.b.x"
        );

        registry.register(tool("c.d.x")).expect("register c.d.x");
        assert_eq!(
            registry.get_by_short_name("x").expect("short lookup").name,
            "c.d.x"
        );
        assert_eq!(registry.resolve("a.b.x").expect("full lookup").name, "a.b.x");
    }

    #[test]
    fn mcp_tool_list_is_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        for name in ["zebra", "alpha", "beta"] {
            registry.register(tool(name)).expect("register");
        }

        let names: Vec<String> = registry
            .get_mcp_tool_list()
            .into_iter()
            .map(|descriptor| descriptor.name)
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "zebra"]);
    }

    #[test]
    fn mcp_descriptor_serializes_input_schema_key() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("dev.fcp.t")).expect("register");

        let exported = serde_json::to_value(registry.get_mcp_tool_list()).expect("serialize");
        assert_eq!(
            exported,
            json!([{
                "name": "dev.fcp.t",
                "description": "dev.fcp.t description",
                "inputSchema": {"type": "object", "properties": {}, "required": []}
            }])
        );
    }

    #[test]
    fn categories_are_sorted_and_deduplicated() {
        let mut registry = ToolRegistry::new();
        registry.register(categorized("t1", "nutrition")).expect("t1");
        registry.register(categorized("t2", "recipes")).expect("t2");
        registry.register(categorized("t3", "nutrition")).expect("t3");
        registry.register(categorized("t4", "safety")).expect("t4");
        registry.register(tool("t5")).expect("t5");

        assert_eq!(
            registry.get_categories(),
            vec!["nutrition", "recipes", "safety"]
        );
    }

    #[test]
    fn list_tools_applies_every_supplied_filter() {
        let mut registry = ToolRegistry::new();
        registry.register(categorized("read", "nutrition")).expect("read");
        registry
            .register(ToolMetadata {
                requires_write: true,
                ..categorized("write", "nutrition")
            })
            .expect("write");
        registry
            .register(ToolMetadata {
                requires_write: true,
                requires_admin: true,
                ..categorized("admin", "safety")
            })
            .expect("admin");

        let names = |filter: ToolFilter| -> BTreeSet<String> {
            registry
                .list_tools(&filter)
                .into_iter()
                .map(|tool| tool.name.clone())
                .collect()
        };

        assert_eq!(names(ToolFilter::new()).len(), 3);
        assert_eq!(
            names(ToolFilter::new().category("nutrition")),
            BTreeSet::from(["read".to_string(), "write".to_string()])
        );
        assert_eq!(
            names(ToolFilter::new().category("nutrition").requires_write(true)),
            BTreeSet::from(["write".to_string()])
        );
        assert_eq!(
            names(ToolFilter::new().requires_admin(false)),
            BTreeSet::from(["read".to_string(), "write".to_string()])
        );
        assert!(names(ToolFilter::new().category("recipes")).is_empty());
    }

    #[test]
    fn clear_removes_tools_and_short_names() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("dev.fcp.t")).expect("register");
        assert_eq!(
            registry.get_all_names(),
            HashSet::from(["dev.fcp.t".to_string()])
        );

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get_by_short_name("t").is_none());
        assert!(registry.get_all_names().is_empty());

        registry
            .register(tool("dev.fcp.t"))
            .expect("name is free again after clear");
    }
}
