//! Tool call, execution context, and result types.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use fcommon::{MetadataMap, TraceId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ToolError;

/// A request from the agent to invoke a tool by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    #[default]
    Reader,
    Writer,
    Admin,
}

impl CallerRole {
    pub fn can_write(self) -> bool {
        matches!(self, Self::Writer | Self::Admin)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Named values the dispatcher injects into handlers, such as a database
/// handle or an AI-service client.
#[derive(Clone, Default)]
pub struct Dependencies {
    items: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T>(&mut self, name: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.items.insert(name.into(), Arc::new(value));
    }

    pub fn insert_arc<T>(&mut self, name: impl Into<String>, value: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        self.items.insert(name.into(), value);
    }

    /// `None` when the name is missing or holds a different type.
    pub fn get<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.items
            .get(name)
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Debug for Dependencies {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.items.keys().collect();
        names.sort();
        f.debug_struct("Dependencies").field("names", &names).finish()
    }
}

#[derive(Debug, Clone)]
pub struct ToolExecutionContext {
    pub user_id: UserId,
    pub role: CallerRole,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
    pub dependencies: Dependencies,
}

impl ToolExecutionContext {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            role: CallerRole::default(),
            trace_id: None,
            metadata: MetadataMap::new(),
            dependencies: Dependencies::new(),
        }
    }

    pub fn with_role(mut self, role: CallerRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_dependency<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.dependencies.insert(name, value);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Dependencies) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Fetches an injected dependency for use inside a handler.
    pub fn dependency<T>(&self, name: &str) -> Result<Arc<T>, ToolError>
    where
        T: Any + Send + Sync,
    {
        self.dependencies.get(name).ok_or_else(|| {
            ToolError::execution(format!("dependency '{name}' is not available"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub output: Value,
}

impl ToolExecutionResult {
    pub fn new(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: Value,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            output,
        }
    }
}
