//! Small convenience constructors for common types.

use serde_json::Value;

use crate::{CallerRole, ToolCall, ToolExecutionContext, UserId};

pub fn reader_context(user_id: impl Into<UserId>) -> ToolExecutionContext {
    ToolExecutionContext::new(user_id)
}

pub fn writer_context(user_id: impl Into<UserId>) -> ToolExecutionContext {
    ToolExecutionContext::new(user_id).with_role(CallerRole::Writer)
}

pub fn admin_context(user_id: impl Into<UserId>) -> ToolExecutionContext {
    ToolExecutionContext::new(user_id).with_role(CallerRole::Admin)
}

pub fn tool_call(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> ToolCall {
    ToolCall::new(id, name, arguments)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::CallerRole;

    use super::{admin_context, reader_context, tool_call, writer_context};

    #[test]
    fn context_helpers_apply_expected_roles() {
        assert_eq!(reader_context("u").role, CallerRole::Reader);
        assert_eq!(writer_context("u").role, CallerRole::Writer);
        assert_eq!(admin_context("u").role, CallerRole::Admin);

        let call = tool_call("c1", "search", json!({"query": "tofu"}));
        assert_eq!(call.arguments["query"], "tofu");
    }
}
