/// Creates a [`ToolExecutionContext`](crate::ToolExecutionContext) from a role
/// shorthand.
///
/// ```rust
/// use fgovern::{CallerRole, fg_context};
///
/// let context = fg_context!(writer => "user-7");
/// assert_eq!(context.role, CallerRole::Writer);
/// assert_eq!(context.user_id.as_str(), "user-7");
/// ```
#[macro_export]
macro_rules! fg_context {
    (reader => $user_id:expr $(,)?) => {
        $crate::ToolExecutionContext::new($user_id).with_role($crate::CallerRole::Reader)
    };
    (writer => $user_id:expr $(,)?) => {
        $crate::ToolExecutionContext::new($user_id).with_role($crate::CallerRole::Writer)
    };
    (admin => $user_id:expr $(,)?) => {
        $crate::ToolExecutionContext::new($user_id).with_role($crate::CallerRole::Admin)
    };
    ($role:ident => $user_id:expr $(,)?) => {
        compile_error!("unsupported role: use reader, writer, or admin");
    };
    ($user_id:expr $(,)?) => {
        $crate::ToolExecutionContext::new($user_id)
    };
}

/// Creates a [`ToolCall`](crate::ToolCall) with inline JSON arguments.
///
/// ```rust
/// use fgovern::fg_call;
///
/// let call = fg_call!("call-1", "search_recipes", { "query": "miso", "limit": 3 });
/// assert_eq!(call.name, "search_recipes");
/// assert_eq!(call.arguments["limit"], 3);
///
/// let bare = fg_call!("call-2", "ping");
/// assert!(bare.arguments.is_null());
/// ```
#[macro_export]
macro_rules! fg_call {
    ($id:expr, $name:expr $(,)?) => {
        $crate::ToolCall::new($id, $name, $crate::serde_json::Value::Null)
    };
    ($id:expr, $name:expr, $($arguments:tt)+) => {
        $crate::ToolCall::new($id, $name, $crate::serde_json::json!($($arguments)+))
    };
}
