//! Tool execution errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

use flimit::RateLimitExceeded;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    NotFound,
    InvalidArguments,
    Execution,
    Timeout,
    Unauthorized,
    RateLimited,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub retryable: bool,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
    pub rate_limit: Option<RateLimitExceeded>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            tool_name: None,
            tool_call_id: None,
            rate_limit: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message, false)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message, false)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message, true)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unauthorized, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message, false)
    }

    /// Carries the limiter's rejection unchanged so transports can render
    /// `Retry-After` from it.
    pub fn rate_limited(exceeded: RateLimitExceeded) -> Self {
        let mut error = Self::new(ToolErrorKind::RateLimited, exceeded.to_string(), true)
            .with_tool_name(exceeded.tool_name.clone());
        error.rate_limit = Some(exceeded);
        error
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::InvalidArguments
                | ToolErrorKind::NotFound
                | ToolErrorKind::Unauthorized
                | ToolErrorKind::RateLimited
        )
    }

    pub fn rate_limit(&self) -> Option<&RateLimitExceeded> {
        self.rate_limit.as_ref()
    }
}

impl From<RateLimitExceeded> for ToolError {
    fn from(exceeded: RateLimitExceeded) -> Self {
        Self::rate_limited(exceeded)
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.tool_name, &self.tool_call_id) {
            (Some(tool_name), Some(tool_call_id)) => write!(
                f,
                "{:?} [tool={}, call_id={}]: {}",
                self.kind, tool_name, tool_call_id, self.message
            ),
            (Some(tool_name), None) => {
                write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message)
            }
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

/// Startup-time registration failures. These indicate a programming error and
/// are not meant to be recovered from.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RegistrationError {
    #[error("tool '{name}' is already registered")]
    DuplicateTool { name: String },

    #[error("invalid tool name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_methods_report_retryable_and_user_error() {
        let timeout = ToolError::timeout("slow");
        assert!(timeout.is_retryable());
        assert!(!timeout.is_user_error());

        let invalid = ToolError::invalid_arguments("bad args");
        assert!(!invalid.is_retryable());
        assert!(invalid.is_user_error());
    }

    #[test]
    fn context_fields_are_included_in_display() {
        let error = ToolError::not_found("missing")
            .with_tool_name("lookup")
            .with_tool_call_id("call_1");

        let rendered = error.to_string();
        assert!(rendered.contains("lookup"));
        assert!(rendered.contains("call_1"));
    }

    #[test]
    fn rate_limit_rejection_is_carried_unchanged() {
        let exceeded = RateLimitExceeded {
            tool_name: "dev.fcp.recipes.generate".to_string(),
            limit: 3,
            window: 60,
            retry_after: 12.5,
        };

        let error = ToolError::from(exceeded.clone());
        assert_eq!(error.kind, ToolErrorKind::RateLimited);
        assert!(error.is_retryable());
        assert!(error.is_user_error());
        assert_eq!(error.tool_name.as_deref(), Some("dev.fcp.recipes.generate"));
        assert_eq!(error.rate_limit(), Some(&exceeded));
    }

    #[test]
    fn duplicate_registration_names_the_tool() {
        let error = RegistrationError::DuplicateTool {
            name: "dev.fcp.nutrition.get_taste_profile".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "tool 'dev.fcp.nutrition.get_taste_profile' is already registered"
        );
    }
}
