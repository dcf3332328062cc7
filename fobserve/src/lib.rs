//! Production-friendly observability hooks for tool execution and admission
//! control.
//!
//! ```rust
//! use fobserve::{MetricsObservabilityHooks, SafeRateLimitHooks, SafeToolHooks, TracingObservabilityHooks};
//!
//! let _tool_hooks = SafeToolHooks::new(TracingObservabilityHooks);
//! let _rate_limit_hooks = SafeRateLimitHooks::new(MetricsObservabilityHooks);
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeRateLimitHooks, SafeToolHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeRateLimitHooks, SafeToolHooks, TracingObservabilityHooks,
    };
}
