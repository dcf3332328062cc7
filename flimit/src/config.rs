//! Rate-limit policy: a default budget per window plus per-tool overrides.
//!
//! ```rust
//! use flimit::RateLimitConfig;
//!
//! let config = RateLimitConfig::new(10, 60)
//!     .expect("positive values")
//!     .with_tool_limit("dev.fcp.recipes.generate_image", 2);
//!
//! assert_eq!(config.get_limit_for_tool("dev.fcp.recipes.generate_image"), 2);
//! assert_eq!(config.get_limit_for_tool("dev.fcp.nutrition.get_taste_profile"), 10);
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::ConfigError;

pub const MAX_CALLS_ENV: &str = "MCP_RATE_LIMIT_MAX_CALLS";
pub const WINDOW_SECONDS_ENV: &str = "MCP_RATE_LIMIT_WINDOW_SECONDS";
pub const TOOL_LIMITS_ENV: &str = "MCP_RATE_LIMIT_TOOL_LIMITS";

const DEFAULT_MAX_CALLS: u32 = 100;
const DEFAULT_WINDOW_SECONDS: u64 = 60;

/// Immutable once built. Overrides may be zero, which blocks a tool outright.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRateLimitConfig")]
pub struct RateLimitConfig {
    max_calls: u32,
    window_seconds: u64,
    tool_limits: HashMap<String, u32>,
}

#[derive(Deserialize)]
struct RawRateLimitConfig {
    max_calls: u32,
    window_seconds: u64,
    #[serde(default)]
    tool_limits: HashMap<String, u32>,
}

impl TryFrom<RawRateLimitConfig> for RateLimitConfig {
    type Error = ConfigError;

    fn try_from(raw: RawRateLimitConfig) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.max_calls, raw.window_seconds)?.with_tool_limits(raw.tool_limits))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_MAX_CALLS,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            tool_limits: HashMap::new(),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_calls: u32, window_seconds: u64) -> Result<Self, ConfigError> {
        if max_calls == 0 {
            return Err(ConfigError::NonPositive { field: "max_calls" });
        }
        if window_seconds == 0 {
            return Err(ConfigError::NonPositive {
                field: "window_seconds",
            });
        }

        Ok(Self {
            max_calls,
            window_seconds,
            tool_limits: HashMap::new(),
        })
    }

    pub fn with_tool_limit(mut self, tool_name: impl Into<String>, limit: u32) -> Self {
        self.tool_limits.insert(tool_name.into(), limit);
        self
    }

    pub fn with_tool_limits<I, K>(mut self, limits: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        self.tool_limits
            .extend(limits.into_iter().map(|(name, limit)| (name.into(), limit)));
        self
    }

    /// Reads the policy from process environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`RateLimitConfig::from_env`] but with an injectable variable source.
    ///
    /// `MCP_RATE_LIMIT_TOOL_LIMITS` is a comma separated list of
    /// `tool_name=limit` pairs.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_calls = match lookup(MAX_CALLS_ENV) {
            Some(raw) => parse_number(MAX_CALLS_ENV, &raw)?,
            None => DEFAULT_MAX_CALLS,
        };
        let window_seconds = match lookup(WINDOW_SECONDS_ENV) {
            Some(raw) => parse_number(WINDOW_SECONDS_ENV, &raw)?,
            None => DEFAULT_WINDOW_SECONDS,
        };

        let mut config = Self::new(max_calls, window_seconds)?;
        if let Some(raw) = lookup(TOOL_LIMITS_ENV) {
            for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
                let (name, limit) = pair.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                    key: TOOL_LIMITS_ENV.to_string(),
                    value: pair.to_string(),
                })?;
                let limit = parse_number(TOOL_LIMITS_ENV, limit)?;
                config = config.with_tool_limit(name.trim(), limit);
            }
        }

        Ok(config)
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    pub fn window_seconds(&self) -> u64 {
        self.window_seconds
    }

    pub fn tool_limits(&self) -> &HashMap<String, u32> {
        &self.tool_limits
    }

    pub fn get_limit_for_tool(&self, tool_name: &str) -> u32 {
        self.tool_limits
            .get(tool_name)
            .copied()
            .unwrap_or(self.max_calls)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
