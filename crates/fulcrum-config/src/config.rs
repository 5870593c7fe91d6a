//! The router's own tunables.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The default middleware chain cap, matching the reference implementation's
/// `combineMiddlewares` fencepost (fails once two lists would combine to 63
/// or more entries).
pub const DEFAULT_MIDDLEWARE_CHAIN_CAP: usize = 63;

/// Complete configuration for a `fulcrum-router` `Router`.
///
/// # Example
///
/// ```
/// use fulcrum_config::RouterConfig;
///
/// let config = RouterConfig::default();
/// assert_eq!(config.middleware_chain_cap, 63);
/// assert!(config.extended_tree);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RouterConfig {
    /// Combined middleware-list length at or above which registration fails.
    pub middleware_chain_cap: usize,

    /// Whether to accept `|check` validator suffixes on parameter/wildcard
    /// segments (the Extended tree). When `false`, patterns containing `|`
    /// are rejected at registration time instead of being parsed.
    pub extended_tree: bool,

    /// Body written by the built-in 404 handler.
    pub not_found_body: String,

    /// Body written by the built-in 405 handler.
    pub method_not_allowed_body: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            middleware_chain_cap: DEFAULT_MIDDLEWARE_CHAIN_CAP,
            extended_tree: true,
            not_found_body: "404 page not found\n".to_string(),
            method_not_allowed_body: "405 method not allowed\n".to_string(),
        }
    }
}

impl RouterConfig {
    /// Validates the configuration, returning an error describing the first
    /// problem found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `middleware_chain_cap` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.middleware_chain_cap == 0 {
            return Err(ConfigError::invalid_value(
                "middleware_chain_cap",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
