//! Layered configuration loading: defaults, then a TOML file, then env vars.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, RouterConfig};

/// Loads a [`RouterConfig`] from defaults, an optional TOML file, and
/// optional environment variable overrides, in that order (later layers win).
///
/// Recognized environment variables (with the default prefix `FULCRUM_ROUTER`):
/// - `FULCRUM_ROUTER_MIDDLEWARE_CHAIN_CAP`
/// - `FULCRUM_ROUTER_EXTENDED_TREE` (`"true"`/`"false"`)
///
/// # Example
///
/// ```no_run
/// use fulcrum_config::ConfigLoader;
///
/// # fn main() -> Result<(), fulcrum_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("router.toml")?
///     .with_env_prefix("FULCRUM_ROUTER")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: RouterConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader seeded with [`RouterConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            env_prefix: None,
        }
    }

    /// Merges in a TOML file's contents. Missing files are an error; callers
    /// that want an optional file should check [`Path::exists`] first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`], [`ConfigError::ReadError`], or
    /// [`ConfigError::TomlError`].
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = toml::from_str(&contents)?;
        Ok(self)
    }

    /// Sets the environment variable prefix consulted by [`Self::load`].
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Applies environment overrides (if a prefix was set) and validates the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParseError`] if an override cannot be
    /// parsed, or a validation error from [`RouterConfig::validate`].
    pub fn load(mut self) -> Result<RouterConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.clone() {
            self.apply_env(&prefix)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    fn apply_env(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let cap_var = format!("{prefix}_MIDDLEWARE_CHAIN_CAP");
        if let Ok(raw) = env::var(&cap_var) {
            self.config.middleware_chain_cap = raw.parse().map_err(|_| {
                ConfigError::env_parse_error(&cap_var, "expected a non-negative integer")
            })?;
        }

        let ext_var = format!("{prefix}_EXTENDED_TREE");
        if let Ok(raw) = env::var(&ext_var) {
            self.config.extended_tree = match raw.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::env_parse_error(
                        &ext_var,
                        "expected true/false",
                    ))
                }
            };
        }

        Ok(())
    }
}
