//! # Fulcrum Config
//!
//! Typed configuration for the Fulcrum router: the middleware chain cap, the
//! extended-tree (validator) toggle, and the fallback response bodies.
//!
//! Configuration is layered the way the rest of this codebase layers it:
//! built-in defaults, then an optional TOML file, then environment variable
//! overrides. See [`ConfigLoader`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{RouterConfig, DEFAULT_MIDDLEWARE_CHAIN_CAP};
pub use error::ConfigError;
pub use loader::ConfigLoader;
