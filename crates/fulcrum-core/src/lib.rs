//! # Fulcrum Core
//!
//! Shared contracts for the Fulcrum router: the [`Handler`] and [`Middleware`]
//! function types, the [`ResponseSink`] trait a handler writes through, and the
//! [`ParamsAccessor`] trait used to read and mutate captured path parameters.
//!
//! This crate intentionally does not implement an HTTP transport. It defines
//! the seam between the router core and everything around it (the transport,
//! CORS/logging/rate-limit middlewares, etc.) so those remain external
//! collaborators with a named contract instead of a hard dependency.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod handler;
mod params;
mod sink;

pub use handler::{Handler, Middleware, Request};
pub use params::ParamsAccessor;
pub use sink::ResponseSink;
