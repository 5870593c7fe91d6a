//! # Fulcrum Router
//!
//! A radix-tree HTTP request router: one tree per method, per-route
//! middleware composed at registration time, and typed validators on
//! parameter and wildcard segments.
//!
//! ```
//! use std::sync::Arc;
//! use fulcrum_config::RouterConfig;
//! use fulcrum_router::Router;
//!
//! let router = Router::new(RouterConfig::default());
//! router.register_handler("GET", "/api/users/:id|isnum", Arc::new(|sink, _req, params| {
//!     sink.write_status(200);
//!     sink.write(params.get("id").as_bytes());
//! })).unwrap();
//! # use fulcrum_router::RouterCore;
//! ```
//!
//! Transport (reading an `http::Request` off a socket, writing the response
//! back) is explicitly out of scope; see [`fulcrum_core::ResponseSink`] for
//! the minimal write surface a handler needs.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod glob;
mod host_router;
mod method_builder;
mod middleware_tree;
mod node;
mod params;
mod prefix;
mod router;
mod splitter;
mod tree_basic;
mod validator;

pub use error::{RouterError, RouterResult};
pub use host_router::HostRouter;
pub use method_builder::MethodBuilder;
pub use params::{ParamsBuffer, ParamsPool, PooledParams};
pub use router::{Router, RouterCore};
pub use tree_basic::BasicPathTree;
pub use validator::{Predicate, ValidatorRegistry};
