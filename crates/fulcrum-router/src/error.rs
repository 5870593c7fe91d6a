//! Registration error types.
//!
//! Matching never fails (see [`crate::Router::dispatch`]): an unmatched path
//! falls back to the 404 handler and an unsupported method falls back to the
//! 405 tree. Only *registration* can fail, and it fails loudly as a typed
//! [`RouterError`] rather than the reference implementation's `panic`.

use thiserror::Error;

/// Result alias for fallible router registration operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors that can occur while registering routes, middleware, or validators.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A `|check` suffix named a predicate or factory that was never
    /// registered with the [`ValidatorRegistry`](crate::ValidatorRegistry).
    #[error("unknown validator predicate or factory: {name}")]
    UnknownPredicate {
        /// The name that failed to resolve.
        name: String,
    },

    /// A factory (e.g. `min`, `max`, `regexp`) rejected its argument.
    #[error("invalid argument {arg:?} for validator factory {factory}")]
    InvalidPredicateArgument {
        /// The factory name.
        factory: String,
        /// The argument it rejected.
        arg: String,
    },

    /// Combining two middleware lists would reach the configured cap.
    #[error("middleware chain too long: combining would reach {len} entries (cap {cap})")]
    MiddlewareChainTooLong {
        /// The combined length that would result.
        len: usize,
        /// The configured cap.
        cap: usize,
    },

    /// An internal radix-tree invariant was violated while splitting a
    /// constant edge. This indicates a bug in this crate, not bad caller
    /// input.
    #[error("internal radix tree invariant violated while splitting node at {path:?}")]
    SplitInvariantViolated {
        /// The edge label being split when the invariant failed.
        path: String,
    },

    /// A pattern used a `|check` suffix while
    /// [`RouterConfig::extended_tree`](fulcrum_config::RouterConfig::extended_tree)
    /// is `false`.
    #[error("pattern {pattern:?} uses a |check suffix but extended_tree is disabled")]
    ExtendedTreeDisabled {
        /// The offending pattern.
        pattern: String,
    },

    /// An unsupported HTTP method was given to an operation that requires
    /// one of the seven canonical verbs.
    #[error("unsupported method: {method}")]
    UnsupportedMethod {
        /// The method string that was rejected.
        method: String,
    },
}

impl RouterError {
    /// Creates an [`RouterError::UnknownPredicate`].
    pub fn unknown_predicate(name: impl Into<String>) -> Self {
        Self::UnknownPredicate { name: name.into() }
    }

    /// Creates an [`RouterError::InvalidPredicateArgument`].
    pub fn invalid_predicate_argument(factory: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::InvalidPredicateArgument {
            factory: factory.into(),
            arg: arg.into(),
        }
    }

    /// Creates a [`RouterError::MiddlewareChainTooLong`].
    pub fn middleware_chain_too_long(len: usize, cap: usize) -> Self {
        Self::MiddlewareChainTooLong { len, cap }
    }

    /// Creates a [`RouterError::SplitInvariantViolated`], also emitting a
    /// `tracing::error!` event since it signals a bug in this crate.
    pub fn split_invariant_violated(path: impl Into<String>) -> Self {
        let path = path.into();
        tracing::error!(edge = %path, "radix tree split invariant violated");
        Self::SplitInvariantViolated { path }
    }

    /// Creates a [`RouterError::ExtendedTreeDisabled`].
    pub fn extended_tree_disabled(pattern: impl Into<String>) -> Self {
        Self::ExtendedTreeDisabled {
            pattern: pattern.into(),
        }
    }

    /// Creates a [`RouterError::UnsupportedMethod`].
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }
}
