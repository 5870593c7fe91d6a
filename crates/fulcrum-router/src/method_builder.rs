//! A fluent, prefix- and tag-composing front end over any [`RouterCore`].

use std::sync::Arc;

use fulcrum_core::{Handler, Middleware};

use crate::error::RouterError;
use crate::router::RouterCore;

/// Composes a path prefix and a tag suffix on top of a [`RouterCore`], the
/// way a nested route group accumulates both as it descends.
///
/// `group("/v1 api=v1")` splits its argument on the first space into a
/// sub-prefix and sub-tags; the returned builder's prefix is
/// `parent.prefix + subPrefix` and its tags are `subTags + parent.tags`, so
/// tags nearer the root end up rightmost (outermost) in the final pattern.
#[derive(Clone)]
pub struct MethodBuilder {
    core: Arc<dyn RouterCore>,
    prefix: String,
    tags: String,
}

impl MethodBuilder {
    /// Creates a builder over `core` with no prefix or tags.
    #[must_use]
    pub fn new(core: Arc<dyn RouterCore>) -> Self {
        Self {
            core,
            prefix: String::new(),
            tags: String::new(),
        }
    }

    fn full_pattern(&self, user_path: &str) -> String {
        let mut pattern = format!("{}{}", self.prefix, user_path);
        if !self.tags.is_empty() {
            pattern.push(' ');
            pattern.push_str(&self.tags);
        }
        pattern
    }

    /// Returns a child builder with `subpattern` folded into the prefix and
    /// tags, for registering a group of related routes.
    #[must_use]
    pub fn group(&self, subpattern: &str) -> Self {
        let (sub_prefix, sub_tags) = subpattern.split_once(' ').unwrap_or((subpattern, ""));
        let mut tags = sub_tags.to_string();
        if !tags.is_empty() && !self.tags.is_empty() {
            tags.push(' ');
        }
        tags.push_str(&self.tags);
        Self {
            core: Arc::clone(&self.core),
            prefix: format!("{}{}", self.prefix, sub_prefix),
            tags,
        }
    }

    fn register(&self, method: &str, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.core.register_handler(method, &self.full_pattern(path), handler)
    }

    /// Registers `handler` for `GET prefix+path+tags`.
    pub fn get(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("GET", path, handler)
    }

    /// Registers `handler` for `POST prefix+path+tags`.
    pub fn post(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("POST", path, handler)
    }

    /// Registers `handler` for `PUT prefix+path+tags`.
    pub fn put(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("PUT", path, handler)
    }

    /// Registers `handler` for `DELETE prefix+path+tags`.
    pub fn delete(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("DELETE", path, handler)
    }

    /// Registers `handler` for `HEAD prefix+path+tags`.
    pub fn head(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("HEAD", path, handler)
    }

    /// Registers `handler` for `PATCH prefix+path+tags`.
    pub fn patch(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("PATCH", path, handler)
    }

    /// Registers `handler` for `OPTIONS prefix+path+tags`.
    pub fn options(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("OPTIONS", path, handler)
    }

    /// Registers `handler` for every canonical verb (subject to the
    /// "`ANY` never overwrites a prior non-`ANY` handler" rule).
    pub fn any(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.register("ANY", path, handler)
    }

    /// Registers `list` as middleware for `prefix+path`, bypassing tags
    /// (middleware carries no route name).
    pub fn add_middleware(&self, method: &str, path: &str, list: Vec<Middleware>) -> Result<(), RouterError> {
        self.core
            .register_middleware(method, &format!("{}{}", self.prefix, path), list)
    }

    /// Registers `handler` at the raw `method`+`path`, bypassing both the
    /// accumulated prefix and tags.
    pub fn add_handler(&self, method: &str, path: &str, handler: Handler) -> Result<(), RouterError> {
        self.core.register_handler(method, path, handler)
    }
}
