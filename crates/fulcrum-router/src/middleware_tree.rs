//! A constant-only radix tree keyed by `METHOD+path`, folded into handler
//! composition at registration time rather than walked per request.

use fulcrum_core::Middleware;

use crate::error::RouterError;
use crate::prefix::{contains_prefix, longest_common_prefix};

#[derive(Default)]
pub(crate) struct MiddlewareNode {
    /// This node's edge label relative to its parent.
    path: String,
    /// The full key this node was registered under, kept to decide the
    /// path-boundary fallback during lookup (see [`Self::recursive_lookup`]).
    key: String,
    children: Vec<Box<MiddlewareNode>>,
    middlewares: Vec<Middleware>,
}

impl MiddlewareNode {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    /// Registers `value` under `key`, combining with anything already
    /// registered at the same node.
    pub(crate) fn insert(
        &mut self,
        key: &str,
        value: Vec<Middleware>,
        cap: usize,
    ) -> Result<(), RouterError> {
        self.recursive_insert(key, key, value, cap)
    }

    fn recursive_insert(
        &mut self,
        contain_key: &str,
        target_key: &str,
        target_value: Vec<Middleware>,
        cap: usize,
    ) -> Result<(), RouterError> {
        for i in 0..self.children.len() {
            let (shared, found) = longest_common_prefix(contain_key, &self.children[i].path);
            if !found {
                continue;
            }
            if shared == self.children[i].path {
                let remainder = contain_key[shared.len()..].to_string();
                return self.children[i].recursive_insert(&remainder, target_key, target_value, cap);
            }

            let shared = shared.to_string();
            let mut old_child = self.children.remove(i);
            let old_suffix = old_child.path[shared.len()..].to_string();
            old_child.path = old_suffix;

            let mut split = Box::new(MiddlewareNode {
                path: shared.clone(),
                ..Default::default()
            });
            split.children.push(old_child);
            self.children.insert(i, split);

            let remainder = contain_key[shared.len()..].to_string();
            return self.children[i].insert_here(&remainder, target_key, target_value, cap);
        }

        self.insert_here(contain_key, target_key, target_value, cap)
    }

    fn insert_here(
        &mut self,
        remainder: &str,
        target_key: &str,
        target_value: Vec<Middleware>,
        cap: usize,
    ) -> Result<(), RouterError> {
        if remainder.is_empty() {
            self.key = target_key.to_string();
            self.middlewares = combine_lists(std::mem::take(&mut self.middlewares), target_value, cap)?;
        } else {
            self.children.push(Box::new(MiddlewareNode {
                path: remainder.to_string(),
                key: target_key.to_string(),
                middlewares: target_value,
                ..Default::default()
            }));
        }
        Ok(())
    }

    /// The list registered directly at the root (the `ANY "/"` case),
    /// i.e. the list every lookup implicitly carries regardless of path.
    pub(crate) fn root_value(&self) -> Vec<Middleware> {
        self.middlewares.clone()
    }

    /// Looks up the middleware list for `search_key` (typically
    /// `METHOD+path`), stripping a trailing tag string and a trailing `*`
    /// wildcard marker first.
    pub(crate) fn lookup(&self, search_key: &str) -> Vec<Middleware> {
        let key = search_key.split(' ').next().unwrap_or(search_key);
        let key = key.strip_suffix('*').unwrap_or(key);
        self.recursive_lookup(key)
    }

    fn recursive_lookup(&self, search_key: &str) -> Vec<Middleware> {
        if search_key.is_empty() {
            return self.middlewares.clone();
        }
        for child in &self.children {
            if contains_prefix(search_key, &child.path) {
                let next = &search_key[child.path.len()..];
                let mut result = self.middlewares.clone();
                result.extend(child.recursive_lookup(next));
                return result;
            }
        }
        if self.key.is_empty() || self.key.ends_with('/') {
            self.middlewares.clone()
        } else {
            Vec::new()
        }
    }
}

fn combine_lists(
    a: Vec<Middleware>,
    b: Vec<Middleware>,
    cap: usize,
) -> Result<Vec<Middleware>, RouterError> {
    if a.is_empty() {
        return Ok(b);
    }
    if b.is_empty() {
        return Ok(a);
    }
    let total = a.len() + b.len();
    if total >= cap {
        return Err(RouterError::middleware_chain_too_long(total, cap));
    }
    let mut out = a;
    out.extend(b);
    Ok(out)
}
