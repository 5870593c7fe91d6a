//! A standalone Basic path tree: constants, parameters, and a trailing
//! wildcard, with no validator support.
//!
//! [`crate::Router`] does not use this tree internally — it always needs the
//! Extended node so that `|check` suffixes work uniformly across every
//! registration — but it is kept as an independently usable, independently
//! tested component for embedders that want plain radix routing without
//! paying for the validator machinery. See `DESIGN.md` for the rationale.

use fulcrum_core::{Handler, ParamsAccessor};

use crate::params::ParamsBuffer;
use crate::prefix::contains_prefix;

#[derive(Default)]
struct BasicNode {
    path: String,
    name: String,
    const_children: Vec<Box<BasicNode>>,
    param_children: Vec<Box<BasicNode>>,
    wildcard_child: Option<Box<BasicNode>>,
    pnum: usize,
    tags: Vec<String>,
    values: Vec<String>,
    handler: Option<Handler>,
}

impl BasicNode {
    fn insert_child(&mut self, raw_segment: &str) -> &mut BasicNode {
        if raw_segment.is_empty() {
            return self;
        }
        match raw_segment.as_bytes()[0] {
            b'*' => {
                let name = if raw_segment.len() == 1 {
                    "*"
                } else {
                    &raw_segment[1..]
                };
                self.wildcard_child = Some(Box::new(BasicNode {
                    name: name.to_string(),
                    ..Default::default()
                }));
                self.wildcard_child.as_deref_mut().expect("just assigned")
            }
            b':' => {
                let name = &raw_segment[1..];
                if let Some(pos) = self.param_children.iter().position(|c| c.name == name) {
                    return &mut self.param_children[pos];
                }
                self.pnum += 1;
                self.param_children.push(Box::new(BasicNode {
                    name: name.to_string(),
                    ..Default::default()
                }));
                let last = self.param_children.len() - 1;
                &mut self.param_children[last]
            }
            _ => self.insert_const_path(raw_segment),
        }
    }

    fn insert_const_path(&mut self, path: &str) -> &mut BasicNode {
        if path.is_empty() {
            return self;
        }
        for i in 0..self.const_children.len() {
            let (shared, found) =
                crate::prefix::longest_common_prefix(path, &self.const_children[i].path);
            if !found {
                continue;
            }
            if shared == self.const_children[i].path {
                let shared_len = shared.len();
                return self.const_children[i].insert_const_path(&path[shared_len..]);
            }
            let shared = shared.to_string();
            let mut old_child = self.const_children.remove(i);
            old_child.path = old_child.path[shared.len()..].to_string();
            let mut split = Box::new(BasicNode {
                path: shared.clone(),
                ..Default::default()
            });
            split.const_children.push(old_child);
            self.const_children.insert(i, split);
            let remainder = &path[shared.len()..];
            return self.const_children[i].insert_const_path(remainder);
        }

        self.const_children.push(Box::new(BasicNode {
            path: path.to_string(),
            ..Default::default()
        }));
        self.const_children.sort_by_key(|c| c.path.as_bytes()[0]);
        let first_byte = path.as_bytes()[0];
        let idx = self
            .const_children
            .iter()
            .position(|c| c.path.as_bytes()[0] == first_byte && c.path == path)
            .expect("just inserted");
        &mut self.const_children[idx]
    }

    fn set_tags(&mut self, args: &[&str]) {
        self.tags.clear();
        self.values.clear();
        self.tags.push("route".to_string());
        self.values.push(args.first().copied().unwrap_or("").to_string());
        for arg in args.iter().skip(1) {
            let (tag, value) = arg.split_once('=').unwrap_or(("", ""));
            self.tags.push(tag.to_string());
            self.values.push(value.to_string());
        }
    }

    fn add_tags(&self, params: &mut ParamsBuffer) {
        for (tag, value) in self.tags.iter().zip(self.values.iter()) {
            params.add(tag, value);
        }
    }

    fn lookup(&self, search_key: &str, params: &mut ParamsBuffer) -> Option<Handler> {
        if search_key.is_empty() {
            if let Some(handler) = &self.handler {
                self.add_tags(params);
                return Some(handler.clone());
            }
        } else {
            let key_first = search_key.as_bytes()[0];
            for child in &self.const_children {
                let child_first = child.path.as_bytes()[0];
                if child_first >= key_first {
                    if child_first == key_first && contains_prefix(search_key, &child.path) {
                        let remainder = &search_key[child.path.len()..];
                        if let Some(h) = child.lookup(remainder, params) {
                            return Some(h);
                        }
                    }
                    break;
                }
            }

            if self.pnum > 0 {
                let cut = search_key.find('/').unwrap_or(search_key.len());
                let (head, tail) = search_key.split_at(cut);
                for child in &self.param_children {
                    if let Some(h) = child.lookup(tail, params) {
                        params.add(&child.name, head);
                        return Some(h);
                    }
                }
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let Some(handler) = &child.handler {
                child.add_tags(params);
                params.add(&child.name, search_key);
                return Some(handler.clone());
            }
        }

        None
    }
}

/// A standalone Basic path tree (constants, parameters, a trailing
/// wildcard; no `|check` validators).
#[derive(Default)]
pub struct BasicPathTree {
    root: BasicNode,
}

impl BasicPathTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` at `pattern`, e.g. `/api/users/:id`.
    ///
    /// `args` are space-separated `key=value` tags; `args[0]` (if present)
    /// is stored as the route's bare name.
    pub fn insert(&mut self, pattern: &str, args: &[&str], handler: Handler) {
        let segments = crate::splitter::split_path(pattern);
        let mut node = &mut self.root;
        for seg in &segments {
            node = node.insert_child(seg);
        }
        node.handler = Some(handler);
        node.set_tags(args);
    }

    /// Matches `path`, writing captured parameters into `params`.
    #[must_use]
    pub fn lookup(&self, path: &str, params: &mut ParamsBuffer) -> Option<Handler> {
        self.root.lookup(path, params)
    }
}
