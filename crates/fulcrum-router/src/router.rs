//! The top-level `Router`: seven per-method Extended trees, a 404 fallback,
//! a 405 fallback, and one shared middleware tree.

use std::sync::Arc;

use fulcrum_config::RouterConfig;
use fulcrum_core::{Handler, Middleware, ParamsAccessor};
use http::Method;
use parking_lot::RwLock;

use crate::error::RouterError;
use crate::middleware_tree::MiddlewareNode;
use crate::node::Node;
use crate::params::ParamsBuffer;
use crate::splitter::split_path;
use crate::validator::ValidatorRegistry;

/// The seven canonical HTTP verbs a `Router` keeps a dedicated tree for, in
/// the order they're joined into an `Allow` header.
pub(crate) const ALL_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::HEAD,
    Method::PATCH,
    Method::OPTIONS,
];

fn combine(handler: Handler, middlewares: &[Middleware]) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |h, mw| mw(h))
}

/// The shared behavior a route-registration front end (a bare `Router`, or a
/// `HostRouter` dispatching across several) needs to expose.
pub trait RouterCore: Send + Sync {
    /// Registers middleware for `method`+`path`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] if the middleware chain cap would be
    /// exceeded.
    fn register_middleware(
        &self,
        method: &str,
        path: &str,
        list: Vec<Middleware>,
    ) -> Result<(), RouterError>;

    /// Registers `handler` for `method`+`path` (tags appended after the path
    /// as space-separated `key=value` pairs; `method` may be `ANY`, `404`,
    /// or `405`).
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] if a `|check` suffix fails to resolve or the
    /// combined middleware chain would exceed the configured cap.
    fn register_handler(&self, method: &str, path: &str, handler: Handler) -> Result<(), RouterError>;

    /// Matches `method`+`path`, returning the composed handler to invoke.
    /// Never fails: an unmatched path falls back to 404, an unsupported
    /// method falls back to 405.
    fn dispatch(&self, method: &Method, path: &str, params: &mut ParamsBuffer) -> Handler;
}

struct RouterState {
    config: RouterConfig,
    get: Node,
    post: Node,
    put: Node,
    delete: Node,
    head: Node,
    patch: Node,
    options: Node,
    node_404: Node,
    tree_405: Node,
    middleware: MiddlewareNode,
    validators: Arc<ValidatorRegistry>,
    base_404: Handler,
    base_405: Handler,
}

impl RouterState {
    fn tree_mut(&mut self, method: &Method) -> Option<&mut Node> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::POST => Some(&mut self.post),
            Method::PUT => Some(&mut self.put),
            Method::DELETE => Some(&mut self.delete),
            Method::HEAD => Some(&mut self.head),
            Method::PATCH => Some(&mut self.patch),
            Method::OPTIONS => Some(&mut self.options),
            _ => None,
        }
    }

    fn tree_ref(&self, method: &Method) -> Option<&Node> {
        match *method {
            Method::GET => Some(&self.get),
            Method::POST => Some(&self.post),
            Method::PUT => Some(&self.put),
            Method::DELETE => Some(&self.delete),
            Method::HEAD => Some(&self.head),
            Method::PATCH => Some(&self.patch),
            Method::OPTIONS => Some(&self.options),
            _ => None,
        }
    }

    fn recompute_fallbacks(&mut self) {
        let root_middlewares = self.middleware.root_value();
        self.node_404.handler = Some(combine(self.base_404.clone(), &root_middlewares));
        if let Ok(wildcard) = self.tree_405.insert_child("*", &self.validators) {
            wildcard.handler = Some(combine(self.base_405.clone(), &root_middlewares));
            wildcard.set_tags(&["405"]);
        }
    }
}

fn default_not_found_handler(config: &RouterConfig) -> Handler {
    let body = config.not_found_body.clone().into_bytes();
    Arc::new(move |sink, _req, _params| {
        sink.write_status(404);
        sink.write(&body);
    })
}

fn default_method_not_allowed_handler(config: &RouterConfig) -> Handler {
    let body = config.method_not_allowed_body.clone().into_bytes();
    let allow = ALL_METHODS
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Arc::new(move |sink, _req, _params| {
        sink.write_status(405);
        sink.header("Allow", &allow);
        sink.write(&body);
    })
}

/// A radix-tree HTTP request router: one tree per HTTP method, a shared
/// middleware tree, and typed validators for parameter/wildcard segments.
///
/// Registration is internally synchronized (`&self`, not `&mut self`) via a
/// `parking_lot::RwLock`, so a `Router` can be wrapped in an `Arc` and shared
/// across worker threads while still accepting new routes.
pub struct Router {
    state: RwLock<RouterState>,
}

impl Router {
    /// Builds an empty router from `config`.
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        let base_404 = default_not_found_handler(&config);
        let base_405 = default_method_not_allowed_handler(&config);
        let validators = ValidatorRegistry::with_builtins();

        let mut tree_405 = Node::root();
        let wildcard_405 = tree_405
            .insert_child("*", &validators)
            .expect("'*' never fails to resolve");
        wildcard_405.handler = Some(base_405.clone());
        wildcard_405.set_tags(&["405"]);

        let mut node_404 = Node::root();
        node_404.handler = Some(base_404.clone());
        node_404.set_tags(&["404"]);

        let state = RouterState {
            config,
            get: Node::root(),
            post: Node::root(),
            put: Node::root(),
            delete: Node::root(),
            head: Node::root(),
            patch: Node::root(),
            options: Node::root(),
            node_404,
            tree_405,
            middleware: MiddlewareNode::root(),
            validators: Arc::new(validators),
            base_404,
            base_405,
        };

        Self {
            state: RwLock::new(state),
        }
    }

    /// Overrides the handler invoked when no route matches any tree.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] only if internally combining with previously
    /// registered root middleware would exceed the chain cap; in practice
    /// this cannot happen for a handler override alone.
    pub fn set_not_found(&self, handler: Handler) -> Result<(), RouterError> {
        let mut state = self.state.write();
        state.base_404 = handler;
        state.recompute_fallbacks();
        Ok(())
    }

    /// Overrides the handler invoked when a path matches but the method
    /// doesn't.
    pub fn set_method_not_allowed(&self, handler: Handler) {
        let mut state = self.state.write();
        state.base_405 = handler;
        state.recompute_fallbacks();
    }

    fn insert_route(
        state: &mut RouterState,
        method: &Method,
        key: &str,
        handler: Handler,
        is_any: bool,
    ) -> Result<(), RouterError> {
        let args: Vec<&str> = key.split(' ').collect();
        let pattern = args[0];
        if !state.config.extended_tree && pattern.contains('|') {
            return Err(RouterError::extended_tree_disabled(pattern));
        }

        let validators = Arc::clone(&state.validators);
        let Some(tree) = state.tree_mut(method) else {
            return Ok(());
        };

        let segments = split_path(pattern);
        let mut current = tree;
        for seg in &segments {
            current = current.insert_child(seg, &validators)?;
        }

        if is_any {
            if !current.is_any() && current.handler.is_some() {
                return Ok(());
            }
            current.set_any(true);
        }
        current.handler = Some(handler);
        current.set_tags(&args[1..]);

        tracing::trace!(method = %method, pattern, "route.register");
        Ok(())
    }
}

impl RouterCore for Router {
    fn register_middleware(
        &self,
        method: &str,
        path: &str,
        list: Vec<Middleware>,
    ) -> Result<(), RouterError> {
        // A trailing tag string plays no part in middleware keys.
        let mut path = path.find(' ').map_or(path, |pos| &path[..pos]);
        if !method.is_empty() && path.is_empty() {
            path = "/";
        }
        // A trailing bare '*' means "and everything below"; stripping it
        // here leaves a key ending in '/' (e.g. "/api/*" -> "/api/"), which
        // the path-boundary fallback in `MiddlewareNode::lookup` already
        // treats as matching every path under it.
        let path = path.strip_suffix('*').unwrap_or(path);

        let mut state = self.state.write();
        let cap = state.config.middleware_chain_cap;

        if method == "ANY" {
            if path == "/" {
                state.middleware.insert("", list, cap)?;
                state.recompute_fallbacks();
            } else {
                for verb in &ALL_METHODS {
                    let key = format!("{verb}{path}");
                    state.middleware.insert(&key, list.clone(), cap)?;
                }
            }
        } else {
            let key = format!("{method}{path}");
            state.middleware.insert(&key, list, cap)?;
        }

        tracing::trace!(method, path, "middleware.register");
        Ok(())
    }

    fn register_handler(&self, method: &str, path: &str, handler: Handler) -> Result<(), RouterError> {
        let mut state = self.state.write();

        match method {
            "404" | "NotFound" => {
                state.base_404 = handler;
                state.recompute_fallbacks();
                return Ok(());
            }
            "405" | "MethodNotAllowed" => {
                state.base_405 = handler;
                state.recompute_fallbacks();
                return Ok(());
            }
            "ANY" => {
                for verb in &ALL_METHODS {
                    let middlewares = state.middleware.lookup(&format!("{verb}{path}"));
                    let composed = combine(handler.clone(), &middlewares);
                    Self::insert_route(&mut state, verb, path, composed, true)?;
                }
                return Ok(());
            }
            _ => {}
        }

        let method_upper = method.to_uppercase();
        let verb: Method = method_upper
            .parse()
            .map_err(|_| RouterError::unsupported_method(method))?;
        let middlewares = state.middleware.lookup(&format!("{method_upper}{path}"));
        let composed = combine(handler, &middlewares);
        Self::insert_route(&mut state, &verb, path, composed, false)
    }

    fn dispatch(&self, method: &Method, path: &str, params: &mut ParamsBuffer) -> Handler {
        let state = self.state.read();
        let tree = state.tree_ref(method).unwrap_or(&state.tree_405);
        if let Some(handler) = tree.lookup(path, params) {
            tracing::trace!(method = %method, path, "route.match");
            return handler;
        }
        state
            .node_404
            .lookup("", params)
            .expect("404 handler is always installed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamsBuffer;
    use fulcrum_core::ResponseSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingSink {
        status: Option<u16>,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }
    impl Default for RecordingSink {
        fn default() -> Self {
            Self {
                status: None,
                headers: Vec::new(),
                body: Vec::new(),
            }
        }
    }
    impl ResponseSink for RecordingSink {
        fn write_status(&mut self, code: u16) {
            self.status = Some(code);
        }
        fn header(&mut self, name: &str, value: &str) {
            self.headers.push((name.to_string(), value.to_string()));
        }
        fn write(&mut self, bytes: &[u8]) {
            self.body.extend_from_slice(bytes);
        }
    }

    fn ok_handler() -> Handler {
        Arc::new(|sink, _req, _params| {
            sink.write_status(200);
            sink.write(b"ok");
        })
    }

    fn router() -> Router {
        Router::new(RouterConfig::default())
    }

    fn request() -> http::Request<()> {
        http::Request::builder().body(()).unwrap()
    }

    #[test]
    fn registers_and_matches_a_static_route() {
        let r = router();
        r.register_handler("GET", "/api/users", ok_handler()).unwrap();

        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::GET, "/api/users", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(sink.status, Some(200));
    }

    #[test]
    fn unmatched_path_falls_back_to_404() {
        let r = router();
        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::GET, "/nope", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(sink.status, Some(404));
    }

    #[test]
    fn wrong_method_falls_back_to_405_with_allow_header() {
        let r = router();
        r.register_handler("GET", "/api/users", ok_handler()).unwrap();

        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::POST, "/api/users", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(sink.status, Some(405));
        assert!(sink.headers.iter().any(|(k, v)| k == "Allow" && v.contains("GET")));
    }

    #[test]
    fn any_expands_across_all_seven_verbs() {
        let r = router();
        r.register_handler("ANY", "/health", ok_handler()).unwrap();

        for verb in &ALL_METHODS {
            let mut params = ParamsBuffer::new();
            let handler = r.dispatch(verb, "/health", &mut params);
            let mut sink = RecordingSink::default();
            handler(&mut sink, &request(), &mut params);
            assert_eq!(sink.status, Some(200), "verb {verb} should match");
        }
    }

    #[test]
    fn any_does_not_overwrite_a_prior_explicit_verb_handler() {
        let r = router();
        r.register_handler("GET", "/x", ok_handler()).unwrap();

        let marker = Arc::new(AtomicUsize::new(0));
        let marker2 = Arc::clone(&marker);
        let any_handler: Handler = Arc::new(move |sink, _req, _params| {
            marker2.fetch_add(1, Ordering::SeqCst);
            sink.write_status(200);
        });
        r.register_handler("ANY", "/x", any_handler).unwrap();

        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::GET, "/x", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(marker.load(Ordering::SeqCst), 0, "ANY must not override GET");
    }

    #[test]
    fn checked_param_rejects_non_numeric_value() {
        let r = router();
        r.register_handler("GET", "/users/:id|isnum", ok_handler()).unwrap();

        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::GET, "/users/abc", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(sink.status, Some(404));

        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::GET, "/users/42", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(sink.status, Some(200));
        assert_eq!(params.get("id"), "42");
    }

    #[test]
    fn middleware_wraps_matched_handler() {
        let r = router();
        let order = Arc::new(std::sync::Mutex::new(Vec::<&'static str>::new()));

        let order1 = Arc::clone(&order);
        let mw: Middleware = Arc::new(move |inner| {
            let order1 = Arc::clone(&order1);
            Arc::new(move |sink, req, params| {
                order1.lock().unwrap().push("mw");
                inner(sink, req, params);
            })
        });
        r.register_middleware("GET", "/api/", vec![mw]).unwrap();
        r.register_handler("GET", "/api/ping", ok_handler()).unwrap();

        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::GET, "/api/ping", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);

        assert_eq!(*order.lock().unwrap(), vec!["mw"]);
        assert_eq!(sink.status, Some(200));
    }

    #[test]
    fn route_name_tag_is_captured_as_a_param() {
        let r = router();
        r.register_handler("GET", "/named getname", ok_handler()).unwrap();

        let mut params = ParamsBuffer::new();
        r.dispatch(&Method::GET, "/named", &mut params);
        assert_eq!(params.get("route"), "getname");
    }

    #[test]
    fn any_middleware_expands_over_every_verb() {
        let r = router();
        let order = Arc::new(std::sync::Mutex::new(Vec::<&'static str>::new()));
        let order1 = Arc::clone(&order);
        let mw: Middleware = Arc::new(move |inner| {
            let order1 = Arc::clone(&order1);
            Arc::new(move |sink, req, params| {
                order1.lock().unwrap().push("mw");
                inner(sink, req, params);
            })
        });
        r.register_middleware("ANY", "/api/*", vec![mw]).unwrap();
        r.register_handler("GET", "/api/ping", ok_handler()).unwrap();
        r.register_handler("POST", "/api/ping", ok_handler()).unwrap();

        for verb in [Method::GET, Method::POST] {
            order.lock().unwrap().clear();
            let mut params = ParamsBuffer::new();
            let handler = r.dispatch(&verb, "/api/ping", &mut params);
            let mut sink = RecordingSink::default();
            handler(&mut sink, &request(), &mut params);
            assert_eq!(*order.lock().unwrap(), vec!["mw"], "verb {verb} should run the ANY middleware");
        }
    }

    #[test]
    fn root_any_middleware_also_wraps_the_404_and_405_fallbacks() {
        let r = router();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran1 = Arc::clone(&ran);
        let mw: Middleware = Arc::new(move |inner| {
            let ran1 = Arc::clone(&ran1);
            Arc::new(move |sink, req, params| {
                ran1.fetch_add(1, Ordering::SeqCst);
                inner(sink, req, params);
            })
        });
        r.register_middleware("ANY", "/", vec![mw]).unwrap();

        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::GET, "/missing", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(sink.status, Some(404));
        assert_eq!(ran.load(Ordering::SeqCst), 1);

        r.register_handler("GET", "/x", ok_handler()).unwrap();
        let mut params = ParamsBuffer::new();
        let handler = r.dispatch(&Method::POST, "/x", &mut params);
        let mut sink = RecordingSink::default();
        handler(&mut sink, &request(), &mut params);
        assert_eq!(sink.status, Some(405));
        assert_eq!(ran.load(Ordering::SeqCst), 2);
    }
}
