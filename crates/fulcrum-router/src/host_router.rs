//! Dispatches to one of several sub-routers by matching the request's `Host`
//! against a glob pattern, falling back to a default sub-router.

use std::sync::Arc;

use fulcrum_core::{Handler, Middleware};
use http::Method;

use crate::error::RouterError;
use crate::glob::glob_match;
use crate::params::ParamsBuffer;
use crate::router::RouterCore;

/// Reads the `host=GLOB` tag out of a registration pattern's tag suffix, if
/// present.
fn host_tag(pattern: &str) -> Option<&str> {
    pattern
        .split(' ')
        .skip(1)
        .find_map(|tag| tag.strip_prefix("host="))
}

/// An ordered list of `(host glob, sub-router)` pairs plus a default
/// sub-router, selected by matching an inbound request's `Host` header.
///
/// Registration reads a `host=GLOB` tag off the pattern to decide which
/// sub-router a route belongs to; routes with no such tag go to the default.
/// Re-registering the same host pattern replaces the sub-router bound to it
/// rather than adding a second, unreachable entry; registering the empty
/// host string replaces the default.
pub struct HostRouter {
    hosts: parking_lot::RwLock<Vec<(String, Arc<dyn RouterCore>)>>,
    default: parking_lot::RwLock<Arc<dyn RouterCore>>,
}

impl HostRouter {
    /// Creates a `HostRouter` whose default sub-router is `default`.
    #[must_use]
    pub fn new(default: Arc<dyn RouterCore>) -> Self {
        Self {
            hosts: parking_lot::RwLock::new(Vec::new()),
            default: parking_lot::RwLock::new(default),
        }
    }

    /// Binds `host_glob` to `sub_router`, replacing any previous binding for
    /// the same glob pattern. An empty `host_glob` replaces the default.
    pub fn bind_host(&self, host_glob: &str, sub_router: Arc<dyn RouterCore>) {
        if host_glob.is_empty() {
            *self.default.write() = sub_router;
            return;
        }
        let mut hosts = self.hosts.write();
        if let Some(existing) = hosts.iter_mut().find(|(g, _)| g == host_glob) {
            existing.1 = sub_router;
        } else {
            hosts.push((host_glob.to_string(), sub_router));
        }
    }

    /// Selects the sub-router whose glob matches `host`, or the default.
    #[must_use]
    pub fn select(&self, host: &str) -> Arc<dyn RouterCore> {
        let hosts = self.hosts.read();
        for (glob, sub_router) in hosts.iter() {
            if glob_match(glob, host) {
                return Arc::clone(sub_router);
            }
        }
        Arc::clone(&self.default.read())
    }

    /// Selects a sub-router by `host` and dispatches through it. This is the
    /// entry point transports should call; [`RouterCore::dispatch`] (which
    /// carries no `Host`) always goes through the default sub-router.
    #[must_use]
    pub fn dispatch_with_host(
        &self,
        host: &str,
        method: &Method,
        path: &str,
        params: &mut ParamsBuffer,
    ) -> Handler {
        self.select(host).dispatch(method, path, params)
    }
}

impl RouterCore for HostRouter {
    fn register_middleware(
        &self,
        method: &str,
        path: &str,
        list: Vec<Middleware>,
    ) -> Result<(), RouterError> {
        let target = match host_tag(path) {
            Some(glob) if !glob.is_empty() => self.select(glob),
            _ => Arc::clone(&self.default.read()),
        };
        target.register_middleware(method, path, list)
    }

    fn register_handler(&self, method: &str, path: &str, handler: Handler) -> Result<(), RouterError> {
        let target = match host_tag(path) {
            Some(glob) if !glob.is_empty() => self.select(glob),
            _ => Arc::clone(&self.default.read()),
        };
        target.register_handler(method, path, handler)
    }

    fn dispatch(&self, method: &Method, path: &str, params: &mut ParamsBuffer) -> Handler {
        // `RouterCore::dispatch` carries no `Host`, so this always goes
        // through the default sub-router; callers that need host-based
        // selection should call `dispatch_with_host` directly.
        self.default.read().dispatch(method, path, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use fulcrum_config::RouterConfig;
    use fulcrum_core::ResponseSink;

    struct RecordingSink {
        status: Option<u16>,
    }
    impl ResponseSink for RecordingSink {
        fn write_status(&mut self, code: u16) {
            self.status = Some(code);
        }
        fn header(&mut self, _name: &str, _value: &str) {}
        fn write(&mut self, _bytes: &[u8]) {}
    }

    fn ok_handler() -> Handler {
        Arc::new(|sink, _req, _params| sink.write_status(200))
    }

    #[test]
    fn host_tag_registers_on_the_matching_sub_router() {
        let default_router: Arc<dyn RouterCore> = Arc::new(Router::new(RouterConfig::default()));
        let tenant_router: Arc<dyn RouterCore> = Arc::new(Router::new(RouterConfig::default()));
        let host_router = HostRouter::new(Arc::clone(&default_router));
        host_router.bind_host("tenant.example.com", Arc::clone(&tenant_router));

        host_router
            .register_handler("GET", "/dash dashboard host=tenant.example.com", ok_handler())
            .unwrap();

        let mut params = ParamsBuffer::new();
        let handler = tenant_router.dispatch(&Method::GET, "/dash", &mut params);
        let mut sink = RecordingSink { status: None };
        handler(&mut sink, &http::Request::builder().body(()).unwrap(), &mut params);
        assert_eq!(sink.status, Some(200));

        // default router never saw this route.
        let mut params = ParamsBuffer::new();
        let handler = default_router.dispatch(&Method::GET, "/dash", &mut params);
        let mut sink = RecordingSink { status: None };
        handler(&mut sink, &http::Request::builder().body(()).unwrap(), &mut params);
        assert_eq!(sink.status, Some(404));
    }

    #[test]
    fn no_host_tag_registers_on_default() {
        let default_router: Arc<dyn RouterCore> = Arc::new(Router::new(RouterConfig::default()));
        let host_router = HostRouter::new(Arc::clone(&default_router));

        host_router.register_handler("GET", "/ping", ok_handler()).unwrap();

        let mut params = ParamsBuffer::new();
        let handler = default_router.dispatch(&Method::GET, "/ping", &mut params);
        let mut sink = RecordingSink { status: None };
        handler(&mut sink, &http::Request::builder().body(()).unwrap(), &mut params);
        assert_eq!(sink.status, Some(200));
    }

    #[test]
    fn rebinding_a_host_glob_replaces_the_sub_router() {
        let default_router: Arc<dyn RouterCore> = Arc::new(Router::new(RouterConfig::default()));
        let first: Arc<dyn RouterCore> = Arc::new(Router::new(RouterConfig::default()));
        let second: Arc<dyn RouterCore> = Arc::new(Router::new(RouterConfig::default()));
        let host_router = HostRouter::new(default_router);

        host_router.bind_host("*.example.com", first);
        host_router.bind_host("*.example.com", Arc::clone(&second));

        assert!(Arc::ptr_eq(&host_router.select("api.example.com"), &second));
        assert_eq!(host_router.hosts.read().len(), 1);
    }

    #[test]
    fn select_falls_back_to_default_for_unmatched_host() {
        let default_router: Arc<dyn RouterCore> = Arc::new(Router::new(RouterConfig::default()));
        let host_router = HostRouter::new(Arc::clone(&default_router));
        host_router.bind_host(
            "tenant.example.com",
            Arc::new(Router::new(RouterConfig::default())),
        );

        assert!(Arc::ptr_eq(
            &host_router.select("unrelated.example.org"),
            &default_router
        ));
    }
}
