//! The `Handler`/`Middleware` function contract.

use std::sync::Arc;

use crate::{ParamsAccessor, ResponseSink};

/// The inbound request a [`Handler`] is invoked with.
///
/// Body parsing, query decoding, and percent-decoding are explicitly out of
/// scope for this crate (see the crate-level Non-goals); callers hand the
/// router whatever `http::Request` their transport already produced.
pub type Request = http::Request<()>;

/// A request handler: writes a response through the sink, reading whatever it
/// needs from the request and the captured path parameters.
///
/// Handlers are stored by value in the radix tree, so they must be `Clone`;
/// `Arc<dyn Fn(..)>` gives cheap clones that share the same closure.
pub type Handler = Arc<dyn Fn(&mut dyn ResponseSink, &Request, &mut dyn ParamsAccessor) + Send + Sync>;

/// A middleware: wraps a [`Handler`] to produce a new one.
///
/// Composition order is defined at the call site (see
/// `fulcrum_router::middleware_tree`): the first middleware in a registered
/// list ends up as the outermost wrapper, which means chains are built by
/// folding the list from right to left around the innermost handler.
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_support::RecordingSink;

    fn make_handler(body: &'static str) -> Handler {
        Arc::new(move |sink, _req, _params| {
            sink.write_status(200);
            sink.write(body.as_bytes());
        })
    }

    fn wrap_with_marker(marker: &'static str) -> Middleware {
        Arc::new(move |inner| {
            let marker = marker;
            Arc::new(move |sink, req, params| {
                sink.header("X-Mw", marker);
                inner(sink, req, params);
            })
        })
    }

    #[test]
    fn middleware_wraps_outermost_first() {
        let handler = make_handler("hello");
        let chain: Vec<Middleware> = vec![wrap_with_marker("outer"), wrap_with_marker("inner")];

        // fold right: last middleware wraps the handler first, so the first
        // middleware in the list ends up as the outermost wrapper.
        let composed = chain.into_iter().rev().fold(handler, |h, mw| mw(h));

        let req = http::Request::builder().body(()).unwrap();
        let mut params = Vec::<(String, String)>::new();
        let mut sink = RecordingSink::default();

        struct VecParams<'a>(&'a mut Vec<(String, String)>);
        impl crate::ParamsAccessor for VecParams<'_> {
            fn get(&self, key: &str) -> &str {
                self.0
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("")
            }
            fn add(&mut self, key: &str, value: &str) {
                self.0.push((key.to_string(), value.to_string()));
            }
            fn set(&mut self, key: &str, value: &str) {
                self.add(key, value);
            }
        }

        composed(&mut sink, &req, &mut VecParams(&mut params));

        assert_eq!(sink.status, Some(200));
        assert_eq!(sink.body, b"hello");
        assert_eq!(
            sink.headers,
            vec![
                ("X-Mw".to_string(), "outer".to_string()),
                ("X-Mw".to_string(), "inner".to_string())
            ]
        );
    }
}
