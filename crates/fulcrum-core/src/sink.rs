//! The response-writing side of the handler contract.

/// What a [`Handler`](crate::Handler) writes a response through.
///
/// `ResponseSink` is deliberately minimal: a status line, headers, and a body
/// writer. The transport crate that actually owns the socket provides the
/// concrete implementation; the router never constructs one itself, it only
/// ever receives `&mut dyn ResponseSink` from its caller and passes it through
/// to the matched handler.
///
/// Middlewares that need to observe what a handler wrote (access logging, a
/// circuit breaker counting error responses) interpose their own sink that
/// records `write_status`/`write` calls and forwards them to the real one.
/// That wrapping is a middleware concern, not a property of this trait.
pub trait ResponseSink: Send {
    /// Sets the response status code. Implementations should treat a second
    /// call as overriding the first, matching `http.ResponseWriter` semantics
    /// where only the first `WriteHeader` before a body write is observed.
    fn write_status(&mut self, code: u16);

    /// Appends a response header.
    fn header(&mut self, name: &str, value: &str);

    /// Writes a chunk of the response body.
    fn write(&mut self, bytes: &[u8]);
}
