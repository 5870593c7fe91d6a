//! Read/write access to captured path parameters.

/// Read/write access to the parameters captured for the current request.
///
/// `get` never fails: an absent key returns an empty string, matching the
/// contract a handler written against `Params.GetParam` in the originating
/// implementation expects. `add` always appends, even if the key is already
/// present; `set` updates the first matching entry or appends if none exists.
///
/// Methods take `&str` rather than `impl Into<String>` so the trait stays
/// object-safe: [`crate::Handler`] is invoked with `&mut dyn ParamsAccessor`.
pub trait ParamsAccessor {
    /// Returns the value for `key`, or `""` if it was never captured.
    fn get(&self, key: &str) -> &str;

    /// Appends a `(key, value)` pair, even if `key` is already present.
    fn add(&mut self, key: &str, value: &str);

    /// Updates the first entry for `key`, or appends if absent.
    fn set(&mut self, key: &str, value: &str);
}
