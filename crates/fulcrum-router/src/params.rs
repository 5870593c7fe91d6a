//! Captured path parameters: two parallel, ordered, pool-reusable sequences.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::Arc;

use fulcrum_core::ParamsAccessor;

/// Inline capacity before a `ParamsBuffer` falls back to heap storage. Most
/// routes capture a handful of parameters at most.
const INLINE_PARAMS: usize = 4;

/// Two parallel ordered sequences of captured parameter keys and values.
///
/// `add` always appends, even if `key` is already present, matching segments
/// are appended innermost-last as the match unwinds back up the tree. `set`
/// updates the first existing entry for `key`, or appends if none exists.
#[derive(Debug, Default, Clone)]
pub struct ParamsBuffer {
    keys: SmallVec<[String; INLINE_PARAMS]>,
    values: SmallVec<[String; INLINE_PARAMS]>,
}

impl ParamsBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no parameters have been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Clears the buffer for reuse without freeing its backing storage.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    /// Iterates over the captured `(key, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl ParamsAccessor for ParamsBuffer {
    fn get(&self, key: &str) -> &str {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.values[i].as_str())
            .unwrap_or("")
    }

    fn add(&mut self, key: &str, value: &str) {
        self.keys.push(key.to_string());
        self.values.push(value.to_string());
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(i) = self.keys.iter().position(|k| k == key) {
            self.values[i] = value.to_string();
        } else {
            self.add(key, value);
        }
    }
}

/// A small pool of reusable [`ParamsBuffer`]s, mirroring the originating
/// implementation's `sync.Pool` of parameter arrays: matching a request
/// acquires a buffer, fills it, and returns it to the pool (cleared) once the
/// handler has finished reading from it.
#[derive(Debug, Default)]
pub struct ParamsPool {
    free: Arc<Mutex<Vec<ParamsBuffer>>>,
}

impl ParamsPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a cleared buffer, reusing one from the pool if available.
    #[must_use]
    pub fn acquire(&self) -> PooledParams {
        let mut buf = self.free.lock().pop().unwrap_or_default();
        buf.clear();
        PooledParams {
            buf: Some(buf),
            pool: Arc::clone(&self.free),
        }
    }
}

/// A [`ParamsBuffer`] borrowed from a [`ParamsPool`], returned to the pool on
/// drop.
pub struct PooledParams {
    buf: Option<ParamsBuffer>,
    pool: Arc<Mutex<Vec<ParamsBuffer>>>,
}

impl std::ops::Deref for PooledParams {
    type Target = ParamsBuffer;
    fn deref(&self) -> &ParamsBuffer {
        self.buf.as_ref().expect("buffer taken only on drop")
    }
}

impl std::ops::DerefMut for PooledParams {
    fn deref_mut(&mut self) -> &mut ParamsBuffer {
        self.buf.as_mut().expect("buffer taken only on drop")
    }
}

impl Drop for PooledParams {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.lock().push(buf);
        }
    }
}
