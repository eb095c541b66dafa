//! Single-slot cache with a fixed time-to-live.
//!
//! Bounds how often the remote store is queried: while a value is younger
//! than the TTL every caller gets the same shared object back.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default lifetime of a cached table.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Holds one value together with the instant it was fetched.
///
/// Assumes a single writer (the render loop).
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Option<(Arc<T>, Instant)>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value if it is still fresh at `now`, otherwise call
    /// `fetch` and store its result.
    pub fn get_or_refresh<F>(&mut self, now: Instant, fetch: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.peek(now) {
            return value;
        }

        let value = Arc::new(fetch());
        self.slot = Some((Arc::clone(&value), now));
        value
    }

    /// Return the cached value without refreshing, if fresh at `now`.
    pub fn peek(&self, now: Instant) -> Option<Arc<T>> {
        match &self.slot {
            Some((value, fetched_at)) if now.saturating_duration_since(*fetched_at) < self.ttl => {
                Some(Arc::clone(value))
            }
            _ => None,
        }
    }

    /// When the current value was fetched.
    pub fn fetched_at(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(_, at)| *at)
    }

    /// Drop the cached value so the next call refetches.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
