use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide count of requests seen by [`RequestCounter`].
///
/// Clones share the same counter. Every increment yields a distinct value,
/// even across worker threads.
///
/// [`RequestCounter`]: crate::middleware::request_counter::RequestCounter
#[derive(Debug, Clone, Default)]
pub struct RequestCount(Arc<AtomicU64>);

impl RequestCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one and return the new value.
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
