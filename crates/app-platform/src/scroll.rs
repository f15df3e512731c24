//! Page scroll lock
//!
//! Overlays suspend background scrolling by holding a [`ScrollGuard`].
//! The page is locked while at least one guard is alive, so a component
//! that is torn down mid-animation releases its hold simply by dropping.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared, reference-counted scroll lock for one page
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    /// Create an unlocked scroll lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend page scrolling until the returned guard is dropped
    pub fn acquire(&self) -> ScrollGuard {
        let previous = self.holders.fetch_add(1, Ordering::SeqCst);
        if previous == 0 {
            tracing::trace!("Page scroll locked");
        }
        ScrollGuard { holders: Arc::clone(&self.holders) }
    }

    /// Whether page scrolling is currently suspended
    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    /// Number of live guards
    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::SeqCst)
    }
}

/// Hold on the page scroll lock
///
/// Releases the hold when dropped.
#[derive(Debug)]
pub struct ScrollGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        if self.holders.fetch_sub(1, Ordering::SeqCst) == 1 {
            tracing::trace!("Page scroll restored");
        }
    }
}
