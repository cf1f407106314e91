//! ## flowid-core::alloc::stats
//! **Identifier allocation statistics**
//!
//! Counters live on the manager rather than on a binding, so they accumulate
//! across bind/unbind cycles.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe allocation counters.
#[derive(Debug)]
pub struct AllocStats {
    allocations: AtomicUsize,
    releases: AtomicUsize,
    exhausted: AtomicUsize,
    rejected_releases: AtomicUsize,
}

impl AllocStats {
    /// Creates a new `AllocStats` instance with all counters initialized to zero.
    pub fn new() -> Self {
        AllocStats {
            allocations: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            exhausted: AtomicUsize::new(0),
            rejected_releases: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn increment_allocations(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_releases(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an allocation refused because the pool was full.
    #[inline]
    pub fn increment_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a release refused as out of range or not allocated.
    #[inline]
    pub fn increment_rejected_releases(&self) {
        self.rejected_releases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }

    pub fn exhausted(&self) -> usize {
        self.exhausted.load(Ordering::Relaxed)
    }

    pub fn rejected_releases(&self) -> usize {
        self.rejected_releases.load(Ordering::Relaxed)
    }
}

impl Default for AllocStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_stats_increment_and_read() {
        let stats = AllocStats::new();
        assert_eq!(stats.allocations(), 0);
        assert_eq!(stats.releases(), 0);

        stats.increment_allocations();
        stats.increment_releases();
        stats.increment_exhausted();

        assert_eq!(stats.allocations(), 1);
        assert_eq!(stats.releases(), 1);
        assert_eq!(stats.exhausted(), 1);
        assert_eq!(stats.rejected_releases(), 0);
    }

    #[test]
    fn test_alloc_stats_concurrent_increments() {
        let stats = AllocStats::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        stats.increment_allocations();
                        stats.increment_rejected_releases();
                    }
                });
            }
        });

        assert_eq!(stats.allocations(), 400);
        assert_eq!(stats.rejected_releases(), 400);
    }
}
