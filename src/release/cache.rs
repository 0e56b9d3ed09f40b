use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::ReleaseSummary;

/// How long a fetched summary stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    summary: Arc<ReleaseSummary>,
    stored_at: Instant,
}

/// Single-slot cache for the latest release summary.
///
/// The summary and its timestamp live in one entry and are always replaced
/// together. The lock is only held for the swap itself.
pub struct ReleaseCache {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl ReleaseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// The cached summary, if one was stored less than `ttl` before `now`.
    pub fn get(&self, now: Instant) -> Option<Arc<ReleaseSummary>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.summary))
    }

    /// Replace the slot. Last write wins.
    pub fn put(&self, summary: Arc<ReleaseSummary>, stored_at: Instant) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(CacheEntry { summary, stored_at });
    }

    pub fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

impl Default for ReleaseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(version: &str) -> Arc<ReleaseSummary> {
        Arc::new(ReleaseSummary {
            version: version.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = ReleaseCache::default();
        assert!(cache.get(Instant::now()).is_none());
    }

    #[test]
    fn test_fresh_entry_hits_same_arc() {
        let cache = ReleaseCache::default();
        let t0 = Instant::now();
        let stored = summary("1.0.0");
        cache.put(Arc::clone(&stored), t0);

        let hit = cache.get(t0 + Duration::from_secs(4 * 60)).unwrap();
        assert!(Arc::ptr_eq(&hit, &stored));
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let cache = ReleaseCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.put(summary("1.0.0"), t0);

        assert!(cache.get(t0 + Duration::from_secs(59)).is_some());
        assert!(cache.get(t0 + Duration::from_secs(60)).is_none());
    }

    #[test]
    fn test_put_replaces_and_clear_empties() {
        let cache = ReleaseCache::default();
        let t0 = Instant::now();
        cache.put(summary("1.0.0"), t0);
        cache.put(summary("1.1.0"), t0);
        assert_eq!(cache.get(t0).unwrap().version, "1.1.0");

        cache.clear();
        assert!(cache.get(t0).is_none());
    }
}
