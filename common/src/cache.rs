//! Query cache keyed by resource identity.
//!
//! Reads store their decoded payload under a `QueryKey` such as
//! `["jobs", "<id>", "evidence"]`. A read is served from the cache while the
//! entry is younger than the caller's staleness window and has not been
//! invalidated. Mutations invalidate by *prefix*, so invalidating `["jobs"]`
//! also marks every job detail, evidence and gap entry stale.
//!
//! Each invalidation bumps a generation counter. A fetch that started before
//! an invalidation does not write its (possibly pre-mutation) result back.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug)]
struct Entry {
    value: Value,
    fetched_at: Duration,
    invalidated: bool,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RefCell<HashMap<QueryKey, Entry>>,
    generation: Cell<u64>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if it is valid and at most `stale_time` old at `now`.
    pub fn get_fresh<R: DeserializeOwned>(
        &self,
        key: &QueryKey,
        now: Duration,
        stale_time: Duration,
    ) -> Option<R> {
        let entries = self.entries.borrow();
        let entry = entries.get(key)?;
        if entry.invalidated || now.saturating_sub(entry.fetched_at) > stale_time {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn insert<R: Serialize>(&self, key: QueryKey, value: &R, now: Duration) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        self.entries.borrow_mut().insert(
            key,
            Entry {
                value,
                fetched_at: now,
                invalidated: false,
            },
        );
    }

    /// Current generation; pair with `insert_if_current` around a fetch.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Inserts only if no invalidation happened since `generation` was read.
    pub fn insert_if_current<R: Serialize>(
        &self,
        key: QueryKey,
        value: &R,
        now: Duration,
        generation: u64,
    ) -> bool {
        if self.generation.get() != generation {
            debug!("not caching {key}: invalidated while in flight");
            return false;
        }
        self.insert(key, value, now);
        true
    }

    /// Marks every entry under `prefix` stale. Returns how many were affected.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.generation.set(self.generation.get() + 1);
        let mut affected = 0;
        for (key, entry) in self.entries.borrow_mut().iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                affected += 1;
            }
        }
        debug!("invalidated {affected} entries under {prefix}");
        affected
    }

    pub fn clear(&self) {
        self.generation.set(self.generation.get() + 1);
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parts: &[&str]) -> QueryKey {
        QueryKey::new(parts.iter().copied())
    }

    #[test]
    fn fresh_until_stale_window_elapses() {
        let cache = QueryCache::new();
        cache.insert(key(&["controls", "soc2"]), &vec!["CC6.1"], Duration::ZERO);

        let hour = Duration::from_secs(3600);
        let hit: Option<Vec<String>> =
            cache.get_fresh(&key(&["controls", "soc2"]), Duration::from_secs(3599), hour);
        assert_eq!(hit, Some(vec!["CC6.1".to_string()]));

        let miss: Option<Vec<String>> =
            cache.get_fresh(&key(&["controls", "soc2"]), Duration::from_secs(3601), hour);
        assert_eq!(miss, None);
    }

    #[test]
    fn invalidation_is_by_prefix() {
        let cache = QueryCache::new();
        let now = Duration::ZERO;
        cache.insert(key(&["jobs"]), &1, now);
        cache.insert(key(&["jobs", "j-1"]), &2, now);
        cache.insert(key(&["jobs", "j-1", "evidence"]), &3, now);
        cache.insert(key(&["documents"]), &4, now);

        assert_eq!(cache.invalidate(&key(&["jobs"])), 3);

        let window = Duration::from_secs(30);
        assert_eq!(cache.get_fresh::<i32>(&key(&["jobs", "j-1"]), now, window), None);
        assert_eq!(cache.get_fresh::<i32>(&key(&["documents"]), now, window), Some(4));
    }

    #[test]
    fn in_flight_result_is_dropped_after_invalidation() {
        let cache = QueryCache::new();
        let generation = cache.generation();
        cache.invalidate(&key(&["documents"]));

        assert!(!cache.insert_if_current(key(&["documents"]), &1, Duration::ZERO, generation));
        assert!(cache.is_empty());
    }

    #[test]
    fn prefix_does_not_match_partial_segments() {
        assert!(!key(&["jobs-archive"]).starts_with(&key(&["jobs"])));
        assert!(key(&["jobs", "j-1"]).starts_with(&key(&["jobs"])));
    }
}
