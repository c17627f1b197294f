use std::time::Duration;
use dashmap::DashMap;
use crate::types::price::Price;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry<V> {
    pub coin: String,
    pub value: V,
    pub fetched_at: Timestamp,
}

/// In-memory cache keyed by canonical coin id with a fixed TTL.
///
/// ## Freshness
/// An entry is fresh while `now - fetched_at < ttl`. Nothing is evicted in
/// the background: stale entries are bypassed on read and overwritten on the
/// next write.
///
/// ## Ordering
/// A write never replaces an entry with a newer `fetched_at`. Concurrent
/// writers for the same coin otherwise race last-writer-wins.
///
/// ## Capacity
/// Unbounded by default. With `max_entries` set, inserting a new coin into a
/// full cache first drops the entry with the oldest `fetched_at`.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    max_entries: Option<usize>,
}

pub type PriceCache = TtlCache<Price>;

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            entries: DashMap::new(),
            ttl,
            max_entries: None,
        }
    }

    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries.filter(|&max| max > 0);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, coin: &str) -> Option<CacheEntry<V>> {
        self.entries.get(coin).map(|entry| entry.clone())
    }

    pub fn is_fresh(&self, entry: &CacheEntry<V>, now: Timestamp) -> bool {
        now - entry.fetched_at < self.ttl
    }

    /// Cached value for `coin`, if present and fresh at `now`.
    pub fn get_fresh(&self, coin: &str, now: Timestamp) -> Option<V> {
        self.get(coin)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value)
    }

    pub fn put(&self, coin: &str, value: V, now: Timestamp) {
        let existing = self.entries.get(coin).map(|entry| entry.fetched_at);
        match existing {
            Some(fetched_at) if fetched_at > now => {
                tracing::debug!("Skipping out-of-order cache write for {}", coin);
                return;
            }
            Some(_) => {}
            None => self.make_room(),
        }

        self.entries.insert(
            coin.to_string(),
            CacheEntry {
                coin: coin.to_string(),
                value,
                fetched_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self) {
        let Some(max) = self.max_entries else {
            return;
        };

        while self.entries.len() >= max {
            let oldest = self.entries.iter()
                .min_by_key(|entry| entry.fetched_at)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(coin) => {
                    self.entries.remove(&coin);
                    tracing::debug!("Evicted {} from cache", coin);
                }
                None => break,
            }
        }
    }
}
