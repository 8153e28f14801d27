//! In-process key-value store backed by DashMap for lock-free concurrent access.
//! Holds per-visitor attribution state for the HTTP service.

use crate::store::KeyValueStore;
use dashmap::DashMap;
use leadflow_core::config::StoreConfig;
use leadflow_core::{LeadError, LeadResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

struct StoreEntry {
    value: String,
    inserted_at: Instant,
}

/// Bounded, TTL-expiring string store shared across request handlers.
#[derive(Clone)]
pub struct MemoryStore {
    store: Arc<DashMap<String, StoreEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl MemoryStore {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.ttl_secs, config.max_entries)
    }

    /// Remove expired entries. Call this periodically from a background task.
    pub fn evict_expired(&self) -> usize {
        // Writers may insert while retain runs, so count removals directly.
        let mut evicted = 0;
        self.store.retain(|_, entry| {
            let keep = entry.inserted_at.elapsed() <= self.ttl;
            if !keep {
                evicted += 1;
            }
            keep
        });
        if evicted > 0 {
            debug!(evicted = evicted, "Visitor store eviction complete");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    /// Returns `None` if the key is missing or its entry outlived the TTL.
    fn get(&self, key: &str) -> LeadResult<Option<String>> {
        let Some(entry) = self.store.get(key) else {
            metrics::counter!("store.miss").increment(1);
            return Ok(None);
        };
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry);
            self.store.remove(key);
            metrics::counter!("store.miss").increment(1);
            return Ok(None);
        }
        metrics::counter!("store.hit").increment(1);
        Ok(Some(entry.value.clone()))
    }

    /// Insert or overwrite. New keys are rejected once the store is full.
    fn set(&self, key: &str, value: &str) -> LeadResult<()> {
        if self.store.len() >= self.max_entries && !self.store.contains_key(key) {
            metrics::counter!("store.rejected").increment(1);
            return Err(LeadError::Store(format!(
                "visitor store full ({} entries)",
                self.max_entries
            )));
        }
        self.store.insert(
            key.to_string(),
            StoreEntry {
                value: value.to_string(),
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> LeadResult<()> {
        self.store.remove(key);
        Ok(())
    }
}
