//! Key-value storage seam for per-visitor attribution state.
//! Mirrors browser `localStorage`: string keys, string values, synchronous.

use leadflow_core::LeadResult;

/// Synchronous string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> LeadResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> LeadResult<()>;

    fn remove(&self, key: &str) -> LeadResult<()>;
}

/// View over a shared store that prefixes every key, giving each visitor
/// their own keyspace.
pub struct ScopedStore<'a, S: KeyValueStore + ?Sized> {
    inner: &'a S,
    prefix: String,
}

impl<'a, S: KeyValueStore + ?Sized> ScopedStore<'a, S> {
    pub fn new(inner: &'a S, scope: &str) -> Self {
        Self {
            inner,
            prefix: format!("visitor:{scope}:"),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for ScopedStore<'_, S> {
    fn get(&self, key: &str) -> LeadResult<Option<String>> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> LeadResult<()> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> LeadResult<()> {
        self.inner.remove(&self.scoped(key))
    }
}
