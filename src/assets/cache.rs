// In-memory runtime cache of instantiated assets

use super::AssetHandle;
use std::collections::HashMap;
use std::sync::Arc;

/// Handle to shared runtime object mapping for one asset type
///
/// Entries live until the owning project is closed. There is no eviction.
#[derive(Debug)]
pub struct RuntimeCache<T> {
    entries: HashMap<AssetHandle, Arc<T>>,
}

impl<T> Default for RuntimeCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> RuntimeCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a shared reference to a cached object
    pub fn get(&self, handle: AssetHandle) -> Option<Arc<T>> {
        self.entries.get(&handle).cloned()
    }

    /// Insert an object and return the shared reference now held by the cache
    pub fn insert(&mut self, handle: AssetHandle, object: T) -> Arc<T> {
        let shared = Arc::new(object);
        self.entries.insert(handle, Arc::clone(&shared));
        shared
    }

    /// Find the first cached object matching a predicate
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<(AssetHandle, Arc<T>)> {
        self.entries
            .iter()
            .find(|(_, object)| predicate(object))
            .map(|(handle, object)| (*handle, Arc::clone(object)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
