use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::tfidf::SparseVector;

/// Definition vectors keyed by the exact normalized definition.
/// Filled lazily, never evicted; bounded by the corpus size.
#[derive(Default)]
pub struct VectorCache {
    entries: RwLock<HashMap<String, Arc<SparseVector>>>,
}

impl VectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<SparseVector>> {
        self.entries.read().get(key).cloned()
    }

    /// Cached vector for `key`, computing and storing it on first use.
    /// Failed computations are not cached.
    pub fn get_or_try_insert<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<SparseVector, E>,
    ) -> Result<Arc<SparseVector>, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }

        let vector = Arc::new(compute()?);
        let mut entries = self.entries.write();
        // another reader may have filled it meanwhile
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| vector.clone());
        Ok(entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
