use std::sync::{Mutex, MutexGuard};

use hashbrown::{HashMap, HashSet};

use super::{Backend, BackendError, ClusterId};

type Records = HashMap<(usize, String), ClusterId>;

/// Single-process backend holding records in a hash map.
///
/// Records live as long as the instance; share one instance across callers by reference.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<Records>,
}

impl MemoryBackend {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the number of records.
    pub fn len(&self) -> Result<usize, BackendError> {
        Ok(self.lock()?.len())
    }

    /// Checks if no record is stored.
    pub fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.lock()?.is_empty())
    }

    /// Gets the number of distinct cluster identifiers.
    pub fn num_clusters(&self) -> Result<usize, BackendError> {
        let records = self.lock()?;
        let clusters = records.values().collect::<HashSet<_>>().len();
        Ok(clusters)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, BackendError> {
        self.records.lock().map_err(|_| BackendError::Poisoned)
    }
}

impl Backend for MemoryBackend {
    fn assign(
        &self,
        index: usize,
        hash: &str,
        cluster: ClusterId,
    ) -> Result<ClusterId, BackendError> {
        let mut records = self.lock()?;
        let stored = *records
            .entry((index, hash.to_string()))
            .or_insert(cluster);
        tracing::trace!(index, hash, %stored, created = stored == cluster, "assign");
        Ok(stored)
    }

    fn query(&self, index: usize, hash: &str) -> Result<Option<ClusterId>, BackendError> {
        let records = self.lock()?;
        Ok(records.get(&(index, hash.to_string())).copied())
    }
}
