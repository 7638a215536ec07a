//! Stores mapping `(band index, band hash)` to a cluster identifier.
//!
//! A record is created by the first writer of its key and never changes afterwards.
//! Implementations must make [`Backend::assign`] linearizable per key: when several
//! callers race on one key, exactly one identifier is stored and every caller gets it
//! back.
mod memory;
mod sqlite;

use std::sync::Arc;

use uuid::Uuid;

pub use crate::errors::BackendError;
pub use memory::MemoryBackend;
pub use sqlite::{SqliteBackend, DEFAULT_TABLE};

/// Identifier of a duplicate group.
pub type ClusterId = Uuid;

/// Key-value store of band records.
pub trait Backend: Send + Sync {
    /// Stores `cluster` for `(index, hash)` unless a record already exists, and returns
    /// the identifier stored for the key afterwards.
    fn assign(&self, index: usize, hash: &str, cluster: ClusterId)
        -> Result<ClusterId, BackendError>;

    /// Looks up the identifier stored for `(index, hash)`.
    fn query(&self, index: usize, hash: &str) -> Result<Option<ClusterId>, BackendError>;

    /// Returns the identifier stored for `(index, hash)`, creating a record with a fresh
    /// identifier if there is none.
    fn insert(&self, index: usize, hash: &str) -> Result<ClusterId, BackendError> {
        self.assign(index, hash, Uuid::new_v4())
    }
}

impl<B> Backend for &B
where
    B: Backend + ?Sized,
{
    fn assign(
        &self,
        index: usize,
        hash: &str,
        cluster: ClusterId,
    ) -> Result<ClusterId, BackendError> {
        (**self).assign(index, hash, cluster)
    }

    fn query(&self, index: usize, hash: &str) -> Result<Option<ClusterId>, BackendError> {
        (**self).query(index, hash)
    }
}

impl<B> Backend for Box<B>
where
    B: Backend + ?Sized,
{
    fn assign(
        &self,
        index: usize,
        hash: &str,
        cluster: ClusterId,
    ) -> Result<ClusterId, BackendError> {
        (**self).assign(index, hash, cluster)
    }

    fn query(&self, index: usize, hash: &str) -> Result<Option<ClusterId>, BackendError> {
        (**self).query(index, hash)
    }
}

impl<B> Backend for Arc<B>
where
    B: Backend + ?Sized,
{
    fn assign(
        &self,
        index: usize,
        hash: &str,
        cluster: ClusterId,
    ) -> Result<ClusterId, BackendError> {
        (**self).assign(index, hash, cluster)
    }

    fn query(&self, index: usize, hash: &str) -> Result<Option<ClusterId>, BackendError> {
        (**self).query(index, hash)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Checks the behavior every backend must share.
    pub(crate) fn check_contract<B: Backend>(backend: &B) {
        assert_eq!(backend.query(0, "aa").unwrap(), None);

        let x = backend.insert(0, "aa").unwrap();
        assert_eq!(backend.query(0, "aa").unwrap(), Some(x));
        assert_eq!(backend.insert(0, "aa").unwrap(), x);

        // The same hash at another position is another key.
        assert_eq!(backend.query(3, "aa").unwrap(), None);
        let y = backend.insert(3, "aa").unwrap();
        assert_ne!(x, y);

        // First writer wins.
        assert_eq!(backend.assign(0, "aa", Uuid::new_v4()).unwrap(), x);
        let z = Uuid::new_v4();
        assert_eq!(backend.assign(1, "bb", z).unwrap(), z);
        assert_eq!(backend.query(1, "bb").unwrap(), Some(z));
    }

    #[test]
    fn test_forwarding_impls() {
        let backend = Arc::new(MemoryBackend::new());
        check_contract(&backend);
        let boxed: Box<dyn Backend> = Box::new(MemoryBackend::new());
        check_contract(&boxed);
    }
}
