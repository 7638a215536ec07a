//! Error definitions.
use std::error::Error;
use std::result;

/// A specialized Result type for this library.
pub type Result<T, E = DedupError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// An input argument is invalid.
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),

    /// A signature was requested over an empty token set.
    #[error("EmptyInput: signature requested over an empty token set")]
    EmptyInput,

    /// The backend surfaced a failure.
    #[error("BackendUnavailable: {0}")]
    BackendUnavailable(#[from] BackendError),
}

impl DedupError {
    pub(crate) fn input<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(msg.into())
    }
}

/// Failures surfaced by a [`Backend`](crate::backend::Backend).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Contains [`rusqlite::Error`].
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// A stored cluster identifier could not be decoded.
    #[error("corrupt record for band {index}: {value:?} is not a cluster identifier")]
    Corrupt {
        /// Band position of the record.
        index: usize,
        /// The stored value.
        value: String,
    },

    /// A writer panicked while holding the store.
    #[error("store lock poisoned")]
    Poisoned,

    /// Failure of a third-party backend.
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync>),
}
