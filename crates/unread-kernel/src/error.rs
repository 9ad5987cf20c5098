//! Error types for unread kernel operations.

/// Failures reported by a read-map or user-metadata backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot be reached or is locked by another writer.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing medium failed.
    #[error("store I/O error: {0}")]
    Io(String),

    /// The backing medium holds bytes the backend refuses to interpret.
    #[error("store corrupted: {0}")]
    Corrupt(String),
}

/// Errors surfaced by session operations.
///
/// Unauthenticated sessions never produce these: every operation degrades
/// to a no-op or a topic-level fallback instead.
#[derive(Debug, thiserror::Error)]
pub enum UnreadError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
