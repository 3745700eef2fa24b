//! Ordered key-value transaction contract.
//!
//! The user store never begins, commits or rolls back a transaction. It is
//! handed a [`Tx`] by the caller, opens named buckets inside it and issues
//! point reads, writes and forward scans. Atomicity of a multi-write
//! operation is whatever the caller's transaction gives.

mod cursor;
mod memory;

pub use cursor::ScopedCursor;
pub use memory::{MemoryBucket, MemoryCursor, MemoryStore, MemoryTx};

use thiserror::Error;

/// Errors raised by a key-value collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KvError {
    #[error("key not found")]
    KeyNotFound,

    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    #[error("transaction is read-only")]
    TxNotWritable,

    #[error("transaction is closed")]
    TxClosed,

    #[error("backend error: {0}")]
    Backend(String),
}

impl KvError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::KeyNotFound)
    }
}

/// Result type for collaborator calls.
pub type KvResult<T> = std::result::Result<T, KvError>;

/// A transaction over named buckets.
///
/// Implementations are used from one thread at a time; the store makes
/// calls strictly in sequence.
pub trait Tx {
    /// Open a bucket by name.
    fn bucket(&self, name: &[u8]) -> KvResult<Box<dyn Bucket + '_>>;
}

/// A named keyspace inside a transaction. Keys are ordered bytewise.
pub trait Bucket {
    /// Read a value. A missing key is [`KvError::KeyNotFound`].
    fn get(&self, key: &[u8]) -> KvResult<Vec<u8>>;

    /// Insert or overwrite a value.
    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn delete(&self, key: &[u8]) -> KvResult<()>;

    /// Open a cursor over keys `>= seek` (or all keys) in ascending order.
    ///
    /// The cursor must be closed; wrap it in a [`ScopedCursor`] so that it
    /// is closed on every path.
    fn forward_cursor(&self, seek: Option<&[u8]>) -> KvResult<Box<dyn ForwardCursor + '_>>;
}

/// Forward iteration over a bucket.
pub trait ForwardCursor {
    /// Next entry, or `None` once exhausted or after a failure.
    fn next(&mut self) -> Option<(Vec<u8>, Vec<u8>)>;

    /// The error that ended iteration early, if any.
    fn err(&mut self) -> Option<KvError>;

    /// Release the cursor.
    fn close(&mut self) -> KvResult<()>;
}
