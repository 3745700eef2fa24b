//! In-memory transactional key-value store.
//!
//! Each transaction works on a private copy of the committed buckets and
//! publishes it on commit. Overlapping write transactions are last-commit
//! wins; callers that need serializable writes must not overlap them.

use super::{Bucket, ForwardCursor, KvError, KvResult, Tx};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

type Keyspace = BTreeMap<Vec<u8>, Vec<u8>>;
type Buckets = BTreeMap<Vec<u8>, Keyspace>;

/// Shared handle to an in-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    committed: Arc<RwLock<Buckets>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given buckets already present.
    pub fn with_buckets<I, B>(names: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let store = Self::new();
        for name in names {
            store.create_bucket(name);
        }
        store
    }

    /// Create a bucket if it does not exist yet.
    pub fn create_bucket(&self, name: impl AsRef<[u8]>) {
        self.committed
            .write()
            .entry(name.as_ref().to_vec())
            .or_default();
    }

    /// Begin a transaction.
    pub fn begin(&self, writable: bool) -> MemoryTx {
        let snapshot = self.committed.read().clone();
        MemoryTx {
            committed: Arc::clone(&self.committed),
            buckets: Mutex::new(snapshot),
            writable,
        }
    }

    /// Run `f` in a read-only transaction.
    pub fn view<R>(&self, f: impl FnOnce(&MemoryTx) -> R) -> R {
        let tx = self.begin(false);
        f(&tx)
    }

    /// Run `f` in a write transaction, committing on `Ok` and rolling back
    /// on `Err`.
    pub fn update<R, E>(&self, f: impl FnOnce(&MemoryTx) -> Result<R, E>) -> Result<R, E>
    where
        E: From<KvError>,
    {
        let tx = self.begin(true);
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tx.rollback();
                Err(e)
            }
        }
    }

    /// Number of committed keys in a bucket.
    pub fn len(&self, bucket: impl AsRef<[u8]>) -> usize {
        self.committed
            .read()
            .get(bucket.as_ref())
            .map_or(0, BTreeMap::len)
    }

    /// Copy of a committed bucket's contents.
    pub fn dump(&self, bucket: impl AsRef<[u8]>) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.committed
            .read()
            .get(bucket.as_ref())
            .map(|keys| keys.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}

/// A transaction against a [`MemoryStore`].
///
/// Dropping without [`commit`](MemoryTx::commit) discards all writes.
pub struct MemoryTx {
    committed: Arc<RwLock<Buckets>>,
    buckets: Mutex<Buckets>,
    writable: bool,
}

impl MemoryTx {
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Publish this transaction's writes.
    pub fn commit(self) -> KvResult<()> {
        if !self.writable {
            return Err(KvError::TxNotWritable);
        }
        *self.committed.write() = self.buckets.into_inner();
        Ok(())
    }

    /// Discard this transaction's writes.
    pub fn rollback(self) {}

    fn with_keyspace<R>(&self, name: &[u8], f: impl FnOnce(&mut Keyspace) -> R) -> KvResult<R> {
        let mut buckets = self.buckets.lock();
        let keys = buckets
            .get_mut(name)
            .ok_or_else(|| KvError::BucketNotFound(String::from_utf8_lossy(name).into_owned()))?;
        Ok(f(keys))
    }
}

impl Tx for MemoryTx {
    fn bucket(&self, name: &[u8]) -> KvResult<Box<dyn Bucket + '_>> {
        if !self.buckets.lock().contains_key(name) {
            return Err(KvError::BucketNotFound(
                String::from_utf8_lossy(name).into_owned(),
            ));
        }
        Ok(Box::new(MemoryBucket {
            tx: self,
            name: name.to_vec(),
        }))
    }
}

/// A bucket opened in a [`MemoryTx`].
pub struct MemoryBucket<'tx> {
    tx: &'tx MemoryTx,
    name: Vec<u8>,
}

impl MemoryBucket<'_> {
    fn check_writable(&self) -> KvResult<()> {
        if self.tx.writable {
            Ok(())
        } else {
            Err(KvError::TxNotWritable)
        }
    }
}

impl Bucket for MemoryBucket<'_> {
    fn get(&self, key: &[u8]) -> KvResult<Vec<u8>> {
        self.tx
            .with_keyspace(&self.name, |keys| keys.get(key).cloned())?
            .ok_or(KvError::KeyNotFound)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.check_writable()?;
        self.tx.with_keyspace(&self.name, |keys| {
            keys.insert(key.to_vec(), value.to_vec());
        })
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        self.check_writable()?;
        self.tx.with_keyspace(&self.name, |keys| {
            keys.remove(key);
        })
    }

    fn forward_cursor(&self, seek: Option<&[u8]>) -> KvResult<Box<dyn ForwardCursor + '_>> {
        let entries: Vec<(Vec<u8>, Vec<u8>)> = self.tx.with_keyspace(&self.name, |keys| {
            let range = match seek {
                Some(start) => keys.range::<[u8], _>((Bound::Included(start), Bound::Unbounded)),
                None => keys.range::<[u8], _>(..),
            };
            range.map(|(k, v)| (k.clone(), v.clone())).collect()
        })?;

        Ok(Box::new(MemoryCursor {
            entries: entries.into_iter(),
            closed: false,
        }))
    }
}

/// Cursor over a snapshot of a bucket taken when it was opened.
pub struct MemoryCursor {
    entries: std::vec::IntoIter<(Vec<u8>, Vec<u8>)>,
    closed: bool,
}

impl ForwardCursor for MemoryCursor {
    fn next(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        if self.closed {
            return None;
        }
        self.entries.next()
    }

    fn err(&mut self) -> Option<KvError> {
        None
    }

    fn close(&mut self) -> KvResult<()> {
        self.closed = true;
        Ok(())
    }
}
