//! # Tenant Store
//!
//! Transactional storage for users on top of an ordered key-value
//! transaction.
//!
//! ## Core Concepts
//!
//! - **Primary table**: encoded user id -> serialized user
//! - **Name index**: user name -> encoded user id, enforcing unique names
//! - **Transactions**: owned by the caller; every operation runs inside the
//!   [`kv::Tx`] it is given and relies on it for all-or-nothing writes
//!
//! ## Example
//!
//! ```
//! use tenant_store::{MemoryStore, Status, User, UserId, UserStore, UserUpdate};
//!
//! let store = UserStore::default();
//! let kv = MemoryStore::with_buckets(["usersv1", "userindexv1"]);
//!
//! let tx = kv.begin(true);
//! store.create_user(&tx, &User::new(UserId(1), "alice"))?;
//! store.update_user(&tx, UserId(1), UserUpdate::new().with_status(Status::Inactive))?;
//! tx.commit()?;
//!
//! let tx = kv.begin(false);
//! let alice = store.get_user_by_name(&tx, "alice")?;
//! assert_eq!(alice.status, Status::Inactive);
//! # Ok::<(), tenant_store::StoreError>(())
//! ```

pub mod codec;
pub mod error;
pub mod kv;
pub mod store;
pub mod types;

// Re-exports
pub use error::{ErrorCode, IdError, Result, StoreError};
pub use kv::{Bucket, ForwardCursor, KvError, KvResult, MemoryStore, MemoryTx, ScopedCursor, Tx};
pub use store::{StoreConfig, UserPage, UserStore, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use types::*;
