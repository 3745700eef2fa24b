//! User store over a caller-owned transaction.
//!
//! Two buckets are kept in lockstep: the primary table maps an encoded
//! [`UserId`] to the serialized [`User`], and the name index maps the raw
//! name bytes to the encoded id. Every operation takes the caller's
//! transaction; the store holds no state besides its configuration.

use crate::codec::{decode_user, encode_user};
use crate::error::{Result, StoreError};
use crate::kv::{Bucket, ScopedCursor, Tx};
use crate::types::{FindOptions, PayloadEncoding, User, UserId, UserUpdate};
use tracing::{debug, warn};

/// Page size used when a listing gives no options.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page a listing returns.
pub const MAX_PAGE_SIZE: usize = 100;

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Primary table bucket (id -> user).
    pub user_bucket: Vec<u8>,

    /// Name index bucket (name -> id).
    pub index_bucket: Vec<u8>,

    /// Limit used by `list_users` without options.
    pub default_page_size: usize,

    /// Upper bound on any listing limit.
    pub max_page_size: usize,

    /// Payload encoding of the primary table.
    pub encoding: PayloadEncoding,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            user_bucket: b"usersv1".to_vec(),
            index_bucket: b"userindexv1".to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            encoding: PayloadEncoding::Json,
        }
    }
}

/// One page of a user listing.
#[derive(Debug, Default)]
pub struct UserPage {
    /// Users in ascending id order.
    pub users: Vec<User>,

    /// Entries within the page window that could not be decoded.
    pub skipped: usize,

    /// Error that ended the scan early. `users` holds what was read before.
    pub error: Option<StoreError>,
}

impl UserPage {
    /// Drop partial results if the scan failed.
    pub fn into_result(self) -> Result<Vec<User>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.users),
        }
    }
}

/// Entity-level operations on users.
#[derive(Clone, Debug, Default)]
pub struct UserStore {
    config: StoreConfig,
}

impl UserStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn users<'tx, T: Tx + ?Sized>(&self, tx: &'tx T) -> Result<Box<dyn Bucket + 'tx>> {
        tx.bucket(&self.config.user_bucket)
            .map_err(StoreError::internal)
    }

    fn index<'tx, T: Tx + ?Sized>(&self, tx: &'tx T) -> Result<Box<dyn Bucket + 'tx>> {
        tx.bucket(&self.config.index_bucket)
            .map_err(StoreError::internal)
    }

    /// Fails unless `name` is absent from the name index.
    fn ensure_unique_name<T: Tx + ?Sized>(&self, tx: &T, name: &str) -> Result<()> {
        let index = self.index(tx)?;
        match index.get(name.as_bytes()) {
            Err(e) if e.is_not_found() => Ok(()),
            Ok(_) => Err(StoreError::NameNotUnique(name.to_string())),
            Err(e) => Err(StoreError::Internal(e)),
        }
    }

    fn page_limit(&self, opts: Option<&FindOptions>) -> usize {
        let limit = opts.map_or(self.config.default_page_size, |o| o.limit);
        if limit == 0 || limit > self.config.max_page_size {
            self.config.max_page_size
        } else {
            limit
        }
    }

    // --- Reads ---

    /// Get a user by id.
    pub fn get_user<T: Tx + ?Sized>(&self, tx: &T, id: UserId) -> Result<User> {
        let key = id.encode().map_err(StoreError::InvalidUserId)?;

        let users = self.users(tx)?;
        let value = users.get(&key).map_err(StoreError::from_lookup)?;

        decode_user(self.config.encoding, &value)
    }

    /// Get a user by name.
    ///
    /// An index entry whose user is missing reports what [`get_user`]
    /// reports for that id.
    ///
    /// [`get_user`]: UserStore::get_user
    pub fn get_user_by_name<T: Tx + ?Sized>(&self, tx: &T, name: &str) -> Result<User> {
        let index = self.index(tx)?;
        let raw = index
            .get(name.as_bytes())
            .map_err(StoreError::from_lookup)?;

        let id = UserId::decode(&raw).map_err(StoreError::CorruptId)?;
        self.get_user(tx, id)
    }

    /// List users in ascending id order.
    ///
    /// Without options the default page size applies. A limit of zero or
    /// above the maximum page size is clamped to the maximum. Entries that
    /// fail to decode are counted in [`UserPage::skipped`] and left out.
    pub fn list_users<T: Tx + ?Sized>(
        &self,
        tx: &T,
        opts: Option<FindOptions>,
    ) -> Result<UserPage> {
        let limit = self.page_limit(opts.as_ref());
        let offset = opts.map_or(0, |o| o.offset);

        let users = self.users(tx)?;
        let mut cursor = ScopedCursor::new(
            users
                .forward_cursor(None)
                .map_err(StoreError::internal)?,
        );

        let mut page = UserPage::default();
        let mut passed = 0;
        for (key, value) in cursor.by_ref() {
            if passed < offset {
                passed += 1;
                continue;
            }

            match decode_user(self.config.encoding, &value) {
                Ok(user) => page.users.push(user),
                Err(e) => {
                    warn!(key = %String::from_utf8_lossy(&key), error = %e, "skipping corrupt user");
                    page.skipped += 1;
                    continue;
                }
            }

            if page.users.len() >= limit {
                break;
            }
        }

        if let Some(e) = cursor.err() {
            warn!(error = %e, collected = page.users.len(), "user scan ended early");
            page.error = Some(StoreError::Internal(e));
        }

        Ok(page)
    }

    // --- Writes ---

    /// Create a user.
    ///
    /// Writes the index entry, then the primary entry. If the second write
    /// fails the first is left in place for the caller's rollback.
    pub fn create_user<T: Tx + ?Sized>(&self, tx: &T, user: &User) -> Result<()> {
        let key = user.id.encode().map_err(StoreError::InvalidUserId)?;

        self.ensure_unique_name(tx, &user.name)?;

        let index = self.index(tx)?;
        let users = self.users(tx)?;
        // An overwrite would orphan the previous name's index entry.
        match users.get(&key) {
            Err(e) if e.is_not_found() => {}
            Ok(_) => return Err(StoreError::UserExists(user.id)),
            Err(e) => return Err(StoreError::Internal(e)),
        }

        let value = encode_user(self.config.encoding, user)?;

        index
            .put(user.name.as_bytes(), &key)
            .map_err(StoreError::internal)?;
        users.put(&key, &value).map_err(StoreError::internal)?;

        debug!(id = %user.id, name = %user.name, "created user");
        Ok(())
    }

    /// Apply `upd` to a user and return the result.
    ///
    /// A rename to the user's current name leaves the index alone.
    pub fn update_user<T: Tx + ?Sized>(
        &self,
        tx: &T,
        id: UserId,
        upd: UserUpdate,
    ) -> Result<User> {
        let mut user = self.get_user(tx, id)?;
        let key = id.encode().map_err(StoreError::InvalidUserId)?;

        if let Some(name) = upd.name {
            if name != user.name {
                self.ensure_unique_name(tx, &name)?;

                let index = self.index(tx)?;
                index
                    .delete(user.name.as_bytes())
                    .map_err(StoreError::internal)?;
                index
                    .put(name.as_bytes(), &key)
                    .map_err(StoreError::internal)?;

                debug!(id = %id, from = %user.name, to = %name, "renamed user");
                user.name = name;
            }
        }

        if let Some(status) = upd.status {
            debug!(id = %id, %status, "set user status");
            user.status = status;
        }

        let value = encode_user(self.config.encoding, &user)?;
        let users = self.users(tx)?;
        users.put(&key, &value).map_err(StoreError::internal)?;

        Ok(user)
    }

    /// Delete a user and its name index entry.
    pub fn delete_user<T: Tx + ?Sized>(&self, tx: &T, id: UserId) -> Result<()> {
        let user = self.get_user(tx, id)?;
        let key = id.encode().map_err(StoreError::InvalidUserId)?;

        let index = self.index(tx)?;
        index
            .delete(user.name.as_bytes())
            .map_err(StoreError::internal)?;

        let users = self.users(tx)?;
        users.delete(&key).map_err(StoreError::internal)?;

        debug!(id = %id, name = %user.name, "deleted user");
        Ok(())
    }
}
