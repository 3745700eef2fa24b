//! Core types for the user store.

use crate::error::IdError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of an encoded [`UserId`] key.
pub const ID_ENCODED_LEN: usize = 16;

/// Unique identifier for a user.
///
/// Zero is reserved and never identifies a user. The key form is 16
/// lowercase hex characters of the big-endian value, so keys sort in the
/// same order as the numeric identifiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub u64);

impl UserId {
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Encode to the key form used by the primary table and the name index.
    pub fn encode(self) -> Result<[u8; ID_ENCODED_LEN], IdError> {
        if !self.is_valid() {
            return Err(IdError::Invalid);
        }

        let mut out = [0u8; ID_ENCODED_LEN];
        hex::encode_to_slice(self.0.to_be_bytes(), &mut out)?;
        Ok(out)
    }

    /// Decode from the key form.
    pub fn decode(bytes: &[u8]) -> Result<Self, IdError> {
        if bytes.len() != ID_ENCODED_LEN {
            return Err(IdError::Length {
                expected: ID_ENCODED_LEN,
                got: bytes.len(),
            });
        }

        let mut raw = [0u8; 8];
        hex::decode_to_slice(bytes, &mut raw)?;

        let id = UserId(u64::from_be_bytes(raw));
        if !id.is_valid() {
            return Err(IdError::Invalid);
        }
        Ok(id)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({:016x})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserId::decode(s.as_bytes())
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether a user may sign in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Default for Status {
    fn default() -> Self {
        Status::Active
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => f.write_str("active"),
            Status::Inactive => f.write_str("inactive"),
        }
    }
}

/// A user record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Unique across all users.
    pub name: String,

    /// Identity at the external OAuth provider, if any.
    #[serde(rename = "oauthID", default, skip_serializing_if = "Option::is_none")]
    pub oauth_id: Option<String>,

    #[serde(default)]
    pub status: Status,
}

impl User {
    /// Create an active user.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            oauth_id: None,
            status: Status::Active,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_oauth_id(mut self, oauth_id: impl Into<String>) -> Self {
        self.oauth_id = Some(oauth_id.into());
        self
    }
}

/// Partial update of a user. Unset fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none()
    }
}

/// Pagination for listings.
///
/// A `limit` of zero means "as many as allowed", not "none".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub limit: usize,
    pub offset: usize,
}

impl FindOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Payload encoding of stored records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadEncoding {
    Json,
    MessagePack,
}

impl Default for PayloadEncoding {
    fn default() -> Self {
        PayloadEncoding::Json
    }
}
