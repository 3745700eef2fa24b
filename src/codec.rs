//! User record serialization.

use crate::error::{Result, StoreError};
use crate::types::{PayloadEncoding, User};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a user for the primary table.
///
/// Fails with [`StoreError::UnprocessableUser`].
pub fn encode_user(encoding: PayloadEncoding, user: &User) -> Result<Vec<u8>> {
    to_payload(encoding, user)
}

/// Deserialize a user read from the primary table.
///
/// Fails with [`StoreError::CorruptUser`].
pub fn decode_user(encoding: PayloadEncoding, bytes: &[u8]) -> Result<User> {
    from_payload(encoding, bytes)
}

fn to_payload<T: Serialize + ?Sized>(encoding: PayloadEncoding, value: &T) -> Result<Vec<u8>> {
    match encoding {
        PayloadEncoding::Json => {
            serde_json::to_vec(value).map_err(|e| StoreError::UnprocessableUser(e.to_string()))
        }
        // Named fields so that optional fields may be skipped.
        PayloadEncoding::MessagePack => Ok(rmp_serde::to_vec_named(value)?),
    }
}

fn from_payload<T: DeserializeOwned>(encoding: PayloadEncoding, bytes: &[u8]) -> Result<T> {
    match encoding {
        PayloadEncoding::Json => {
            serde_json::from_slice(bytes).map_err(|e| StoreError::CorruptUser(e.to_string()))
        }
        PayloadEncoding::MessagePack => Ok(rmp_serde::from_slice(bytes)?),
    }
}
