//! Error types for the user store.

use crate::kv::KvError;
use crate::types::UserId;
use std::fmt;
use thiserror::Error;

/// Failure to turn a [`UserId`](crate::types::UserId) into its binary key
/// form, or to read one back.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum IdError {
    #[error("identifier is invalid")]
    Invalid,

    #[error("identifier must be {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },

    #[error("identifier is not hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    UserNotFound,

    #[error("user name {0:?} is not unique")]
    NameNotUnique(String),

    #[error("user {0} already exists")]
    UserExists(UserId),

    #[error("invalid user id: {0}")]
    InvalidUserId(#[source] IdError),

    #[error("corrupt user id in name index: {0}")]
    CorruptId(#[source] IdError),

    #[error("corrupt user record: {0}")]
    CorruptUser(String),

    #[error("unprocessable user record: {0}")]
    UnprocessableUser(String),

    #[error("internal service error: {0}")]
    Internal(#[from] KvError),
}

impl StoreError {
    /// Classify a collaborator failure that has no more specific meaning.
    pub fn internal(err: KvError) -> Self {
        StoreError::Internal(err)
    }

    /// Classify the failure of a point lookup: a missing key means the user
    /// does not exist, anything else is internal.
    pub fn from_lookup(err: KvError) -> Self {
        if err.is_not_found() {
            StoreError::UserNotFound
        } else {
            StoreError::Internal(err)
        }
    }

    /// Coarse error code for outer API layers.
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::UserNotFound => ErrorCode::NotFound,
            StoreError::NameNotUnique(_) | StoreError::UserExists(_) => ErrorCode::Conflict,
            StoreError::InvalidUserId(_) => ErrorCode::Invalid,
            StoreError::UnprocessableUser(_) => ErrorCode::Unprocessable,
            StoreError::CorruptId(_) | StoreError::CorruptUser(_) | StoreError::Internal(_) => {
                ErrorCode::Internal
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::UserNotFound)
    }
}

impl From<rmp_serde::encode::Error> for StoreError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        StoreError::UnprocessableUser(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for StoreError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        StoreError::CorruptUser(e.to_string())
    }
}

/// Error codes shared with the HTTP layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    Conflict,
    Invalid,
    Unprocessable,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::Invalid => "invalid",
            ErrorCode::Unprocessable => "unprocessable entity",
            ErrorCode::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
