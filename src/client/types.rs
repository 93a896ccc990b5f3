//! Client record shapes and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of the brief user listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BriefUser {
    pub id: String,
    pub name: String,
}

/// Full record for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Errors that can occur during outbound calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failed or the server returned a non-success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body does not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Caller supplied an invalid identifier; no network call was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
