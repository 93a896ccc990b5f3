//! Outbound client for the external user-lookup API.
//!
//! # Responsibilities
//! - Translate the two logical queries into GET requests
//! - Decode JSON responses into typed records
//! - Attach the active trace context to every outbound call
//!
//! # Design Decisions
//! - No retries, no caching; a failed call is a failed call
//! - Argument validation happens before any network I/O
//! - Transport and decode failures are distinct error variants

pub mod types;
pub mod users;

pub use types::{BriefUser, ClientError, ClientResult, UserDetail};
pub use users::UserClient;
