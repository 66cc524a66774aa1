//! Error types for the PetFriends API client.
//!
//! # Design
//! `Forbidden` gets a dedicated variant because the service answers 403 for
//! both bad credentials and a missing or unknown `auth_key`, and callers
//! usually want to tell "not logged in" apart from other failures. Every
//! other unexpected status lands in `HttpError` with the raw body.

use thiserror::Error;

/// Errors returned by `PetFriendsClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 403: bad credentials or auth key.
    #[error("forbidden: {body}")]
    Forbidden { body: String },

    /// The server returned a status other than the expected one.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}
