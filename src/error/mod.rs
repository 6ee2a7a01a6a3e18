//! Error types for the back-office session client.
//!
//! Each concern (configuration, authorization, token exchange, identity provider, credential
//! storage) has its own error enum, and all of them are aggregated into [`Error`] so the `?`
//! operator can be used across module boundaries. The session bootstrap never lets these escape
//! to its caller; they surface from the lower-level services and from the user administration
//! operations.

pub mod auth;
pub mod config;
pub mod exchange;
pub mod identity;
pub mod store;

use thiserror::Error;

use crate::error::{
    auth::AuthError, config::ConfigError, exchange::ExchangeError, identity::IdentityError,
    store::StoreError,
};

/// Main error type for the back-office session client.
///
/// Aggregates the domain-specific error types and external library errors into a single type.
/// `thiserror`'s `#[from]` attribute provides automatic conversion from the underlying errors.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Authorization errors (missing credential, degraded session, 401/403, insufficient role)
/// - Token exchange errors (rejected or malformed exchange envelope)
/// - Identity provider errors (sign-in/sign-up failures reported by the provider)
/// - Credential store errors (file IO, serialization)
/// - External library errors (HTTP transport, JSON)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authorization error (credential missing, session no longer valid, role too low).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Backend token exchange did not produce a usable token.
    #[error(transparent)]
    ExchangeError(#[from] ExchangeError),
    /// Identity provider rejected a create-account or sign-in request.
    #[error(transparent)]
    IdentityError(#[from] IdentityError),
    /// Credential store could not be read or written.
    #[error(transparent)]
    StoreError(#[from] StoreError),
    /// Backend answered a request with an unexpected status.
    #[error("Request failed with status {status}: {message}")]
    ApiError {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },
    /// HTTP transport error (connection refused, TLS, timeout, body decoding).
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    /// JSON serialization or deserialization error.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` when the error means the held session is no longer valid.
    ///
    /// Only 401/403 responses from authenticated calls qualify. Transport failures and other
    /// statuses are treated as transient.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, Self::AuthError(AuthError::Unauthorized(_)))
    }
}
