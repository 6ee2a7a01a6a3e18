//! Privileged user listing.
//!
//! Fetches the full administrative user listing with the bearer token of the requesting sign-in
//! and normalizes the two response shapes the backend uses into one ordered sequence. Callers must
//! confirm a privileged role first; the backend enforces the role itself.

use async_trait::async_trait;
use dioxus_logger::tracing;
use reqwest::Method;
use serde_json::Value;

use crate::{
    error::Error,
    http::{error_from_response, ApiClient},
    model::user::BackendUser,
    store::credential::Credential,
};

/// Source of the administrative user listing.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches the listing with `credential`, yielding an empty sequence on any failure.
    async fn list_users(&self, credential: &Credential) -> Vec<BackendUser>;
}

pub struct ListingService {
    client: ApiClient,
    path: String,
}

impl ListingService {
    /// Creates a new instance of ListingService.
    ///
    /// # Arguments
    /// - `client` - HTTP client for the backend
    /// - `path` - Path of the user listing endpoint relative to the backend base URL
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    /// Fetches the listing with `credential` and reports failures to the caller.
    ///
    /// A 401/403 response has already ended the session by the time this returns, unless
    /// `credential` was no longer the stored one.
    ///
    /// # Returns
    /// - `Ok(Vec<BackendUser>)` - Normalized listing, empty for unrecognized bodies
    /// - `Err(Error::AuthError)` - Fallback credential, or the backend rejected it
    /// - `Err(Error::ApiError)` - Any other non-success status
    /// - `Err(Error::HttpError)` - Transport failure
    pub async fn try_list_users(&self, credential: &Credential) -> Result<Vec<BackendUser>, Error> {
        let request = self.client.request(Method::GET, &self.path);
        let response = self.client.send_with(credential, request).await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.bytes().await?;

        Ok(normalize_listing(&body))
    }
}

#[async_trait]
impl UserDirectory for ListingService {
    async fn list_users(&self, credential: &Credential) -> Vec<BackendUser> {
        match self.try_list_users(credential).await {
            Ok(users) => users,
            Err(err) => {
                tracing::error!("Failed to fetch user listing: {}", err);
                Vec::new()
            }
        }
    }
}

/// Normalizes a listing response body.
///
/// Accepts an envelope `{success: true, data: [...]}` or `{success: true, users: [...]}`, or a
/// bare array of user records. Everything else, including malformed JSON and arrays containing
/// non-record items, yields an empty sequence.
pub fn normalize_listing(body: &[u8]) -> Vec<BackendUser> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("User listing response is not valid JSON: {}", err);
            return Vec::new();
        }
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut envelope) => {
            if envelope.get("success").and_then(Value::as_bool) != Some(true) {
                tracing::warn!("User listing envelope does not report success");
                return Vec::new();
            }

            let items = ["data", "users"]
                .iter()
                .find_map(|key| match envelope.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                });

            match items {
                Some(items) => items,
                None => {
                    tracing::warn!("User listing envelope carries no user array");
                    return Vec::new();
                }
            }
        }
        _ => {
            tracing::warn!("Unrecognized user listing response shape");
            return Vec::new();
        }
    };

    match serde_json::from_value(Value::Array(items)) {
        Ok(users) => users,
        Err(err) => {
            tracing::warn!("User listing contains invalid records: {}", err);
            Vec::new()
        }
    }
}
