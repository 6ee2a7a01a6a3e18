//! HTTP layer shared by every backend call.
//!
//! Authenticated requests all pass through [`ApiClient::send_authorized`], which is the single
//! place that attaches the bearer token and reacts to 401/403 responses by tearing the session
//! down.

use std::sync::Arc;

use dioxus_logger::tracing;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;

use crate::{
    error::{auth::AuthError, Error},
    model::api::ErrorDto,
    store::{credential::Credential, session::SessionStore},
};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client for the backend at `base_url` with default transport settings.
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, store)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<SessionStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            http,
            base_url,
            store,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Sends an unauthenticated JSON `POST`.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Response, Error>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;

        Ok(response)
    }

    /// Sends a request carrying the stored bearer token.
    ///
    /// No request is sent when the slot is empty or holds a fallback token. A 401 or 403
    /// response tears the session down when the rejected token is still the stored one.
    ///
    /// # Arguments
    /// - `request` - Request to send, without an `Authorization` header
    ///
    /// # Returns
    /// - `Ok(Response)` - Any response other than 401/403, for the caller to interpret
    /// - `Err(Error::AuthError(AuthError::MissingCredential))` - No credential stored
    /// - `Err(Error::AuthError(AuthError::DegradedSession))` - Only a fallback credential stored
    /// - `Err(Error::AuthError(AuthError::Unauthorized))` - Backend rejected the credential
    /// - `Err(Error::HttpError)` - Transport failure
    pub async fn send_authorized(&self, request: RequestBuilder) -> Result<Response, Error> {
        let credential = match self.store.credential() {
            Some(credential) => credential,
            None => return Err(AuthError::MissingCredential.into()),
        };

        self.send_with(&credential, request).await
    }

    /// Sends a request carrying `credential` instead of whatever is stored when the request goes
    /// out.
    ///
    /// Used by callers that act on behalf of one specific sign-in. A 401 or 403 response
    /// invalidates `credential` only, so a newer session stored in the meantime is left alone.
    ///
    /// # Returns
    /// Same as [`Self::send_authorized`], except that it never fails with `MissingCredential`.
    pub async fn send_with(
        &self,
        credential: &Credential,
        request: RequestBuilder,
    ) -> Result<Response, Error> {
        let token = match credential {
            Credential::Bearer(token) => token.as_str(),
            Credential::Fallback(_) => return Err(AuthError::DegradedSession.into()),
        };

        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::info!(
                status = status.as_u16(),
                url = %response.url(),
                "Backend rejected the credential, ending session"
            );
            self.store.invalidate(credential);

            return Err(AuthError::Unauthorized(status.as_u16()).into());
        }

        Ok(response)
    }
}

/// Converts an unsuccessful response into [`Error::ApiError`].
///
/// Uses the `error` (or `message`) field of a JSON error body when present and falls back to the
/// raw body text.
pub async fn error_from_response(response: Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorDto>(&body) {
        Ok(error_dto) => error_dto.error,
        Err(_) if body.is_empty() => "Unknown error".to_string(),
        Err(_) => body,
    };

    Error::ApiError { status, message }
}
