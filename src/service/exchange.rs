//! Backend token exchange.
//!
//! Converts a verified identity's email into a backend-issued session token and the backend user
//! record. The request is unauthenticated and does not pass through the 401/403 interceptor.

use async_trait::async_trait;
use dioxus_logger::tracing;

use crate::{
    error::{exchange::ExchangeError, Error},
    http::{error_from_response, ApiClient},
    model::api::{ApiEnvelope, ExchangeData, ExchangeRequest},
};

/// Source of backend session tokens.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchanges `email` for a backend token and user record.
    async fn exchange(&self, email: &str) -> Result<ExchangeData, Error>;
}

/// Token exchange against the backend's exchange endpoint.
pub struct ExchangeService {
    client: ApiClient,
    path: String,
}

impl ExchangeService {
    /// Creates a new instance of ExchangeService.
    ///
    /// # Arguments
    /// - `client` - HTTP client for the backend
    /// - `path` - Path of the exchange endpoint relative to the backend base URL
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }
}

#[async_trait]
impl TokenExchange for ExchangeService {
    /// Posts `{email}` to the exchange endpoint and unwraps the response envelope.
    ///
    /// # Returns
    /// - `Ok(ExchangeData)` - Envelope with `success: true` and `data.token`
    /// - `Err(Error::ExchangeError(ExchangeError::Status))` - Non-success HTTP status
    /// - `Err(Error::ExchangeError(ExchangeError::Rejected))` - Envelope with `success: false`
    /// - `Err(Error::ExchangeError(ExchangeError::MissingData))` - Envelope without `data`
    /// - `Err(Error::ExchangeError(ExchangeError::Malformed))` - Body is not an exchange envelope
    /// - `Err(Error::HttpError)` - Transport failure
    async fn exchange(&self, email: &str) -> Result<ExchangeData, Error> {
        tracing::debug!(email = %email, "Requesting backend session token");

        let response = self
            .client
            .post_json(&self.path, &ExchangeRequest { email })
            .await?;

        if !response.status().is_success() {
            return match error_from_response(response).await {
                Error::ApiError { status, message } => {
                    Err(ExchangeError::Status { status, message }.into())
                }
                err => Err(err),
            };
        }

        let body = response.bytes().await?;
        let envelope: ApiEnvelope<ExchangeData> =
            serde_json::from_slice(&body).map_err(ExchangeError::Malformed)?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "no message provided".to_string());
            return Err(ExchangeError::Rejected(message).into());
        }

        envelope
            .data
            .ok_or_else(|| ExchangeError::MissingData.into())
    }
}
