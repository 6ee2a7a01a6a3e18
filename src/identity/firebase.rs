//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Accounts are created with `accounts:signUp` (followed by `accounts:update` when a display name
//! is given) and signed in with `accounts:signInWithPassword`. Sign-out is local: the provider has
//! no server-side sign-out for password sessions.

use async_trait::async_trait;
use dioxus_logger::tracing;
use reqwest::Response;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::watch;

use crate::{
    error::{identity::IdentityError, Error},
    identity::{IdentityNotifier, IdentityProvider},
    model::identity::Identity,
};

/// Default base URL of the Identity Toolkit REST API.
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdateRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, alias = "profilePicture")]
    photo_url: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl AccountResponse {
    fn into_identity(self) -> Identity {
        Identity {
            uid: self.local_id,
            // Empty strings are how the provider reports "not set".
            display_name: self.display_name.filter(|name| !name.is_empty()),
            email: self.email,
            photo_url: self.photo_url.filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Deserialize)]
struct ProviderError {
    message: String,
}

pub struct FirebaseIdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    notifier: IdentityNotifier,
}

impl FirebaseIdentityClient {
    /// Creates a new instance of FirebaseIdentityClient.
    ///
    /// # Arguments
    /// - `base_url` - Identity Toolkit base URL, usually [`DEFAULT_AUTH_URL`]
    /// - `api_key` - Web API key of the Firebase project
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            notifier: IdentityNotifier::new(),
        }
    }

    /// Publishes an identity restored from elsewhere (e.g. a persisted provider session).
    pub fn restore(&self, identity: Option<Identity>) {
        self.notifier.publish(identity);
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.base_url, method);

        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await.into());
        }

        Ok(response.json::<T>().await?)
    }
}

async fn provider_error(response: Response) -> IdentityError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ProviderErrorBody>(&body) {
        Ok(body) => IdentityError::from_code(&body.error.message),
        Err(_) => IdentityError::Provider(format!("status {}: {}", status.as_u16(), body)),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, Error> {
        let mut account: AccountResponse = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        if let (Some(display_name), Some(id_token)) = (display_name, account.id_token.as_deref()) {
            let updated: AccountResponse = self
                .call(
                    "update",
                    &ProfileUpdateRequest {
                        id_token,
                        display_name,
                        return_secure_token: false,
                    },
                )
                .await?;
            account.display_name = updated.display_name;
        }

        let identity = account.into_identity();
        tracing::info!(uid = %identity.uid, "Created identity provider account");
        self.notifier.publish(Some(identity.clone()));

        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, Error> {
        let account: AccountResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let identity = account.into_identity();
        tracing::info!(uid = %identity.uid, "Signed in with identity provider");
        self.notifier.publish(Some(identity.clone()));

        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), Error> {
        self.notifier.publish(None);

        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.notifier.subscribe()
    }

    fn current(&self) -> Option<Identity> {
        self.notifier.current()
    }
}
