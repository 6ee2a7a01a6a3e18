//! Identity provider client.
//!
//! The identity provider issues identities (create account, sign in, sign out) and notifies
//! subscribers every time the current identity changes. The session bootstrap only consumes the
//! notifications; it never calls the provider itself.

pub mod firebase;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{error::Error, model::identity::Identity};

pub use firebase::FirebaseIdentityClient;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and signs it in.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, Error>;

    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, Error>;

    /// Signs the current identity out.
    async fn sign_out(&self) -> Result<(), Error>;

    /// Receiver of identity changes, starting from the current identity.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;

    fn current(&self) -> Option<Identity> {
        self.subscribe().borrow().clone()
    }
}

/// Publishes identity changes to subscribers.
#[derive(Debug)]
pub struct IdentityNotifier {
    sender: watch::Sender<Option<Identity>>,
}

impl IdentityNotifier {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);

        Self { sender }
    }

    /// Publishes `identity` as the current identity.
    ///
    /// Subscribers are notified on every publish, including a repeat of the same identity, so
    /// that a fresh sign-in always triggers a new bootstrap run.
    pub fn publish(&self, identity: Option<Identity>) {
        self.sender.send_replace(identity);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Option<Identity> {
        self.sender.borrow().clone()
    }
}

impl Default for IdentityNotifier {
    fn default() -> Self {
        Self::new()
    }
}
