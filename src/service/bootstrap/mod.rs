//! Session bootstrap.
//!
//! Runs once for every identity-change notification from the identity provider. A signed-in
//! identity is exchanged for a backend token, the merged session is published, and a privileged
//! session additionally gets the administrative user listing. A signed-out notification clears
//! credential, session and listing.
//!
//! Each run holds a [`RunTicket`] taken when the run starts. A newer run or a teardown makes the
//! ticket stale, and everything a stale run tries to publish afterwards is discarded.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use dioxus_logger::tracing;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    model::{identity::Identity, session::Session, user::Role},
    service::{exchange::TokenExchange, listing::UserDirectory},
    store::{
        credential::Credential,
        session::{RunTicket, SessionStore},
    },
};

/// Defined state a bootstrap run ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Backend exchange succeeded and a session with this role was published.
    Established(Role),
    /// Backend exchange failed and a degraded session was published.
    Degraded,
    /// Credential, session and listing were cleared.
    SignedOut,
    /// A newer run or a teardown started before this run finished; its results were discarded.
    Superseded,
}

pub struct SessionBootstrap {
    store: Arc<SessionStore>,
    exchange: Arc<dyn TokenExchange>,
    directory: Arc<dyn UserDirectory>,
    allow_fallback_session: bool,
}

impl SessionBootstrap {
    /// Creates a new instance of SessionBootstrap.
    ///
    /// Fallback sessions are allowed by default; see [`Self::allow_fallback_session`].
    ///
    /// # Arguments
    /// - `store` - Session store the bootstrap publishes to, the bootstrap is its only writer
    /// - `exchange` - Backend token exchange
    /// - `directory` - Privileged user listing
    pub fn new(
        store: Arc<SessionStore>,
        exchange: Arc<dyn TokenExchange>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            store,
            exchange,
            directory,
            allow_fallback_session: true,
        }
    }

    /// Sets whether a failed exchange publishes a degraded session.
    ///
    /// When disabled, a failed exchange ends the session instead.
    pub fn allow_fallback_session(mut self, allow: bool) -> Self {
        self.allow_fallback_session = allow;
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Handles one identity-change notification.
    ///
    /// # Arguments
    /// - `identity` - Signed-in identity, or `None` for sign-out / no prior session
    ///
    /// # Returns
    /// The state the run ended in. The bootstrap never fails: exchange failures end in a
    /// degraded (or signed-out) session and listing failures in an empty listing.
    pub async fn handle(&self, identity: Option<Identity>) -> BootstrapOutcome {
        match identity {
            Some(identity) => {
                let ticket = self.store.begin_run();
                self.sign_in(ticket, identity).await
            }
            None => self.sign_out(),
        }
    }

    /// Spawns a listener that handles every identity change from `changes`.
    ///
    /// The current value of the receiver is handled first. Each signed-in notification is handled
    /// on its own task so a newer notification is never queued behind an in-flight run; the
    /// ticket is taken before the task is spawned so runs are ordered by notification order.
    /// The listener ends when the sending side is dropped.
    pub fn listen(self: Arc<Self>, mut changes: watch::Receiver<Option<Identity>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let identity = changes.borrow_and_update().clone();

                match identity {
                    Some(identity) => {
                        let ticket = self.store.begin_run();
                        let bootstrap = self.clone();

                        tokio::spawn(async move {
                            bootstrap.sign_in(ticket, identity).await;
                        });
                    }
                    None => {
                        self.sign_out();
                    }
                }

                if changes.changed().await.is_err() {
                    tracing::debug!("Identity provider closed, stopping session bootstrap");
                    break;
                }
            }
        })
    }

    async fn sign_in(&self, ticket: RunTicket, identity: Identity) -> BootstrapOutcome {
        let (credential, session) = match self.exchange.exchange(&identity.email).await {
            Ok(data) => (
                Credential::Bearer(data.token),
                Session::from_exchange(identity, data.user),
            ),
            Err(err) if self.allow_fallback_session => {
                tracing::warn!(
                    email = %identity.email,
                    "Backend token exchange failed, publishing DEGRADED session with a fallback token: {}",
                    err
                );

                (Credential::fallback(), Session::degraded(identity))
            }
            Err(err) => {
                tracing::error!(
                    email = %identity.email,
                    "Backend token exchange failed, ending session: {}",
                    err
                );

                if !self.store.is_current(ticket) {
                    return BootstrapOutcome::Superseded;
                }
                return self.sign_out();
            }
        };

        let role = session.role;
        let outcome = if session.is_degraded() {
            BootstrapOutcome::Degraded
        } else {
            BootstrapOutcome::Established(role)
        };

        // The listing is fetched with this run's token even if a newer run has stored another.
        let run_credential = credential.clone();

        match self.store.publish_session(ticket, credential, session) {
            Ok(true) => {
                tracing::info!(role = %role, "Session published");
            }
            Ok(false) => {
                tracing::debug!("Discarding superseded session bootstrap run");
                return BootstrapOutcome::Superseded;
            }
            Err(err) => {
                tracing::error!("Failed to store session credential, ending session: {}", err);
                return self.sign_out();
            }
        }

        if !role.is_privileged() {
            return outcome;
        }

        let users = self.directory.list_users(&run_credential).await;

        if self.store.publish_users(ticket, users) {
            outcome
        } else if self.store.session().is_none() {
            BootstrapOutcome::SignedOut
        } else {
            BootstrapOutcome::Superseded
        }
    }

    fn sign_out(&self) -> BootstrapOutcome {
        self.store.teardown();
        tracing::info!("Session ended");

        BootstrapOutcome::SignedOut
    }
}
