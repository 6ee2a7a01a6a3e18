//! Injected session store.
//!
//! Holds the published [`SessionState`] behind a `tokio::sync::watch` channel so every consumer
//! is a registered observer, and owns the credential store so credential writes and session
//! publication happen in the same critical section.
//!
//! Writers must hold a current [`RunTicket`]. Each bootstrap run takes a ticket when it starts;
//! starting a new run or tearing the session down makes every older ticket stale, and writes
//! with a stale ticket are discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dioxus_logger::tracing;
use tokio::sync::watch;

use crate::{
    error::Error,
    model::{session::Session, user::BackendUser},
    store::credential::{Credential, CredentialStore},
};

/// Snapshot of the state observers see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Published session, `None` when signed out.
    pub session: Option<Session>,
    /// Administrative user listing, only populated for privileged sessions.
    pub users: Vec<BackendUser>,
}

/// Generation number taken by a bootstrap run when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

pub struct SessionStore {
    credentials: Arc<dyn CredentialStore>,
    generation: Mutex<u64>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Creates an empty store backed by the given credential slot.
    ///
    /// A credential left in the slot by a previous process is kept until the first bootstrap run
    /// replaces or clears it.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());

        Self {
            credentials,
            generation: Mutex::new(0),
            state,
        }
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot of the published state.
    pub fn get(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn users(&self) -> Vec<BackendUser> {
        self.state.borrow().users.clone()
    }

    /// Registers a new observer of the published state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Reads the credential slot.
    ///
    /// A slot that cannot be read is reported as empty so callers skip authenticated requests.
    pub fn credential(&self) -> Option<Credential> {
        match self.credentials.get() {
            Ok(credential) => credential,
            Err(err) => {
                tracing::error!("Failed to read stored credential: {}", err);
                None
            }
        }
    }

    /// Starts a new run, making every previously issued ticket stale.
    pub fn begin_run(&self) -> RunTicket {
        let mut generation = self.lock_generation();
        *generation += 1;

        RunTicket(*generation)
    }

    pub fn is_current(&self, ticket: RunTicket) -> bool {
        *self.lock_generation() == ticket.0
    }

    /// Replaces the published state if `ticket` is still current.
    ///
    /// # Returns
    /// - `true` - State was published
    /// - `false` - Ticket is stale, nothing was written
    pub fn set(&self, ticket: RunTicket, state: SessionState) -> bool {
        let generation = self.lock_generation();
        if *generation != ticket.0 {
            return false;
        }

        self.state.send_replace(state);

        true
    }

    /// Writes the credential and publishes the session with an empty listing, if `ticket` is
    /// still current.
    ///
    /// # Returns
    /// - `Ok(true)` - Credential stored and session published
    /// - `Ok(false)` - Ticket is stale, nothing was written
    /// - `Err(Error::StoreError)` - Credential could not be stored, session was not published
    pub fn publish_session(
        &self,
        ticket: RunTicket,
        credential: Credential,
        session: Session,
    ) -> Result<bool, Error> {
        let generation = self.lock_generation();
        if *generation != ticket.0 {
            return Ok(false);
        }

        self.credentials.set(credential)?;
        self.state.send_replace(SessionState {
            session: Some(session),
            users: Vec::new(),
        });

        Ok(true)
    }

    /// Publishes the user listing if `ticket` is still current and a session is published.
    pub fn publish_users(&self, ticket: RunTicket, users: Vec<BackendUser>) -> bool {
        let generation = self.lock_generation();
        if *generation != ticket.0 {
            return false;
        }

        self.state.send_if_modified(|state| {
            if state.session.is_none() {
                return false;
            }
            state.users = users;
            true
        })
    }

    /// Ticket of the run whose session is currently published.
    ///
    /// Taken before an administrative request so its result can be applied to the same session
    /// only.
    pub fn current_run(&self) -> RunTicket {
        RunTicket(*self.lock_generation())
    }

    /// Edits the published listing in place if `ticket` is still current and a session is
    /// published.
    ///
    /// Used after a successful administrative change so observers see the result without a
    /// second listing fetch. Does not affect the run generation.
    ///
    /// # Returns
    /// - `true` - Listing was edited
    /// - `false` - Ticket is stale or no session is published, nothing changed
    pub fn modify_users<F>(&self, ticket: RunTicket, modify: F) -> bool
    where
        F: FnOnce(&mut Vec<BackendUser>),
    {
        let generation = self.lock_generation();
        if *generation != ticket.0 {
            return false;
        }

        self.state.send_if_modified(|state| {
            if state.session.is_none() {
                return false;
            }
            modify(&mut state.users);
            true
        })
    }

    /// Clears credential, session and listing, and makes every outstanding ticket stale.
    pub fn teardown(&self) {
        let mut generation = self.lock_generation();
        *generation += 1;

        self.clear_locked();
    }

    /// Tears the session down if `credential` is still the stored credential.
    ///
    /// Called when the backend rejects `credential`. A rejection of a credential that has
    /// already been replaced by a newer sign-in leaves the newer session alone.
    ///
    /// # Returns
    /// - `true` - Session was torn down
    /// - `false` - Stored credential differs, nothing changed
    pub fn invalidate(&self, credential: &Credential) -> bool {
        let mut generation = self.lock_generation();

        if self.credential().as_ref() != Some(credential) {
            tracing::debug!("Ignoring rejection of a credential that is no longer stored");
            return false;
        }

        *generation += 1;
        self.clear_locked();

        true
    }

    fn clear_locked(&self) {
        if let Err(err) = self.credentials.clear() {
            tracing::error!("Failed to clear stored credential: {}", err);
        }

        self.state.send_replace(SessionState::default());
    }
}
