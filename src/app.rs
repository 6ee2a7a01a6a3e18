use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    gate::ViewGuard,
    identity::IdentityProvider,
    model::{identity::Identity, session::Session},
    service::{bootstrap::SessionBootstrap, users::UserAdminService},
    store::session::{SessionState, SessionStore},
};

/// Application root holding the session store and everything that reads or writes it.
pub struct App {
    pub store: Arc<SessionStore>,
    pub bootstrap: Arc<SessionBootstrap>,
    pub users: UserAdminService,
    pub identity: Option<Arc<dyn IdentityProvider>>,
}

impl App {
    pub fn new(
        store: Arc<SessionStore>,
        bootstrap: Arc<SessionBootstrap>,
        users: UserAdminService,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        Self {
            store,
            bootstrap,
            users,
            identity,
        }
    }

    /// Start the session bootstrap on the configured identity provider.
    ///
    /// Returns `None` when no identity provider is configured; use [`Self::start_with`] to drive
    /// the bootstrap from another source of identity changes.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        let identity = self.identity.as_ref()?;

        Some(self.start_with(identity.subscribe()))
    }

    /// Start the session bootstrap on an arbitrary identity change channel.
    pub fn start_with(&self, changes: watch::Receiver<Option<Identity>>) -> JoinHandle<()> {
        self.bootstrap.clone().listen(changes)
    }

    pub fn session(&self) -> Option<Session> {
        self.store.session()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    /// Screens the current session may view.
    pub fn visible_screens(&self) -> Vec<ViewGuard> {
        let session = self.store.session();

        crate::gate::screens::ALL_SCREENS
            .into_iter()
            .filter(|screen| screen.permits(session.as_ref()))
            .collect()
    }
}
