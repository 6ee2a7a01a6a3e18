
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    error::{exchange::ExchangeError, Error},
    model::{
        api::ExchangeData,
        identity::Identity,
        user::{BackendUser, Role},
    },
    service::{bootstrap::SessionBootstrap, exchange::TokenExchange, listing::UserDirectory},
    store::{
        credential::{Credential, MemoryCredentialStore},
        session::SessionStore,
    },
};

pub(super) fn identity(email: &str) -> Identity {
    Identity::new(format!("uid-{}", email), email).with_display_name("Test User")
}

pub(super) fn backend_user(id: &str, role: Option<Role>) -> BackendUser {
    let mut value = serde_json::json!({ "_id": id, "name": "Backend Name" });
    if let Some(role) = role {
        value["role"] = serde_json::json!(role.as_str());
    }
    serde_json::from_value(value).unwrap()
}

/// Handle for a paused exchange: resolves `started` when the exchange begins and waits for
/// `release` before answering.
pub(super) struct Gate {
    pub started: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

struct PendingGate {
    started: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Token exchange answering from a fixed table of emails.
#[derive(Default)]
pub(super) struct StubExchange {
    accounts: HashMap<String, ExchangeData>,
    gates: Mutex<HashMap<String, PendingGate>>,
    calls: AtomicUsize,
}

impl StubExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, token: &str, user: Option<BackendUser>) -> Self {
        self.accounts.insert(
            email.to_string(),
            ExchangeData {
                token: token.to_string(),
                user,
            },
        );
        self
    }

    /// Pauses the next exchange for `email` until the returned gate is released.
    pub fn gate(&self, email: &str) -> Gate {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();

        self.gates.lock().unwrap().insert(
            email.to_string(),
            PendingGate {
                started: started_tx,
                release: release_rx,
            },
        );

        Gate {
            started: started_rx,
            release: release_tx,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for StubExchange {
    async fn exchange(&self, email: &str) -> Result<ExchangeData, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().remove(email);
        if let Some(gate) = gate {
            let _ = gate.started.send(());
            let _ = gate.release.await;
        }

        match self.accounts.get(email) {
            Some(data) => Ok(data.clone()),
            None => Err(ExchangeError::Status {
                status: 503,
                message: "backend unreachable".to_string(),
            }
            .into()),
        }
    }
}

/// User directory recording the credential passed to each call.
pub(super) struct StubDirectory {
    store: Arc<SessionStore>,
    users: Vec<BackendUser>,
    reject: bool,
    seen: Mutex<Vec<Credential>>,
}

impl StubDirectory {
    pub fn new(store: Arc<SessionStore>, users: Vec<BackendUser>) -> Self {
        Self {
            store,
            users,
            reject: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like a 403 from the backend: ends the session and yields nothing.
    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn calls(&self) -> Vec<Credential> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for StubDirectory {
    async fn list_users(&self, credential: &Credential) -> Vec<BackendUser> {
        self.seen.lock().unwrap().push(credential.clone());

        if self.reject {
            self.store.invalidate(credential);
            return Vec::new();
        }

        self.users.clone()
    }
}

pub(super) struct Harness {
    pub bootstrap: Arc<SessionBootstrap>,
    pub exchange: Arc<StubExchange>,
    pub directory: Arc<StubDirectory>,
    pub store: Arc<SessionStore>,
}

pub(super) fn harness(exchange: StubExchange) -> Harness {
    harness_with(exchange, |store| {
        StubDirectory::new(
            store,
            vec![
                backend_user("listed-1", Some(Role::Seller)),
                backend_user("listed-2", None),
            ],
        )
    })
}

pub(super) fn harness_with<F>(exchange: StubExchange, directory: F) -> Harness
where
    F: FnOnce(Arc<SessionStore>) -> StubDirectory,
{
    let store = Arc::new(SessionStore::new(Arc::new(MemoryCredentialStore::new())));
    let exchange = Arc::new(exchange);
    let directory = Arc::new(directory(store.clone()));
    let bootstrap = Arc::new(SessionBootstrap::new(
        store.clone(),
        exchange.clone(),
        directory.clone(),
    ));

    Harness {
        bootstrap,
        exchange,
        directory,
        store,
    }
}
