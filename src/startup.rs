use std::sync::Arc;

use dioxus_logger::tracing;

use crate::{
    app::App,
    config::Config,
    http::ApiClient,
    identity::{FirebaseIdentityClient, IdentityProvider},
    service::{
        bootstrap::SessionBootstrap, exchange::ExchangeService, listing::ListingService,
        users::UserAdminService,
    },
    store::{
        credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore},
        session::SessionStore,
    },
};

/// Install the global log subscriber at the configured level
pub fn init_logging(config: &Config) {
    if let Err(e) = dioxus_logger::init(config.log_level) {
        // A subscriber installed earlier (e.g. by a host application) stays in place.
        tracing::debug!("Log subscriber already installed: {}", e);
    }
}

/// Build the credential store, file-backed when a path is configured
pub fn build_credential_store(config: &Config) -> Arc<dyn CredentialStore> {
    match &config.credential_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using file credential store");
            Arc::new(FileCredentialStore::new(path.clone()))
        }
        None => Arc::new(MemoryCredentialStore::new()),
    }
}

/// Build the identity provider client if an API key is configured
pub fn build_identity_provider(config: &Config) -> Option<Arc<dyn IdentityProvider>> {
    let firebase = config.firebase.as_ref()?;

    Some(Arc::new(FirebaseIdentityClient::new(
        &firebase.auth_url,
        &firebase.api_key,
    )))
}

/// Wire the session store, backend services and bootstrap together
pub fn build_app(config: &Config) -> App {
    let store = Arc::new(SessionStore::new(build_credential_store(config)));
    let client = ApiClient::new(&config.api_url, store.clone());

    let exchange = Arc::new(ExchangeService::new(client.clone(), &config.exchange_path));
    let directory = Arc::new(ListingService::new(client.clone(), &config.users_path));
    let bootstrap = SessionBootstrap::new(store.clone(), exchange, directory)
        .allow_fallback_session(config.allow_fallback_session);
    let users = UserAdminService::new(client, &config.users_path);

    App::new(
        store,
        Arc::new(bootstrap),
        users,
        build_identity_provider(config),
    )
}
