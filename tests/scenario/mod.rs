//! End-to-end session scenarios.
//!
//! Each test wires the real stores, services and bootstrap through `startup::build_app` against a
//! mockito backend, then drives identity changes the way the identity provider would.

mod admin_sign_in;
mod exchange_failure;
mod listing_forbidden;
mod user_admin;

use std::collections::HashMap;

use backoffice::{config::Config, model::identity::Identity, startup, App};

/// Build the application against the mock backend at `url`.
pub fn app(url: &str, extra: &[(&str, &str)]) -> App {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("BACKOFFICE_API_URL".to_string(), url.to_string());
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }

    let config = Config::from_lookup(|var| vars.get(var).cloned()).unwrap();
    startup::build_app(&config)
}

pub fn identity(email: &str) -> Identity {
    Identity::new(format!("uid-{}", email), email).with_display_name("Ada Lovelace")
}
