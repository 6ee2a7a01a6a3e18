use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{
    identity::Identity,
    user::{BackendUser, Role},
};

/// How a session came to be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOrigin {
    /// Backend exchange succeeded and issued the stored bearer token.
    Backend,
    /// Backend exchange failed; the session is built from the identity alone and the stored
    /// credential is a locally minted fallback token.
    Degraded,
}

/// Merged view of the signed-in identity and the backend user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Identity,
    pub backend_user: Option<BackendUser>,
    pub role: Role,
    pub origin: SessionOrigin,
    pub established_at: DateTime<Utc>,
}

impl Session {
    /// Builds a session from a successful backend exchange.
    ///
    /// The role comes from the backend record and defaults to [`Role::User`] when the record
    /// (or its role) is missing.
    pub fn from_exchange(identity: Identity, backend_user: Option<BackendUser>) -> Self {
        let role = backend_user
            .as_ref()
            .and_then(|user| user.role)
            .unwrap_or_default();

        Self {
            identity,
            backend_user,
            role,
            origin: SessionOrigin::Backend,
            established_at: Utc::now(),
        }
    }

    /// Builds a degraded session from the identity alone.
    pub fn degraded(identity: Identity) -> Self {
        Self {
            identity,
            backend_user: None,
            role: Role::User,
            origin: SessionOrigin::Degraded,
            established_at: Utc::now(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.origin == SessionOrigin::Degraded
    }

    /// Merged field view of the session.
    ///
    /// Identity fields are laid down first and backend fields overwrite any field of the same
    /// name. `role` always reflects the derived role.
    pub fn fields(&self) -> Map<String, Value> {
        let mut merged = Map::new();

        merged.insert("uid".to_string(), Value::from(self.identity.uid.clone()));
        merged.insert("email".to_string(), Value::from(self.identity.email.clone()));
        if let Some(display_name) = &self.identity.display_name {
            merged.insert("displayName".to_string(), Value::from(display_name.clone()));
        }
        if let Some(photo_url) = &self.identity.photo_url {
            merged.insert("photoURL".to_string(), Value::from(photo_url.clone()));
        }

        if let Some(user) = &self.backend_user {
            for (key, value) in &user.fields {
                merged.insert(key.clone(), value.clone());
            }
        }

        merged.insert("role".to_string(), Value::from(self.role.as_str()));

        merged
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields().remove(name)
    }

    /// Email of the session, preferring the backend record's value.
    pub fn email(&self) -> String {
        match self.field("email") {
            Some(Value::String(email)) => email,
            _ => self.identity.email.clone(),
        }
    }

    /// Backend-assigned identifier, absent for degraded sessions.
    pub fn backend_id(&self) -> Option<String> {
        self.backend_user.as_ref().and_then(BackendUser::id)
    }
}
