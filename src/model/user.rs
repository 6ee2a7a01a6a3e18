use std::{fmt, str::FromStr};

use dioxus_logger::tracing;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Role assigned to a back-office user by the backend.
///
/// Unrecognized role strings deserialize as [`Role::User`], the least privileged role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Seller,
    Moderator,
    Admin,
}

impl Role {
    /// Roles allowed to fetch the administrative user listing.
    pub const PRIVILEGED: [Role; 2] = [Role::Admin, Role::Moderator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    pub fn is_privileged(&self) -> bool {
        Self::PRIVILEGED.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "seller" => Ok(Self::Seller),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role {:?}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        Ok(raw.parse().unwrap_or_else(|_| {
            tracing::warn!(role = %raw, "Unrecognized role from backend, treating as user");
            Role::User
        }))
    }
}

/// User record as returned by the backend.
///
/// Only `role` is interpreted; every other field (including the backend `_id`) is kept verbatim
/// so it can take part in the session merge and be shown by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl BackendUser {
    /// Backend-assigned identifier, read from `_id` or `id`.
    pub fn id(&self) -> Option<String> {
        ["_id", "id"]
            .iter()
            .find_map(|key| match self.fields.get(*key) {
                Some(Value::String(id)) => Some(id.clone()),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            })
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
