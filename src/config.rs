use std::path::PathBuf;

use dioxus_logger::tracing::Level;

use crate::{error::config::ConfigError, identity::firebase::DEFAULT_AUTH_URL};

pub static DEFAULT_EXCHANGE_PATH: &str = "/jwt";
pub static DEFAULT_USERS_PATH: &str = "/users";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub exchange_path: String,
    pub users_path: String,
    /// File backing the credential store; `None` keeps the credential in memory.
    pub credential_path: Option<PathBuf>,
    pub allow_fallback_session: bool,
    pub log_level: Level,
    /// Identity provider settings; `None` when no API key is configured.
    pub firebase: Option<FirebaseConfig>,
}

impl Config {
    /// Reads the configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a variable if set.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let api_url = get("BACKOFFICE_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("BACKOFFICE_API_URL".to_string()))?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvValue {
                var: "BACKOFFICE_API_URL".to_string(),
                reason: "must be an http:// or https:// URL".to_string(),
            });
        }

        let allow_fallback_session = match get("BACKOFFICE_ALLOW_FALLBACK_SESSION") {
            None => true,
            Some(value) => parse_bool("BACKOFFICE_ALLOW_FALLBACK_SESSION", &value)?,
        };

        let log_level = match get("BACKOFFICE_LOG_LEVEL") {
            None => Level::INFO,
            Some(value) => {
                value
                    .trim()
                    .parse::<Level>()
                    .map_err(|e| ConfigError::InvalidEnvValue {
                        var: "BACKOFFICE_LOG_LEVEL".to_string(),
                        reason: e.to_string(),
                    })?
            }
        };

        let firebase = get("FIREBASE_API_KEY").map(|api_key| FirebaseConfig {
            api_key,
            auth_url: get("FIREBASE_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
        });

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            exchange_path: get("BACKOFFICE_EXCHANGE_PATH")
                .unwrap_or_else(|| DEFAULT_EXCHANGE_PATH.to_string()),
            users_path: get("BACKOFFICE_USERS_PATH")
                .unwrap_or_else(|| DEFAULT_USERS_PATH.to_string()),
            credential_path: get("BACKOFFICE_CREDENTIAL_PATH").map(PathBuf::from),
            allow_fallback_session,
            log_level,
            firebase,
        })
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!("expected true or false, got {:?}", value),
        }),
    }
}
