//! Durable single-slot credential storage.
//!
//! The slot holds either a backend-issued bearer token or a locally minted fallback token. The
//! two are kept apart by type so no caller can mistake a fallback token for a real one.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::error::{store::StoreError, Error};

/// Prefix carried by every locally minted fallback token.
pub const FALLBACK_TOKEN_PREFIX: &str = "fallback-";

const FALLBACK_TOKEN_LENGTH: usize = 32;

/// Token held in the credential slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "lowercase")]
pub enum Credential {
    /// Token issued by the backend exchange.
    Bearer(String),
    /// Token minted locally because the backend exchange failed.
    Fallback(String),
}

impl Credential {
    /// Mints a new fallback token.
    ///
    /// The token is `fallback-` followed by 32 random alphanumeric characters.
    pub fn fallback() -> Self {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(FALLBACK_TOKEN_LENGTH)
            .map(char::from)
            .collect();

        Self::Fallback(format!("{}{}", FALLBACK_TOKEN_PREFIX, suffix))
    }

    pub fn token(&self) -> &str {
        match self {
            Self::Bearer(token) | Self::Fallback(token) => token,
        }
    }

    /// Backend-issued token, `None` for a fallback credential.
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Self::Bearer(token) => Some(token),
            Self::Fallback(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Storage for the single credential slot.
pub trait CredentialStore: Send + Sync {
    /// Replaces the stored credential.
    fn set(&self, credential: Credential) -> Result<(), Error>;

    /// Returns the stored credential, if any.
    fn get(&self) -> Result<Option<Credential>, Error>;

    /// Empties the slot. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), Error>;
}

/// In-memory credential slot, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, credential: Credential) -> Result<(), Error> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential);

        Ok(())
    }

    fn get(&self) -> Result<Option<Credential>, Error> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn clear(&self) -> Result<(), Error> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();

        Ok(())
    }
}

/// Credential slot persisted as a JSON document on disk.
///
/// A missing file means an empty slot.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
        .into()
    }
}

impl CredentialStore for FileCredentialStore {
    fn set(&self, credential: Credential) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let document = serde_json::to_vec(&credential)?;
        fs::write(&self.path, document).map_err(|e| self.io_error(e))?;

        Ok(())
    }

    fn get(&self) -> Result<Option<Credential>, Error> {
        let document = match fs::read(&self.path) {
            Ok(document) => document,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let credential = serde_json::from_slice(&document).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(credential))
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
