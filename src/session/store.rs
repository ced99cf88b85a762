//! Credential persistence
//!
//! A snapshot holds every session key. Each store operation replaces or removes
//! the whole snapshot at once, so a reader never observes a half-cleared session.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::api::User;
use crate::persistence::{self, StoreError};
use crate::session::{CachedVerdict, SessionCredential};

/// Persisted session keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSnapshot {
    #[serde(
        rename = "manager_assistant_token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,

    #[serde(
        rename = "manager_assistant_user",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<User>,

    #[serde(
        rename = "token_validation_cache",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub validation: Option<CachedVerdict>,

    #[serde(
        rename = "fresh_login_until",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fresh_login_until_ms: Option<i64>,
}

impl CredentialSnapshot {
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }

    /// Rebuild a credential; `None` when no token is stored
    pub fn into_credential(self) -> Option<SessionCredential> {
        let raw_token = self.token.filter(|t| !t.is_empty())?;
        Some(SessionCredential {
            raw_token,
            user: self.user,
            cached_verdict: self.validation,
            fresh_login_until_ms: self.fresh_login_until_ms,
        })
    }
}

impl From<&SessionCredential> for CredentialSnapshot {
    fn from(credential: &SessionCredential) -> Self {
        Self {
            token: Some(credential.raw_token.clone()),
            user: credential.user.clone(),
            validation: credential.cached_verdict,
            fresh_login_until_ms: credential.fresh_login_until_ms,
        }
    }
}

/// Key-value persistence for the session credential
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<CredentialSnapshot, StoreError>;

    fn save(&self, snapshot: &CredentialSnapshot) -> Result<(), StoreError>;

    /// Remove every session key
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    snapshot: Mutex<CredentialSnapshot>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: CredentialSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<CredentialSnapshot, StoreError> {
        Ok(persistence::lock(&self.snapshot).clone())
    }

    fn save(&self, snapshot: &CredentialSnapshot) -> Result<(), StoreError> {
        *persistence::lock(&self.snapshot) = snapshot.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *persistence::lock(&self.snapshot) = CredentialSnapshot::default();
        Ok(())
    }
}

/// Snapshot stored as a single JSON file (`session.json`)
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
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<CredentialSnapshot, StoreError> {
        Ok(persistence::read_json(&self.path)?.unwrap_or_default())
    }

    fn save(&self, snapshot: &CredentialSnapshot) -> Result<(), StoreError> {
        persistence::write_json_atomic(&self.path, snapshot)
    }

    fn clear(&self) -> Result<(), StoreError> {
        persistence::remove_file(&self.path)
    }
}
