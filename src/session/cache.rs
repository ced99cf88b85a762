//! Token validity cache policy
//!
//! Decides, without I/O, whether a validity question can be answered locally
//! or needs a remote check. Every login and logout bumps the epoch so a remote
//! result that lands after the session changed is dropped instead of applied.

use crate::config::SessionConfig;
use crate::session::{CachedVerdict, SessionCredential};

/// What `is_token_valid` should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    /// No credential held: invalid, no network
    NoCredential,
    /// Inside the post-login grace window: valid, no network
    GraceWindow,
    /// Cached verdict still fresh
    Cached(bool),
    /// Ask the backend; report the result against `epoch`
    Revalidate { token: String, epoch: u64 },
}

#[derive(Debug, Default)]
pub struct SessionCache {
    credential: Option<SessionCredential>,
    epoch: u64,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credential(&self) -> Option<&SessionCredential> {
        self.credential.as_ref()
    }

    pub fn cached_verdict(&self) -> Option<CachedVerdict> {
        self.credential.as_ref().and_then(|c| c.cached_verdict)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn decide(&self, now_ms: i64, settings: &SessionConfig) -> CacheDecision {
        let Some(credential) = &self.credential else {
            return CacheDecision::NoCredential;
        };

        if credential.in_grace_window(now_ms) {
            return CacheDecision::GraceWindow;
        }

        if let Some(verdict) = credential.cached_verdict {
            if verdict.is_fresh(now_ms, settings.cache_ttl_ms()) {
                return CacheDecision::Cached(verdict.valid);
            }
        }

        CacheDecision::Revalidate {
            token: credential.raw_token.clone(),
            epoch: self.epoch,
        }
    }

    /// Replace the held credential, starting a new epoch
    pub fn install(&mut self, credential: SessionCredential) {
        self.credential = Some(credential);
        self.epoch += 1;
    }

    /// Drop the credential and its verdict, starting a new epoch
    pub fn teardown(&mut self) {
        self.credential = None;
        self.epoch += 1;
    }

    /// Store a remote verdict. Returns false, leaving state untouched, when
    /// the session changed since `epoch` was handed out.
    pub fn record_verdict(&mut self, epoch: u64, valid: bool, checked_at_ms: i64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match self.credential.as_mut() {
            Some(credential) => {
                credential.cached_verdict = Some(CachedVerdict::new(valid, checked_at_ms));
                true
            }
            None => false,
        }
    }

    /// Drop the credential after the backend rejected it outright. Same epoch
    /// rule as [`record_verdict`](Self::record_verdict).
    pub fn revoke(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || self.credential.is_none() {
            return false;
        }
        self.teardown();
        true
    }

    /// Clear the verdict after a failed remote check. Same epoch rule as
    /// [`record_verdict`](Self::record_verdict).
    pub fn clear_verdict(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match self.credential.as_mut() {
            Some(credential) => {
                credential.cached_verdict = None;
                true
            }
            None => false,
        }
    }
}
