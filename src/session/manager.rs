//! Session lifecycle: login exchange, validity checks, logout

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::api::{ApiError, AuthBackend, User, MANAGER_ASSISTANT_PERMISSIONS};
use crate::config::SessionConfig;
use crate::persistence::{self, StoreError};
use crate::session::cache::{CacheDecision, SessionCache};
use crate::session::{CachedVerdict, Clock, CredentialSnapshot, CredentialStore, SessionCredential};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no authorization code provided")]
    MissingAuthorizationCode,

    #[error("token exchange failed: {0}")]
    TokenExchange(#[source] ApiError),

    #[error("token exchange returned an empty token")]
    EmptyToken,

    #[error("failed to persist session: {0}")]
    Persist(#[from] StoreError),
}

/// Why protected content was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("no valid session")]
    NotLoggedIn,

    #[error("user '{0}' does not have access to the Manager Assistant")]
    MissingPermission(String),
}

/// Outcome of the protected-content guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Valid { user: Option<User> },
    LoggedOut,
}

/// Owns the session credential, its validity cache and persistence
pub struct SessionManager {
    cache: Mutex<SessionCache>,
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    settings: SessionConfig,
}

impl SessionManager {
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
        settings: SessionConfig,
    ) -> Self {
        Self {
            cache: Mutex::new(SessionCache::new()),
            backend,
            store,
            clock,
            settings,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionCache> {
        persistence::lock(&self.cache)
    }

    /// Write the current credential, or clear the store if there is none.
    /// Called with the cache lock held so a concurrent logout cannot be undone.
    fn persist(&self, cache: &SessionCache) -> Result<(), StoreError> {
        match cache.credential() {
            Some(credential) => self.store.save(&CredentialSnapshot::from(credential)),
            None => self.store.clear(),
        }
    }

    /// Reload a persisted credential. Returns true if one was found.
    pub fn restore(&self) -> Result<bool, StoreError> {
        let snapshot = self.store.load()?;
        let mut cache = self.lock();
        match snapshot.into_credential() {
            Some(credential) => {
                tracing::debug!(
                    has_verdict = credential.cached_verdict.is_some(),
                    "restored persisted session"
                );
                cache.install(credential);
                Ok(true)
            }
            None => {
                cache.teardown();
                Ok(false)
            }
        }
    }

    /// Exchange a provider authorization code for a session and start the
    /// fresh-login grace window. Nothing is persisted on failure.
    pub async fn login(&self, authorization_code: &str) -> Result<User, AuthError> {
        let authorization_code = authorization_code.trim();
        if authorization_code.is_empty() {
            return Err(AuthError::MissingAuthorizationCode);
        }

        let response = self
            .backend
            .exchange_token(authorization_code)
            .await
            .map_err(|e| {
                tracing::warn!(
                    endpoint = e.endpoint(),
                    error = %e,
                    retry_after_secs = ?e.retry_after(),
                    "token exchange failed"
                );
                AuthError::TokenExchange(e)
            })?;

        if response.token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let credential = SessionCredential::fresh(
            response.token,
            response.user.clone(),
            self.clock.now_ms(),
            self.settings.fresh_login_grace_ms(),
        );

        let mut cache = self.lock();
        cache.install(credential);
        if let Err(e) = self.persist(&cache) {
            cache.teardown();
            if let Err(clear_err) = self.store.clear() {
                tracing::error!(error = %clear_err, "failed to roll back partial session");
            }
            return Err(AuthError::Persist(e));
        }

        tracing::info!(user = %response.user.email, "login succeeded");
        Ok(response.user)
    }

    /// Drop the credential and every persisted session key
    pub fn logout(&self) -> Result<(), StoreError> {
        let mut cache = self.lock();
        cache.teardown();
        self.store.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Whether the held credential is still usable.
    ///
    /// Answers locally during the grace window or while a cached verdict is
    /// fresh; otherwise asks the backend once. Any backend failure counts as
    /// invalid and clears the cached verdict; a 401 drops the credential too.
    pub async fn is_token_valid(&self) -> bool {
        loop {
            let decision = self.lock().decide(self.clock.now_ms(), &self.settings);
            let (token, epoch) = match decision {
                CacheDecision::NoCredential => {
                    tracing::debug!("no session credential held");
                    return false;
                }
                CacheDecision::GraceWindow => {
                    tracing::debug!("fresh login, skipping validation");
                    return true;
                }
                CacheDecision::Cached(valid) => {
                    tracing::debug!(valid, "using cached token validation result");
                    return valid;
                }
                CacheDecision::Revalidate { token, epoch } => (token, epoch),
            };

            tracing::debug!("token validation cache miss, calling backend");
            let result = self.backend.validate(&token).await;

            let applied = {
                let mut cache = self.lock();
                let applied = match &result {
                    Ok(valid) => cache.record_verdict(epoch, *valid, self.clock.now_ms()),
                    Err(ApiError::Unauthorized { .. }) => cache.revoke(epoch),
                    Err(_) => cache.clear_verdict(epoch),
                };
                if applied {
                    if let Err(e) = self.persist(&cache) {
                        tracing::warn!(error = %e, "failed to persist token validation result");
                    }
                }
                applied
            };

            if !applied {
                // Session was replaced or torn down mid-flight; answer for the current one
                tracing::debug!(epoch, "discarding stale validation result");
                continue;
            }

            return match result {
                Ok(valid) => valid,
                Err(ApiError::Unauthorized { .. }) => {
                    tracing::info!("backend rejected credential, session dropped");
                    false
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        transport = e.is_transport_error(),
                        retry_after_secs = ?e.retry_after(),
                        "token validation failed, treating session as invalid"
                    );
                    false
                }
            };
        }
    }

    /// Guard for protected content: checks validity and fully logs out on failure
    pub async fn ensure_valid(&self) -> SessionStatus {
        if self.is_token_valid().await {
            return SessionStatus::Valid {
                user: self.current_user(),
            };
        }

        if self.is_authenticated() {
            tracing::info!("session is no longer valid, logging out");
        }
        if let Err(e) = self.logout() {
            tracing::error!(error = %e, "failed to clear persisted session");
        }
        SessionStatus::LoggedOut
    }

    /// Guard for the wizard: a valid session whose user holds a
    /// Manager Assistant permission
    pub async fn require_manager(&self) -> Result<User, AccessError> {
        let SessionStatus::Valid { user } = self.ensure_valid().await else {
            return Err(AccessError::NotLoggedIn);
        };
        match user {
            Some(user) if user.has_any_permission(MANAGER_ASSISTANT_PERMISSIONS) => Ok(user),
            Some(user) => {
                tracing::info!(user = %user.email, "access denied, missing permission");
                Err(AccessError::MissingPermission(user.email))
            }
            None => Err(AccessError::MissingPermission("unknown".to_string())),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().credential().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().credential().and_then(|c| c.user.clone())
    }

    pub fn cached_verdict(&self) -> Option<CachedVerdict> {
        self.lock().cached_verdict()
    }

    pub fn settings(&self) -> &SessionConfig {
        &self.settings
    }
}
