//! Auth backend contract and HTTP client
//!
//! The backend exposes two endpoints used here:
//! - `POST /auth/verify` exchanges a provider authorization code for a session token
//! - `GET /auth/validate` reports whether a bearer token is still valid

mod client;
pub mod error;

pub use client::BackendClient;
pub use error::ApiError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Permissions that grant access to the Manager Assistant app
pub const MANAGER_ASSISTANT_PERMISSIONS: &[&str] = &["manager", "admin"];

/// Authenticated user profile returned by the token exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl User {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }
}

/// Successful token exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Remote authority for session credentials
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange a provider-issued authorization code for a session token
    async fn exchange_token(&self, authorization_code: &str) -> Result<LoginResponse, ApiError>;

    /// Ask the backend whether `token` is still valid
    async fn validate(&self, token: &str) -> Result<bool, ApiError>;
}
