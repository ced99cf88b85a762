//! Session credential and its cached validation verdict

use serde::{Deserialize, Serialize};

use crate::api::User;

/// Result of the last remote validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedVerdict {
    pub valid: bool,
    #[serde(rename = "timestamp")]
    pub checked_at_ms: i64,
}

impl CachedVerdict {
    pub fn new(valid: bool, checked_at_ms: i64) -> Self {
        Self {
            valid,
            checked_at_ms,
        }
    }

    /// Fresh while `0 <= age < ttl`. A verdict stamped in the future (clock
    /// moved backwards) is treated as stale.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        let age = now_ms.saturating_sub(self.checked_at_ms);
        (0..ttl_ms).contains(&age)
    }
}

/// Bearer credential held for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    pub raw_token: String,
    pub user: Option<User>,
    pub cached_verdict: Option<CachedVerdict>,
    pub fresh_login_until_ms: Option<i64>,
}

impl SessionCredential {
    /// Credential from a login exchange that just completed
    pub fn fresh(raw_token: impl Into<String>, user: User, now_ms: i64, grace_ms: i64) -> Self {
        Self {
            raw_token: raw_token.into(),
            user: Some(user),
            cached_verdict: None,
            fresh_login_until_ms: Some(now_ms.saturating_add(grace_ms)),
        }
    }

    pub fn in_grace_window(&self, now_ms: i64) -> bool {
        self.fresh_login_until_ms
            .map(|until| now_ms < until)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            name: "Sam Lee".to_string(),
            email: "sam@example.com".to_string(),
            avatar: String::new(),
            role: "manager".to_string(),
            permissions: vec![],
        }
    }

    #[test]
    fn test_verdict_freshness_bounds() {
        let verdict = CachedVerdict::new(true, 1_000);
        assert!(verdict.is_fresh(1_000, 300));
        assert!(verdict.is_fresh(1_299, 300));
        assert!(!verdict.is_fresh(1_300, 300));
        assert!(!verdict.is_fresh(999, 300));
    }

    #[test]
    fn test_zero_ttl_never_fresh() {
        let verdict = CachedVerdict::new(true, 1_000);
        assert!(!verdict.is_fresh(1_000, 0));
    }

    #[test]
    fn test_verdict_serializes_with_timestamp_key() {
        let json = serde_json::to_value(CachedVerdict::new(false, 42)).unwrap();
        assert_eq!(json["timestamp"], 42);
        assert_eq!(json["valid"], false);
    }

    #[test]
    fn test_grace_window() {
        let credential = SessionCredential::fresh("jwt", user(), 0, 10_000);
        assert!(credential.in_grace_window(0));
        assert!(credential.in_grace_window(9_999));
        assert!(!credential.in_grace_window(10_000));

        let restored = SessionCredential {
            fresh_login_until_ms: None,
            ..credential
        };
        assert!(!restored.in_grace_window(0));
    }
}
