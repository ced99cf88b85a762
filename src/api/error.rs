//! API error types for calls to the auth backend

use std::fmt;

/// Errors that can occur when calling the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401 Unauthorized - credential invalid or expired
    Unauthorized { endpoint: String },
    /// 403 Forbidden - credential lacks required permissions
    Forbidden { endpoint: String },
    /// 429 Rate Limited
    RateLimited {
        endpoint: String,
        retry_after_secs: Option<u64>,
    },
    /// Network or timeout error
    NetworkError { endpoint: String, message: String },
    /// Other HTTP errors
    HttpError {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// Response body did not match the expected contract
    InvalidResponse { endpoint: String, message: String },
}

impl ApiError {
    /// Check if this is an authentication error (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    /// Check if the request never got a response
    pub fn is_transport_error(&self) -> bool {
        matches!(self, ApiError::NetworkError { .. })
    }

    /// Get the endpoint path for this error
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Unauthorized { endpoint }
            | ApiError::Forbidden { endpoint }
            | ApiError::RateLimited { endpoint, .. }
            | ApiError::NetworkError { endpoint, .. }
            | ApiError::HttpError { endpoint, .. }
            | ApiError::InvalidResponse { endpoint, .. } => endpoint,
        }
    }

    /// Get retry-after seconds if rate limited
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    pub fn unauthorized(endpoint: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            endpoint: endpoint.into(),
        }
    }

    pub fn forbidden(endpoint: impl Into<String>) -> Self {
        ApiError::Forbidden {
            endpoint: endpoint.into(),
        }
    }

    pub fn rate_limited(endpoint: impl Into<String>, retry_after: Option<u64>) -> Self {
        ApiError::RateLimited {
            endpoint: endpoint.into(),
            retry_after_secs: retry_after,
        }
    }

    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NetworkError {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn http(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        ApiError::HttpError {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized { endpoint } => {
                write!(f, "{endpoint}: Unauthorized (401)")
            }
            ApiError::Forbidden { endpoint } => {
                write!(f, "{endpoint}: Forbidden (403) - insufficient permissions")
            }
            ApiError::RateLimited {
                endpoint,
                retry_after_secs,
            } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "{endpoint}: Rate limited - retry after {secs}s")
                } else {
                    write!(f, "{endpoint}: Rate limited")
                }
            }
            ApiError::NetworkError { endpoint, message } => {
                write!(f, "{endpoint}: Network error - {message}")
            }
            ApiError::HttpError {
                endpoint,
                status,
                message,
            } => {
                write!(f, "{endpoint}: HTTP {status} - {message}")
            }
            ApiError::InvalidResponse { endpoint, message } => {
                write!(f, "{endpoint}: Invalid response - {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
