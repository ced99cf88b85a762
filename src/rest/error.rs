//! API error types and responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::persistence::StoreError;
use crate::session::{AccessError, AuthError};
use crate::wizard::WizardError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),
    /// Bad request
    BadRequest(String),
    /// No valid session
    Unauthorized(String),
    /// Session lacks the required permission
    Forbidden(String),
    /// Auth backend unreachable or misbehaving
    BadGateway(String),
    /// Internal server error
    InternalError(String),
}

/// Error response body
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::ProjectNotFound(_) => ApiError::NotFound(err.to_string()),
            WizardError::InvalidProject(_) => ApiError::BadRequest(err.to_string()),
            WizardError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store failure");
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::MissingAuthorizationCode => ApiError::BadRequest(err.to_string()),
            AuthError::TokenExchange(e) if e.is_auth_error() => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::TokenExchange(_) => ApiError::BadGateway(err.to_string()),
            AuthError::EmptyToken => ApiError::Unauthorized(err.to_string()),
            AuthError::Persist(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotLoggedIn => ApiError::Unauthorized(err.to_string()),
            AccessError::MissingPermission(_) => ApiError::Forbidden(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError as BackendError;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_not_found_response() {
        let error = ApiError::from(WizardError::ProjectNotFound("p-1".to_string()));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "not_found");
        assert!(json.message.contains("p-1"));
    }

    #[tokio::test]
    async fn test_invalid_project_is_bad_request() {
        let error = ApiError::from(WizardError::InvalidProject("empty name".to_string()));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_error_mapping() {
        let rejected = ApiError::from(AuthError::TokenExchange(BackendError::unauthorized(
            "/auth/verify",
        )));
        assert_eq!(rejected.into_response().status(), StatusCode::UNAUTHORIZED);

        let unreachable = ApiError::from(AuthError::TokenExchange(BackendError::network(
            "/auth/verify",
            "connection refused",
        )));
        assert_eq!(unreachable.into_response().status(), StatusCode::BAD_GATEWAY);

        let missing = ApiError::from(AuthError::MissingAuthorizationCode);
        assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);

        let overloaded = ApiError::from(AuthError::TokenExchange(BackendError::http(
            "/auth/verify",
            503,
            "maintenance",
        )));
        assert_eq!(overloaded.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_access_error_mapping() {
        let logged_out = ApiError::from(AccessError::NotLoggedIn).into_response();
        assert_eq!(logged_out.status(), StatusCode::UNAUTHORIZED);

        let denied = ApiError::from(AccessError::MissingPermission("kim@example.com".to_string()))
            .into_response();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
        let body = denied.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "forbidden");
        assert!(json.message.contains("kim@example.com"));
    }
}
