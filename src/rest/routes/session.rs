//! Session endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::api::User;
use crate::rest::dto::{LoginRequest, SessionResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// Current session status. Runs the validity guard, so an invalid session is
/// logged out as a side effect.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    tag = "Session",
    responses(
        (status = 200, description = "Session status", body = SessionResponse)
    )
)]
pub async fn status(State(state): State<ApiState>) -> Json<SessionResponse> {
    Json(SessionResponse::from(state.session.ensure_valid().await))
}

/// Exchange a provider authorization code for a session
#[utoipa::path(
    post,
    path = "/api/v1/session/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = User),
        (status = 400, description = "Missing authorization code", body = ErrorResponse),
        (status = 401, description = "Code rejected by the backend", body = ErrorResponse),
        (status = 502, description = "Backend unreachable", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.session.login(&req.code).await?;
    Ok(Json(user))
}

/// Drop the session
#[utoipa::path(
    post,
    path = "/api/v1/session/logout",
    tag = "Session",
    responses(
        (status = 204, description = "Logged out"),
        (status = 500, description = "Failed to clear persisted session", body = ErrorResponse)
    )
)]
pub async fn logout(State(state): State<ApiState>) -> Result<StatusCode, ApiError> {
    state.session.logout()?;
    Ok(StatusCode::NO_CONTENT)
}
