//! Session guard for the project routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::rest::error::ApiError;
use crate::rest::state::ApiState;

/// Runs the protected-content check before any project handler. An invalid
/// session is fully logged out by the check and answered with 401; a user
/// without a Manager Assistant permission gets 403.
pub async fn require_manager(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = state.session.require_manager().await.map_err(|e| {
        tracing::debug!(
            method = %request.method(),
            route = %request.uri().path(),
            error = %e,
            "rejected project request"
        );
        ApiError::from(e)
    })?;

    tracing::trace!(user = %user.email, "session guard passed");
    Ok(next.run(request).await)
}
