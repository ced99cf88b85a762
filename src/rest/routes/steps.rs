//! Wizard step metadata endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::rest::dto::{StepListResponse, StepResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// List every wizard step in order
#[utoipa::path(
    get,
    path = "/api/v1/steps",
    tag = "Steps",
    responses(
        (status = 200, description = "Registered steps", body = StepListResponse)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Json<StepListResponse> {
    Json(StepListResponse::from(state.wizard.registry()))
}

/// Get a single step by key
#[utoipa::path(
    get,
    path = "/api/v1/steps/{key}",
    tag = "Steps",
    params(
        ("key" = String, Path, description = "Step key, e.g. sheet-input")
    ),
    responses(
        (status = 200, description = "Step details", body = StepResponse),
        (status = 404, description = "Step not found", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<Json<StepResponse>, ApiError> {
    let step = state
        .wizard
        .registry()
        .get_step_by_key(&key)
        .ok_or_else(|| ApiError::NotFound(format!("Step '{}' not found", key)))?;

    Ok(Json(StepResponse::from(step)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::state::test_support::test_state;

    #[tokio::test]
    async fn test_list_steps() {
        let resp = list(State(test_state())).await;
        assert_eq!(resp.total_steps, 5);
        let keys: Vec<&str> = resp.steps.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "create-project",
                "sheet-input",
                "project-configuration",
                "review-confirm",
                "review-sheet"
            ]
        );
    }

    #[tokio::test]
    async fn test_get_step_by_key() {
        let resp = get_one(State(test_state()), Path("review-confirm".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.id, 4);
        assert_eq!(resp.title, "Review & Confirm");
    }

    #[tokio::test]
    async fn test_get_unknown_step() {
        let result = get_one(State(test_state()), Path("nope".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
