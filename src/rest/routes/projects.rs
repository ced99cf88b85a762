//! Project and wizard navigation endpoints, all behind `rest::guard`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::rest::dto::{
    CreateProjectRequest, JumpRequest, ProjectResponse, StepNavigationResponse,
    TransitionResponse, UpdateProjectRequest,
};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::wizard::Transition;

fn transition_response(state: &ApiState, transition: Transition) -> TransitionResponse {
    TransitionResponse::new(
        transition.outcome,
        ProjectResponse::new(&transition.project, state.wizard.registry()),
    )
}

/// List all projects
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projects ordered by creation time", body = Vec<ProjectResponse>),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let registry = state.wizard.registry();
    let projects = state.wizard.list_projects()?;
    Ok(Json(
        projects
            .iter()
            .map(|p| ProjectResponse::new(p, registry))
            .collect(),
    ))
}

/// Create a project on the first step
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid project", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let project = state
        .wizard
        .create_project(&req.project_name, &req.description)?;
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::new(&project, state.wizard.registry())),
    ))
}

/// Get a single project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state.wizard.project(&id)?;
    Ok(Json(ProjectResponse::new(&project, state.wizard.registry())))
}

/// Update project details. The wizard position is only changed by navigation.
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state.wizard.update_project(&id, req.into())?;
    Ok(Json(ProjectResponse::new(&project, state.wizard.registry())))
}

/// Move to the next step
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/advance",
    tag = "Navigation",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Navigation result", body = TransitionResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn advance(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let transition = state.wizard.advance(&id)?;
    Ok(Json(transition_response(&state, transition)))
}

/// Move to the previous step
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/retreat",
    tag = "Navigation",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Navigation result", body = TransitionResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn retreat(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let transition = state.wizard.retreat(&id)?;
    Ok(Json(transition_response(&state, transition)))
}

/// Jump directly to a step. A refused jump is reported with `accepted: false`.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/jump",
    tag = "Navigation",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    request_body = JumpRequest,
    responses(
        (status = 200, description = "Navigation result", body = TransitionResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn jump(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<JumpRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let transition = state.wizard.jump_to(&id, req.target_step)?;
    Ok(Json(transition_response(&state, transition)))
}

/// Per-step navigability for the project's current position
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/navigation",
    tag = "Navigation",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Step navigability", body = Vec<StepNavigationResponse>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Missing Manager Assistant permission", body = ErrorResponse)
    )
)]
pub async fn navigation(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<StepNavigationResponse>>, ApiError> {
    let steps = state.wizard.navigation(&id)?;
    Ok(Json(
        steps.into_iter().map(StepNavigationResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::state::test_support::test_state;

    async fn create_project(state: &ApiState) -> String {
        let (status, Json(project)) = create(
            State(state.clone()),
            Json(CreateProjectRequest {
                project_name: "Q3 rollout".to_string(),
                description: "Sheet-driven planning".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(project.current_step, 1);
        project.project_id
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let result = create(
            State(test_state()),
            Json(CreateProjectRequest {
                project_name: "  ".to_string(),
                description: String::new(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_advance_and_retreat() {
        let state = test_state();
        let id = create_project(&state).await;

        let resp = advance(State(state.clone()), Path(id.clone())).await.unwrap();
        assert!(resp.accepted);
        assert!(resp.changed);
        assert_eq!((resp.from_step, resp.to_step), (1, 2));
        assert_eq!(resp.project.current_step_key.as_deref(), Some("sheet-input"));

        let resp = retreat(State(state.clone()), Path(id.clone())).await.unwrap();
        assert_eq!(resp.to_step, 1);

        // Retreat on the first step is a no-op, not an error
        let resp = retreat(State(state), Path(id)).await.unwrap();
        assert!(resp.accepted);
        assert!(!resp.changed);
        assert_eq!(resp.to_step, 1);
    }

    #[tokio::test]
    async fn test_forward_jump_is_refused_with_ok_status() {
        let state = test_state();
        let id = create_project(&state).await;

        let resp = jump(
            State(state.clone()),
            Path(id.clone()),
            Json(JumpRequest { target_step: 4 }),
        )
        .await
        .unwrap();
        assert!(!resp.accepted);
        assert_eq!(resp.project.current_step, 1);
        assert!(resp.reason.is_some());

        let stored = get_one(State(state), Path(id)).await.unwrap();
        assert_eq!(stored.current_step, 1);
    }

    #[tokio::test]
    async fn test_backward_jump_after_progress() {
        let state = test_state();
        let id = create_project(&state).await;
        for _ in 0..3 {
            advance(State(state.clone()), Path(id.clone())).await.unwrap();
        }

        let resp = jump(
            State(state.clone()),
            Path(id.clone()),
            Json(JumpRequest { target_step: 2 }),
        )
        .await
        .unwrap();
        assert!(resp.accepted);
        assert_eq!((resp.from_step, resp.to_step), (4, 2));
    }

    #[tokio::test]
    async fn test_jump_out_of_range() {
        let state = test_state();
        let id = create_project(&state).await;

        let resp = jump(State(state), Path(id), Json(JumpRequest { target_step: 9 }))
            .await
            .unwrap();
        assert!(!resp.accepted);
        assert_eq!(resp.reason.as_deref(), Some("unknown step"));
    }

    #[tokio::test]
    async fn test_navigation_flags() {
        let state = test_state();
        let id = create_project(&state).await;
        advance(State(state.clone()), Path(id.clone())).await.unwrap();

        let steps = navigation(State(state), Path(id)).await.unwrap();
        let flags: Vec<(bool, bool)> = steps.iter().map(|s| (s.is_current, s.can_navigate)).collect();
        assert_eq!(
            flags,
            vec![
                (false, true),
                (true, true),
                (false, false),
                (false, false),
                (false, false)
            ]
        );
    }

    #[tokio::test]
    async fn test_update_keeps_step() {
        let state = test_state();
        let id = create_project(&state).await;
        advance(State(state.clone()), Path(id.clone())).await.unwrap();

        let resp = update(
            State(state),
            Path(id),
            Json(UpdateProjectRequest {
                project_name: Some("Renamed".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.project_name, "Renamed");
        assert_eq!(resp.current_step, 2);
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let result = advance(State(test_state()), Path("missing".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_projects() {
        let state = test_state();
        create_project(&state).await;
        create_project(&state).await;

        let resp = list(State(state)).await.unwrap();
        assert_eq!(resp.len(), 2);
    }
}
