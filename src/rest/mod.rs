//! REST API exposing the project wizard and session status to the browser
//! front end.

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    http::header,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod guard;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

async fn openapi_json() -> Result<impl IntoResponse, error::ApiError> {
    let body = ApiDoc::json().map_err(|e| error::ApiError::InternalError(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Projects sit behind the session guard
    let projects = Router::new()
        .route(
            "/api/v1/projects",
            get(routes::projects::list).post(routes::projects::create),
        )
        .route(
            "/api/v1/projects/:id",
            get(routes::projects::get_one).patch(routes::projects::update),
        )
        .route(
            "/api/v1/projects/:id/advance",
            post(routes::projects::advance),
        )
        .route(
            "/api/v1/projects/:id/retreat",
            post(routes::projects::retreat),
        )
        .route("/api/v1/projects/:id/jump", post(routes::projects::jump))
        .route(
            "/api/v1/projects/:id/navigation",
            get(routes::projects::navigation),
        )
        .route_layer(from_fn_with_state(state.clone(), guard::require_manager));

    Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/openapi.json", get(openapi_json))
        // Steps
        .route("/api/v1/steps", get(routes::steps::list))
        .route("/api/v1/steps/:key", get(routes::steps::get_one))
        .merge(projects)
        // Session
        .route("/api/v1/session", get(routes::session::status))
        .route("/api/v1/session/login", post(routes::session::login))
        .route("/api/v1/session/logout", post(routes::session::logout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server and run until the process is stopped
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("REST API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down REST API");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::state::test_support::{test_state, test_state_with};
    use crate::session::ManualClock;
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn login(router: &Router, code: &str) {
        let (status, _) = send(
            router.clone(),
            post_json("/api/v1/session/login", serde_json::json!({ "code": code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    fn create_project() -> Request<Body> {
        post_json(
            "/api/v1/projects",
            serde_json::json!({"project_name": "Q3 rollout"}),
        )
    }

    #[tokio::test]
    async fn test_health_route() {
        let (status, json) = send(build_router(test_state()), get_req("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_wizard_flow_over_http() {
        let router = build_router(test_state());
        login(&router, "good-code").await;

        let (status, project) = send(router.clone(), create_project()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(project["step_labels"][0], "Create Project");
        let id = project["project_id"].as_str().unwrap().to_string();

        let (status, json) = send(
            router.clone(),
            post_json(
                &format!("/api/v1/projects/{}/jump", id),
                serde_json::json!({"target_step": 3}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], false);
        assert_eq!(json["project"]["current_step"], 1);

        let (_, json) = send(
            router.clone(),
            post_json(
                &format!("/api/v1/projects/{}/advance", id),
                serde_json::json!({}),
            ),
        )
        .await;
        assert_eq!(json["to_step"], 2);

        let (status, json) = send(
            router,
            get_req(&format!("/api/v1/projects/{}/navigation", id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[1]["is_current"], true);
    }

    #[tokio::test]
    async fn test_unknown_project_is_404() {
        let router = build_router(test_state());
        login(&router, "good-code").await;

        let (status, json) = send(router, get_req("/api/v1/projects/does-not-exist")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_projects_require_login() {
        let router = build_router(test_state());

        let (status, json) = send(router.clone(), create_project()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "unauthorized");

        let (status, _) = send(router.clone(), get_req("/api/v1/projects")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Public routes stay open
        let (status, _) = send(router.clone(), get_req("/api/v1/steps")).await;
        assert_eq!(status, StatusCode::OK);

        login(&router, "good-code").await;
        let (status, _) = send(router.clone(), create_project()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = send(router, get_req("/api/v1/projects")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_projects_reject_user_without_permission() {
        let state = test_state();
        let router = build_router(state.clone());
        login(&router, "viewer-code").await;

        let (status, json) = send(router, create_project()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "forbidden");
        assert!(state.session.is_authenticated());
        assert!(state.wizard.list_projects().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_session_is_logged_out_by_project_routes() {
        let clock = Arc::new(ManualClock::new(0));
        let state = test_state_with(false, clock.clone());
        let router = build_router(state.clone());
        login(&router, "good-code").await;

        // Inside the grace window the backend is not consulted
        let (status, _) = send(router.clone(), get_req("/api/v1/projects")).await;
        assert_eq!(status, StatusCode::OK);

        clock.set(60_000);
        let (status, _) = send(router.clone(), get_req("/api/v1/projects")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!state.session.is_authenticated());
        assert!(state.session.cached_verdict().is_none());

        let (_, json) = send(router, get_req("/api/v1/session")).await;
        assert_eq!(json["authenticated"], false);
    }

    #[tokio::test]
    async fn test_session_login_route() {
        let router = build_router(test_state());

        let (status, _) = send(
            router.clone(),
            post_json("/api/v1/session/login", serde_json::json!({"code": "good-code"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(router, get_req("/api/v1/session")).await;
        assert_eq!(json["authenticated"], true);
    }

    #[tokio::test]
    async fn test_openapi_route() {
        let (status, json) = send(build_router(test_state()), get_req("/api/v1/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["paths"]["/api/v1/steps"].is_object());
    }
}
