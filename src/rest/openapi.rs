//! OpenAPI document built with utoipa.

use utoipa::OpenApi;

use crate::api::User;
use crate::projects::{IssueType, Methodology, ProjectConfigData};
use crate::rest::dto::{
    CreateProjectRequest, HealthResponse, JumpRequest, LoginRequest, ProjectResponse,
    SessionResponse, StepListResponse, StepNavigationResponse, StepResponse, TransitionResponse,
    UpdateProjectRequest,
};
use crate::rest::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Manager Assistant API",
        description = "Project wizard navigation and session status for the Manager Assistant front end."
    ),
    paths(
        crate::rest::routes::health::health,
        crate::rest::routes::steps::list,
        crate::rest::routes::steps::get_one,
        crate::rest::routes::projects::list,
        crate::rest::routes::projects::create,
        crate::rest::routes::projects::get_one,
        crate::rest::routes::projects::update,
        crate::rest::routes::projects::advance,
        crate::rest::routes::projects::retreat,
        crate::rest::routes::projects::jump,
        crate::rest::routes::projects::navigation,
        crate::rest::routes::session::status,
        crate::rest::routes::session::login,
        crate::rest::routes::session::logout,
    ),
    components(
        schemas(
            HealthResponse,
            StepResponse,
            StepListResponse,
            ProjectResponse,
            ProjectConfigData,
            Methodology,
            IssueType,
            TransitionResponse,
            StepNavigationResponse,
            SessionResponse,
            User,
            ErrorResponse,
            CreateProjectRequest,
            UpdateProjectRequest,
            JumpRequest,
            LoginRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Steps", description = "Wizard step metadata"),
        (name = "Projects", description = "Project records"),
        (name = "Navigation", description = "Moving projects between wizard steps"),
        (name = "Session", description = "Login, logout and session validity"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The OpenAPI document as pretty-printed JSON
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
