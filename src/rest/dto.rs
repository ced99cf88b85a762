//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::api::User;
use crate::projects::{Project, ProjectConfigData, ProjectUpdate};
use crate::session::SessionStatus;
use crate::wizard::{NavigationOutcome, StepDefinition, StepNavigation, StepRegistry};

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_steps: u32,
}

// =============================================================================
// Steps
// =============================================================================

/// A registered wizard step
#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct StepResponse {
    pub id: u32,
    pub key: String,
    pub title: String,
    pub description: String,
}

impl From<&StepDefinition> for StepResponse {
    fn from(step: &StepDefinition) -> Self {
        Self {
            id: step.id,
            key: step.key.clone(),
            title: step.title.clone(),
            description: step.description.clone(),
        }
    }
}

/// Every step in wizard order
#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct StepListResponse {
    pub total_steps: u32,
    pub steps: Vec<StepResponse>,
}

impl From<&StepRegistry> for StepListResponse {
    fn from(registry: &StepRegistry) -> Self {
        Self {
            total_steps: registry.total_steps(),
            steps: registry.steps().iter().map(StepResponse::from).collect(),
        }
    }
}

// =============================================================================
// Projects
// =============================================================================

/// A project with its wizard position
#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ProjectResponse {
    pub project_id: String,
    pub project_name: String,
    pub description: String,
    pub current_step: u32,
    pub total_steps: u32,
    pub current_step_key: Option<String>,
    /// Titles of every step, in order
    pub step_labels: Vec<String>,
    pub configuration: ProjectConfigData,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectResponse {
    pub fn new(project: &Project, registry: &StepRegistry) -> Self {
        let progress = registry.progress(project.current_step);
        Self {
            project_id: project.project_id.clone(),
            project_name: project.project_name.clone(),
            description: project.description.clone(),
            current_step: progress.current,
            total_steps: progress.total,
            current_step_key: registry
                .get_step_by_index(progress.current)
                .map(|s| s.key.clone()),
            step_labels: progress.labels,
            configuration: project.configuration.clone(),
            created_at: project.created_at.to_rfc3339(),
            updated_at: project.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct CreateProjectRequest {
    pub project_name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct UpdateProjectRequest {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub configuration: Option<ProjectConfigData>,
}

impl From<UpdateProjectRequest> for ProjectUpdate {
    fn from(req: UpdateProjectRequest) -> Self {
        Self {
            project_name: req.project_name,
            description: req.description,
            configuration: req.configuration,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct JumpRequest {
    pub target_step: u32,
}

/// Result of an advance, retreat or jump. Rejected jumps are not errors.
#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct TransitionResponse {
    pub accepted: bool,
    pub changed: bool,
    pub from_step: u32,
    pub to_step: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub project: ProjectResponse,
}

impl TransitionResponse {
    pub fn new(outcome: NavigationOutcome, project: ProjectResponse) -> Self {
        let (from_step, reason) = match outcome {
            NavigationOutcome::Moved { from, .. } => (from, None),
            NavigationOutcome::Stayed { step } => (step, None),
            NavigationOutcome::Rejected {
                current, reason, ..
            } => (current, Some(reason.to_string())),
        };
        Self {
            accepted: outcome.is_accepted(),
            changed: outcome.changed(),
            from_step,
            to_step: outcome.resulting_step(),
            reason,
            project,
        }
    }
}

/// Navigability of one step for a project
#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct StepNavigationResponse {
    pub id: u32,
    pub key: String,
    pub title: String,
    pub is_current: bool,
    pub can_navigate: bool,
    pub is_reachable: bool,
}

impl From<StepNavigation> for StepNavigationResponse {
    fn from(nav: StepNavigation) -> Self {
        Self {
            id: nav.id,
            key: nav.key,
            title: nav.title,
            is_current: nav.is_current,
            can_navigate: nav.can_navigate,
            is_reachable: nav.is_reachable,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl From<SessionStatus> for SessionResponse {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Valid { user } => Self {
                authenticated: true,
                user,
            },
            SessionStatus::LoggedOut => Self {
                authenticated: false,
                user: None,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct LoginRequest {
    /// Authorization code issued by the identity provider
    pub code: String,
}
