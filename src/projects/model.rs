//! Project record carried through the wizard
//!
//! The navigation engine only reads and writes `current_step`; every other
//! field is domain data captured by the individual wizard steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// A project moving through the Manager Assistant wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Project {
    /// Opaque unique identifier
    pub project_id: String,

    /// Human-readable project name
    pub project_name: String,

    /// Free-form description entered on the first step
    #[serde(default)]
    pub description: String,

    /// 1-indexed wizard position
    pub current_step: u32,

    /// Methodology and issue tracking preferences
    #[serde(default)]
    pub configuration: ProjectConfigData,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,

    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a project positioned on the first wizard step
    pub fn new(project_name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            project_id: Uuid::new_v4().to_string(),
            project_name: project_name.into(),
            description: description.into(),
            current_step: 1,
            configuration: ProjectConfigData::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Apply a partial update. `current_step` is deliberately not updatable here.
    pub fn apply(&mut self, update: ProjectUpdate) {
        if let Some(name) = update.project_name {
            self.project_name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(configuration) = update.configuration {
            self.configuration = configuration;
        }
        self.touch();
    }
}

/// Partial update for the opaque project fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub configuration: Option<ProjectConfigData>,
}

/// Development methodology chosen on the configuration step
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Methodology {
    #[default]
    Waterfall,
    Agile,
}

/// Issue type generated tasks are filed as
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IssueType {
    #[default]
    Story,
    Task,
}

/// Settings captured by the "Project Configuration" step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProjectConfigData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<Methodology>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueType>,

    /// Subtasks created under every generated issue; empty when not needed
    #[serde(default)]
    pub subtask_list: Vec<String>,
}

impl ProjectConfigData {
    pub fn effective_methodology(&self) -> Methodology {
        self.methodology.unwrap_or_default()
    }

    pub fn effective_issue_type(&self) -> IssueType {
        self.issue_type.unwrap_or_default()
    }

    pub fn needs_subtasks(&self) -> bool {
        !self.subtask_list.is_empty()
    }
}
