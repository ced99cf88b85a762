//! Wizard service tying the step registry to a project store

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::persistence::{self, StoreError};
use crate::projects::{Project, ProjectStore, ProjectUpdate};
use crate::wizard::{NavigationOutcome, StepRegistry};

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A project together with the outcome of the navigation request applied to it
#[derive(Debug, Clone)]
pub struct Transition {
    pub project: Project,
    pub outcome: NavigationOutcome,
}

/// Per-step navigability for a project, used to enable or disable step controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigation {
    pub id: u32,
    pub key: String,
    pub title: String,
    pub is_current: bool,
    pub can_navigate: bool,
    pub is_reachable: bool,
}

/// Drives projects through the registered steps
pub struct Wizard {
    registry: Arc<StepRegistry>,
    store: Arc<dyn ProjectStore>,
    // Serializes read-modify-write cycles against the store
    write_lock: Mutex<()>,
}

impl Wizard {
    pub fn new(registry: Arc<StepRegistry>, store: Arc<dyn ProjectStore>) -> Self {
        Self {
            registry,
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Create a project on step 1
    pub fn create_project(
        &self,
        project_name: &str,
        description: &str,
    ) -> Result<Project, WizardError> {
        let project_name = project_name.trim();
        if project_name.is_empty() {
            return Err(WizardError::InvalidProject(
                "project name must not be empty".to_string(),
            ));
        }

        let project = Project::new(project_name, description.trim());
        self.store.set_project(&project.project_id, project.clone())?;

        tracing::info!(
            project_id = %project.project_id,
            name = %project.project_name,
            "created project"
        );
        Ok(project)
    }

    /// Fetch a project, clamping a stale step position into range
    pub fn project(&self, project_id: &str) -> Result<Project, WizardError> {
        let mut project = self
            .store
            .get_project(project_id)?
            .ok_or_else(|| WizardError::ProjectNotFound(project_id.to_string()))?;
        if self.registry.normalize(&mut project) {
            tracing::warn!(
                project_id,
                step = project.current_step,
                "stored step was out of range, clamped"
            );
        }
        Ok(project)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, WizardError> {
        let mut projects = self.store.list_projects()?;
        for project in &mut projects {
            self.registry.normalize(project);
        }
        Ok(projects)
    }

    pub fn update_project(
        &self,
        project_id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, WizardError> {
        if matches!(&update.project_name, Some(name) if name.trim().is_empty()) {
            return Err(WizardError::InvalidProject(
                "project name must not be empty".to_string(),
            ));
        }

        let _guard = persistence::lock(&self.write_lock);
        let mut project = self.project(project_id)?;
        project.apply(update);
        self.store.set_project(project_id, project.clone())?;

        tracing::debug!(project_id, "updated project");
        Ok(project)
    }

    pub fn advance(&self, project_id: &str) -> Result<Transition, WizardError> {
        self.transition(project_id, "advance", |registry, project| {
            registry.advance(project)
        })
    }

    pub fn retreat(&self, project_id: &str) -> Result<Transition, WizardError> {
        self.transition(project_id, "retreat", |registry, project| {
            registry.retreat(project)
        })
    }

    pub fn jump_to(&self, project_id: &str, target_step: u32) -> Result<Transition, WizardError> {
        self.transition(project_id, "jump", |registry, project| {
            registry.jump_to(project, target_step)
        })
    }

    /// Navigability of every registered step for the project's current position
    pub fn navigation(&self, project_id: &str) -> Result<Vec<StepNavigation>, WizardError> {
        let project = self.project(project_id)?;
        Ok(self
            .registry
            .steps()
            .iter()
            .map(|step| StepNavigation {
                id: step.id,
                key: step.key.clone(),
                title: step.title.clone(),
                is_current: step.id == project.current_step,
                can_navigate: step.can_navigate_to(&project.project_id, project.current_step),
                is_reachable: step.is_reachable(&project.project_id),
            })
            .collect())
    }

    fn transition<F>(
        &self,
        project_id: &str,
        action: &str,
        apply: F,
    ) -> Result<Transition, WizardError>
    where
        F: FnOnce(&StepRegistry, &mut Project) -> NavigationOutcome,
    {
        let _guard = persistence::lock(&self.write_lock);
        let mut project = self.project(project_id)?;
        let outcome = apply(&self.registry, &mut project);

        match outcome {
            NavigationOutcome::Moved { from, to } => {
                project.touch();
                self.store.set_project(project_id, project.clone())?;
                tracing::info!(project_id, action, from, to, "step changed");
            }
            NavigationOutcome::Stayed { step } => {
                tracing::debug!(project_id, action, step, "step unchanged");
            }
            NavigationOutcome::Rejected {
                current,
                target,
                reason,
            } => {
                tracing::debug!(project_id, action, current, target, %reason, "navigation rejected");
            }
        }

        Ok(Transition { project, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::{InMemoryProjectStore, Methodology, ProjectConfigData};

    fn wizard() -> Wizard {
        Wizard::new(
            Arc::new(StepRegistry::manager_assistant()),
            Arc::new(InMemoryProjectStore::new()),
        )
    }

    #[test]
    fn test_create_project_starts_on_step_one() {
        let wizard = wizard();
        let project = wizard.create_project("  Launch  ", "desc").unwrap();
        assert_eq!(project.current_step, 1);
        assert_eq!(project.project_name, "Launch");
        assert_eq!(wizard.project(&project.project_id).unwrap(), project);
    }

    #[test]
    fn test_create_project_requires_name() {
        let wizard = wizard();
        assert!(matches!(
            wizard.create_project("   ", ""),
            Err(WizardError::InvalidProject(_))
        ));
    }

    #[test]
    fn test_unknown_project_is_not_found() {
        let wizard = wizard();
        assert!(matches!(
            wizard.advance("missing"),
            Err(WizardError::ProjectNotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_advance_persists_step() {
        let wizard = wizard();
        let project = wizard.create_project("Launch", "").unwrap();

        let transition = wizard.advance(&project.project_id).unwrap();
        assert_eq!(transition.outcome, NavigationOutcome::Moved { from: 1, to: 2 });
        assert_eq!(wizard.project(&project.project_id).unwrap().current_step, 2);
    }

    #[test]
    fn test_rejected_jump_leaves_store_untouched() {
        let wizard = wizard();
        let project = wizard.create_project("Launch", "").unwrap();

        let transition = wizard.jump_to(&project.project_id, 3).unwrap();
        assert!(!transition.outcome.is_accepted());

        let stored = wizard.project(&project.project_id).unwrap();
        assert_eq!(stored.current_step, 1);
        assert_eq!(stored.updated_at, project.updated_at);
    }

    #[test]
    fn test_navigation_reflects_position() {
        let wizard = wizard();
        let project = wizard.create_project("Launch", "").unwrap();
        wizard.advance(&project.project_id).unwrap();
        wizard.advance(&project.project_id).unwrap();

        let navigation = wizard.navigation(&project.project_id).unwrap();
        let navigable: Vec<u32> = navigation
            .iter()
            .filter(|s| s.can_navigate)
            .map(|s| s.id)
            .collect();
        assert_eq!(navigable, vec![1, 2, 3]);

        let current: Vec<&str> = navigation
            .iter()
            .filter(|s| s.is_current)
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(current, vec!["project-configuration"]);
    }

    #[test]
    fn test_update_project_keeps_step() {
        let wizard = wizard();
        let project = wizard.create_project("Launch", "").unwrap();
        wizard.advance(&project.project_id).unwrap();

        let updated = wizard
            .update_project(
                &project.project_id,
                ProjectUpdate {
                    configuration: Some(ProjectConfigData {
                        methodology: Some(Methodology::Agile),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.current_step, 2);
        assert_eq!(
            updated.configuration.effective_methodology(),
            Methodology::Agile
        );
    }

    #[test]
    fn test_stale_step_is_clamped_on_read() {
        let store = Arc::new(InMemoryProjectStore::new());
        let mut project = Project::new("Legacy", "");
        project.current_step = 12;
        store.set_project(&project.project_id, project.clone()).unwrap();

        let wizard = Wizard::new(Arc::new(StepRegistry::manager_assistant()), store);
        assert_eq!(wizard.project(&project.project_id).unwrap().current_step, 5);
    }
}
