//! Step registry for the project wizard
//!
//! The registry is the single source of truth for wizard order. `total_steps`
//! and the step labels are computed from the registered list, never stored.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Decides whether direct navigation to a step is allowed: `(project_id, current_step)`
pub type NavigationPredicate = Arc<dyn Fn(&str, u32) -> bool + Send + Sync>;

/// Decides whether a step's content is complete for a project
pub type ReachabilityPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Registry construction errors. These are build-time defects, not runtime conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("step registry has no steps")]
    Empty,

    #[error("step id {found} at position {position} breaks the dense 1..=n ordering (expected {expected})")]
    OutOfOrder {
        position: usize,
        expected: u32,
        found: u32,
    },

    #[error("step id {0} is registered more than once")]
    DuplicateId(u32),

    #[error("step key '{0}' is registered more than once")]
    DuplicateKey(String),

    #[error("step {0} has an empty key")]
    EmptyKey(u32),
}

/// One wizard step
#[derive(Clone)]
pub struct StepDefinition {
    pub id: u32,
    pub key: String,
    pub title: String,
    pub description: String,
    is_reachable: Option<ReachabilityPredicate>,
    can_navigate_to: Option<NavigationPredicate>,
}

impl StepDefinition {
    /// Create a step with no navigation predicate. Such a step cannot be the
    /// target of a direct jump until one is attached.
    pub fn new(
        id: u32,
        key: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            title: title.into(),
            description: description.into(),
            is_reachable: None,
            can_navigate_to: None,
        }
    }

    /// Attach a custom navigation predicate
    pub fn navigable_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, u32) -> bool + Send + Sync + 'static,
    {
        self.can_navigate_to = Some(Arc::new(predicate));
        self
    }

    /// Direct navigation always allowed
    pub fn always_navigable(self) -> Self {
        self.navigable_when(|_, _| true)
    }

    /// Direct navigation allowed once the project has reached this step
    pub fn forward_gated(self) -> Self {
        let id = self.id;
        self.navigable_when(move |_, current_step| current_step >= id)
    }

    /// Attach a content-completeness predicate
    pub fn reachable_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.is_reachable = Some(Arc::new(predicate));
        self
    }

    /// Whether the step's content is complete for the project. Permissive when unset.
    pub fn is_reachable(&self, project_id: &str) -> bool {
        self.is_reachable
            .as_ref()
            .map(|predicate| predicate(project_id))
            .unwrap_or(true)
    }

    /// Whether a direct jump to this step is allowed right now
    pub fn can_navigate_to(&self, project_id: &str, current_step: u32) -> bool {
        self.can_navigate_to
            .as_ref()
            .map(|predicate| predicate(project_id, current_step))
            .unwrap_or(false)
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("title", &self.title)
            .field("has_reachability", &self.is_reachable.is_some())
            .field("has_navigation", &self.can_navigate_to.is_some())
            .finish()
    }
}

impl PartialEq for StepDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.key == other.key
    }
}

/// Snapshot of a project's position for progress displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepProgress {
    pub current: u32,
    pub total: u32,
    pub labels: Vec<String>,
}

/// Ordered, addressable list of wizard steps
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Build a registry, validating that ids are exactly `1..=n` in list
    /// order and keys are unique
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, RegistryError> {
        if steps.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen_ids = HashSet::new();
        let mut seen_keys = HashSet::new();

        for (position, step) in steps.iter().enumerate() {
            if !seen_ids.insert(step.id) {
                return Err(RegistryError::DuplicateId(step.id));
            }
            let expected = position as u32 + 1;
            if step.id != expected {
                return Err(RegistryError::OutOfOrder {
                    position,
                    expected,
                    found: step.id,
                });
            }
            if step.key.is_empty() {
                return Err(RegistryError::EmptyKey(step.id));
            }
            if !seen_keys.insert(step.key.as_str()) {
                return Err(RegistryError::DuplicateKey(step.key.clone()));
            }
        }

        Ok(Self { steps })
    }

    /// The Manager Assistant project wizard.
    ///
    /// Step 1 is always reachable; every later step can be jumped to once the
    /// project has progressed that far.
    pub fn manager_assistant() -> Self {
        Self::new(vec![
            StepDefinition::new(
                1,
                "create-project",
                "Create Project",
                "Set up your project details and information",
            )
            .always_navigable(),
            StepDefinition::new(
                2,
                "sheet-input",
                "Google Sheet Input",
                "Upload and configure your spreadsheet data",
            )
            .forward_gated(),
            StepDefinition::new(
                3,
                "project-configuration",
                "Project Configuration",
                "Configure your project methodology and issue tracking preferences",
            )
            .forward_gated(),
            StepDefinition::new(
                4,
                "review-confirm",
                "Review & Confirm",
                "Review your project details before generating dependencies",
            )
            .forward_gated(),
            StepDefinition::new(
                5,
                "review-sheet",
                "Review Sheet",
                "Review and finalize your generated tasks",
            )
            .forward_gated(),
        ])
        .expect("built-in step registry must have dense ids and unique keys")
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn total_steps(&self) -> u32 {
        self.steps.len() as u32
    }

    /// Step titles in wizard order
    pub fn step_labels(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.title.as_str()).collect()
    }

    pub fn contains(&self, id: u32) -> bool {
        (1..=self.total_steps()).contains(&id)
    }

    /// Look up a step by its 1-indexed position
    pub fn get_step_by_index(&self, id: u32) -> Option<&StepDefinition> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.steps.get(index)
    }

    pub fn get_step_by_key(&self, key: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.key == key)
    }

    /// The step after `current_step`; `None` on the terminal step
    pub fn get_next_step(&self, current_step: u32) -> Option<&StepDefinition> {
        self.get_step_by_index(current_step.checked_add(1)?)
    }

    /// The step before `current_step`; `None` on the initial step
    pub fn get_previous_step(&self, current_step: u32) -> Option<&StepDefinition> {
        self.get_step_by_index(current_step.checked_sub(1)?)
    }

    /// The single authority for direct (non-linear) navigation
    pub fn can_navigate_to_step(&self, project_id: &str, target_step: u32, current_step: u32) -> bool {
        self.get_step_by_index(target_step)
            .map(|step| step.can_navigate_to(project_id, current_step))
            .unwrap_or(false)
    }

    pub fn progress(&self, current_step: u32) -> StepProgress {
        StepProgress {
            current: current_step,
            total: self.total_steps(),
            labels: self.step_labels().into_iter().map(String::from).collect(),
        }
    }

    /// Format progress for display, e.g. `Create Project > [Google Sheet Input] > ...`
    pub fn format_progress(&self, current_step: u32) -> String {
        self.steps
            .iter()
            .map(|step| {
                if step.id == current_step {
                    format!("[{}]", step.title)
                } else {
                    step.title.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
