//! Step transitions for a single project
//!
//! Linear movement (`advance`/`retreat`) is bounded by the registry and never
//! consults step predicates. Direct jumps go through `can_navigate_to_step`.
//! None of these fail: boundary no-ops and rejected jumps are reported as
//! [`NavigationOutcome`] values.

use std::fmt;

use crate::projects::Project;
use crate::wizard::StepRegistry;

/// Why a direct jump was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Target is outside `1..=total_steps`
    UnknownStep,
    /// Target step's predicate denied navigation
    NotNavigable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownStep => write!(f, "unknown step"),
            Rejection::NotNavigable => write!(f, "step is not navigable yet"),
        }
    }
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// `current_step` changed
    Moved { from: u32, to: u32 },
    /// Request accepted but nothing changed (boundary, or jump to the current step)
    Stayed { step: u32 },
    /// Jump refused; `current_step` unchanged
    Rejected {
        current: u32,
        target: u32,
        reason: Rejection,
    },
}

impl NavigationOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, NavigationOutcome::Rejected { .. })
    }

    pub fn changed(&self) -> bool {
        matches!(self, NavigationOutcome::Moved { .. })
    }

    /// The step the project is on after the request
    pub fn resulting_step(&self) -> u32 {
        match *self {
            NavigationOutcome::Moved { to, .. } => to,
            NavigationOutcome::Stayed { step } => step,
            NavigationOutcome::Rejected { current, .. } => current,
        }
    }

    fn between(from: u32, to: u32) -> Self {
        if from == to {
            NavigationOutcome::Stayed { step: from }
        } else {
            NavigationOutcome::Moved { from, to }
        }
    }
}

impl StepRegistry {
    /// Move forward one step; no-op on the terminal step
    pub fn advance(&self, project: &mut Project) -> NavigationOutcome {
        let from = project.current_step;
        if from < self.total_steps() {
            project.current_step = from + 1;
        }
        NavigationOutcome::between(from, project.current_step)
    }

    /// Move back one step; no-op on the initial step
    pub fn retreat(&self, project: &mut Project) -> NavigationOutcome {
        let from = project.current_step;
        if from > 1 {
            project.current_step = from - 1;
        }
        NavigationOutcome::between(from, project.current_step)
    }

    /// Jump directly to `target_step` if its predicate allows it
    pub fn jump_to(&self, project: &mut Project, target_step: u32) -> NavigationOutcome {
        let current = project.current_step;

        if !self.contains(target_step) {
            return NavigationOutcome::Rejected {
                current,
                target: target_step,
                reason: Rejection::UnknownStep,
            };
        }

        if !self.can_navigate_to_step(&project.project_id, target_step, current) {
            return NavigationOutcome::Rejected {
                current,
                target: target_step,
                reason: Rejection::NotNavigable,
            };
        }

        project.current_step = target_step;
        NavigationOutcome::between(current, target_step)
    }

    /// Pull a stored position back into `1..=total_steps`.
    ///
    /// Projects persisted under a longer registry may carry a step that no
    /// longer exists. Returns true if the project was changed.
    pub fn normalize(&self, project: &mut Project) -> bool {
        let clamped = project.current_step.clamp(1, self.total_steps());
        if clamped == project.current_step {
            return false;
        }
        project.current_step = clamped;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::StepDefinition;

    fn five_step_registry() -> StepRegistry {
        StepRegistry::new(
            (1..=5)
                .map(|id| {
                    let step = StepDefinition::new(id, format!("s{id}"), format!("S{id}"), "");
                    if id == 1 {
                        step.always_navigable()
                    } else {
                        step.forward_gated()
                    }
                })
                .collect(),
        )
        .unwrap()
    }

    fn project_on(step: u32) -> Project {
        let mut project = Project::new("test", "");
        project.current_step = step;
        project
    }

    #[test]
    fn test_advance_is_idempotent_at_terminal_step() {
        let registry = five_step_registry();
        let mut project = project_on(4);

        assert_eq!(
            registry.advance(&mut project),
            NavigationOutcome::Moved { from: 4, to: 5 }
        );
        for _ in 0..3 {
            assert_eq!(
                registry.advance(&mut project),
                NavigationOutcome::Stayed { step: 5 }
            );
            assert_eq!(project.current_step, 5);
        }
    }

    #[test]
    fn test_retreat_is_idempotent_at_initial_step() {
        let registry = five_step_registry();
        let mut project = project_on(2);

        assert!(registry.retreat(&mut project).changed());
        for _ in 0..3 {
            assert_eq!(
                registry.retreat(&mut project),
                NavigationOutcome::Stayed { step: 1 }
            );
        }
        assert_eq!(project.current_step, 1);
    }

    #[test]
    fn test_advance_ignores_navigation_predicates() {
        let registry = StepRegistry::new(vec![
            StepDefinition::new(1, "a", "A", "").always_navigable(),
            StepDefinition::new(2, "b", "B", "").navigable_when(|_, _| false),
        ])
        .unwrap();
        let mut project = project_on(1);

        assert!(registry.advance(&mut project).changed());
        assert_eq!(project.current_step, 2);
    }

    #[test]
    fn test_jump_changes_step_iff_navigable() {
        let registry = five_step_registry();
        for current in 1..=5 {
            for target in 0..=7 {
                let mut project = project_on(current);
                let allowed = registry.can_navigate_to_step(&project.project_id, target, current);
                let outcome = registry.jump_to(&mut project, target);

                assert_eq!(outcome.is_accepted(), allowed);
                if allowed {
                    assert_eq!(project.current_step, target);
                } else {
                    assert_eq!(project.current_step, current);
                }
                assert_eq!(outcome.resulting_step(), project.current_step);
            }
        }
    }

    #[test]
    fn test_jump_forward_gating_scenario() {
        let registry = five_step_registry();
        let mut project = project_on(2);

        let outcome = registry.jump_to(&mut project, 4);
        assert_eq!(
            outcome,
            NavigationOutcome::Rejected {
                current: 2,
                target: 4,
                reason: Rejection::NotNavigable
            }
        );
        assert_eq!(project.current_step, 2);

        registry.advance(&mut project);
        registry.advance(&mut project);
        assert_eq!(project.current_step, 4);

        let outcome = registry.jump_to(&mut project, 4);
        assert_eq!(outcome, NavigationOutcome::Stayed { step: 4 });
        assert!(outcome.is_accepted());
    }

    #[test]
    fn test_jump_back_to_first_step() {
        let registry = five_step_registry();
        let mut project = project_on(5);

        assert_eq!(
            registry.jump_to(&mut project, 1),
            NavigationOutcome::Moved { from: 5, to: 1 }
        );
    }

    #[test]
    fn test_jump_out_of_range_is_unknown_step() {
        let registry = five_step_registry();
        let mut project = project_on(3);

        let outcome = registry.jump_to(&mut project, 9);
        assert!(matches!(
            outcome,
            NavigationOutcome::Rejected {
                reason: Rejection::UnknownStep,
                ..
            }
        ));
        assert_eq!(project.current_step, 3);
    }

    #[test]
    fn test_normalize_clamps_stale_positions() {
        let registry = five_step_registry();

        let mut project = project_on(9);
        assert!(registry.normalize(&mut project));
        assert_eq!(project.current_step, 5);

        let mut project = project_on(0);
        assert!(registry.normalize(&mut project));
        assert_eq!(project.current_step, 1);

        let mut project = project_on(3);
        assert!(!registry.normalize(&mut project));
    }
}
