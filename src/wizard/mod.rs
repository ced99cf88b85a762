//! Project wizard: step registry, navigation rules and the service that
//! applies them to stored projects

mod navigation;
mod registry;
mod service;

pub use navigation::{NavigationOutcome, Rejection};
pub use registry::{
    NavigationPredicate, ReachabilityPredicate, RegistryError, StepDefinition, StepProgress,
    StepRegistry,
};
pub use service::{StepNavigation, Transition, Wizard, WizardError};
