//! Project records and their stores

mod model;
mod store;

pub use model::{IssueType, Methodology, Project, ProjectConfigData, ProjectUpdate};
pub use store::{FileProjectStore, InMemoryProjectStore, ProjectStore};
