//! Project stores backing the wizard

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::persistence::{self, StoreError};
use crate::projects::Project;

/// Keyed storage for projects. The wizard only reads and writes through this.
pub trait ProjectStore: Send + Sync {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError>;

    fn set_project(&self, project_id: &str, project: Project) -> Result<(), StoreError>;

    /// All projects, ordered by creation time
    fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
}

fn sorted_by_creation(projects: &BTreeMap<String, Project>) -> Vec<Project> {
    let mut list: Vec<Project> = projects.values().cloned().collect();
    list.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    list
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<BTreeMap<String, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        Ok(persistence::read(&self.projects).get(project_id).cloned())
    }

    fn set_project(&self, project_id: &str, project: Project) -> Result<(), StoreError> {
        persistence::write(&self.projects).insert(project_id.to_string(), project);
        Ok(())
    }

    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(sorted_by_creation(&persistence::read(&self.projects)))
    }
}

/// Store persisted as `projects.json`, rewritten on every change
#[derive(Debug)]
pub struct FileProjectStore {
    path: PathBuf,
    projects: RwLock<BTreeMap<String, Project>>,
}

impl FileProjectStore {
    /// Open the store, loading existing projects if the file is present
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let projects: BTreeMap<String, Project> =
            persistence::read_json(&path)?.unwrap_or_default();

        tracing::debug!(path = %path.display(), count = projects.len(), "loaded project store");

        Ok(Self {
            path,
            projects: RwLock::new(projects),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectStore for FileProjectStore {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        Ok(persistence::read(&self.projects).get(project_id).cloned())
    }

    fn set_project(&self, project_id: &str, project: Project) -> Result<(), StoreError> {
        let mut projects = persistence::write(&self.projects);
        let previous = projects.insert(project_id.to_string(), project);

        if let Err(e) = persistence::write_json_atomic(&self.path, &*projects) {
            // Keep memory consistent with what is on disk
            match previous {
                Some(previous) => projects.insert(project_id.to_string(), previous),
                None => projects.remove(project_id),
            };
            return Err(e);
        }
        Ok(())
    }

    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(sorted_by_creation(&persistence::read(&self.projects)))
    }
}
