//! Shared state for the REST server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::BackendClient;
use crate::config::Config;
use crate::projects::FileProjectStore;
use crate::session::{FileCredentialStore, SessionManager, SystemClock};
use crate::wizard::{StepRegistry, Wizard};

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    pub wizard: Arc<Wizard>,
    pub session: Arc<SessionManager>,
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(wizard: Arc<Wizard>, session: Arc<SessionManager>, config: Config) -> Self {
        Self {
            wizard,
            session,
            config: Arc::new(config),
        }
    }

    /// Wire file-backed stores and the HTTP backend from configuration,
    /// restoring any persisted session
    pub fn from_config(config: Config) -> Result<Self> {
        let registry = Arc::new(StepRegistry::manager_assistant());
        let projects = FileProjectStore::open(config.projects_file())
            .context("Failed to open project store")?;
        let wizard = Arc::new(Wizard::new(registry, Arc::new(projects)));

        let backend = BackendClient::new(
            &config.api.base_url,
            Duration::from_secs(config.api.request_timeout_secs),
        )
        .context("Failed to build backend client")?;
        let session = Arc::new(SessionManager::new(
            Arc::new(backend),
            Arc::new(FileCredentialStore::new(config.session_file())),
            Arc::new(SystemClock),
            config.session.clone(),
        ));
        if session.restore().context("Failed to restore session")? {
            tracing::info!("restored persisted session");
        }

        Ok(Self::new(wizard, session, config))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_config_uses_state_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        let state = ApiState::from_config(config).unwrap();
        assert_eq!(state.wizard.registry().total_steps(), 5);
        assert!(!state.session.is_authenticated());
        assert!(state.wizard.list_projects().unwrap().is_empty());
    }
}
