//! Remote state prober
//!
//! Read-only queries against the control plane for one project.

use tether_client::ControlPlane;
use tether_core::domain::application::Application;
use tether_core::domain::pipeline::Pipeline;
use tether_core::domain::project::{ApplicationKey, Project};
use tether_core::domain::repository::RemoteRepository;
use tracing::debug;

use super::InitError;

pub struct RemoteStateProber<'a> {
    client: &'a dyn ControlPlane,
    project_key: &'a str,
}

impl<'a> RemoteStateProber<'a> {
    pub fn new(client: &'a dyn ControlPlane, project_key: &'a str) -> Self {
        Self {
            client,
            project_key,
        }
    }

    /// Project with key material
    ///
    /// Fails with [`InitError::ProjectNotLinked`] when the project has no
    /// repositories manager.
    pub async fn project(&self) -> Result<Project, InitError> {
        let project = self
            .client
            .get_project(self.project_key)
            .await
            .map_err(|e| InitError::remote("unable to get project", e))?;

        debug!(
            "Project {} has {} repositories manager(s) and {} key(s)",
            project.key,
            project.vcs_servers.len(),
            project.keys.len()
        );

        if !project.is_linked() {
            return Err(InitError::ProjectNotLinked(project.key));
        }

        Ok(project)
    }

    pub async fn repositories(&self, vcs_server: &str) -> Result<Vec<RemoteRepository>, InitError> {
        let repositories = self
            .client
            .list_repositories(self.project_key, vcs_server)
            .await
            .map_err(|e| {
                InitError::remote(format!("unable to list repositories from {}", vcs_server), e)
            })?;

        debug!("{} repositories visible through {}", repositories.len(), vcs_server);
        Ok(repositories)
    }

    pub async fn applications(&self) -> Result<Vec<Application>, InitError> {
        self.client
            .list_applications(self.project_key)
            .await
            .map_err(|e| InitError::remote("unable to list applications", e))
    }

    pub async fn pipelines(&self) -> Result<Vec<Pipeline>, InitError> {
        self.client
            .list_pipelines(self.project_key)
            .await
            .map_err(|e| InitError::remote("unable to list pipelines", e))
    }

    pub async fn application_keys(&self, application: &str) -> Result<Vec<ApplicationKey>, InitError> {
        self.client
            .list_application_keys(self.project_key, application)
            .await
            .map_err(|e| {
                InitError::remote(format!("unable to list keys of application {}", application), e)
            })
    }
}
