//! Project-related API endpoints

use crate::ControlPlaneClient;
use crate::error::Result;
use tether_core::domain::project::Project;
use tether_core::domain::repository::RemoteRepository;

impl ControlPlaneClient {
    // =============================================================================
    // Projects
    // =============================================================================

    /// List all projects visible to the current user
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = format!("{}/project", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get a project with its repositories managers and key material
    ///
    /// # Arguments
    /// * `project_key` - The project key
    pub async fn get_project(&self, project_key: &str) -> Result<Project> {
        let url = format!("{}/project/{}", self.base_url, project_key);
        let response = self
            .client
            .get(&url)
            .query(&[("withKeys", "true")])
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Repositories Managers
    // =============================================================================

    /// List repositories reachable through a repositories manager linked to a project
    ///
    /// # Arguments
    /// * `project_key` - The project key
    /// * `vcs_server` - Name of the repositories manager
    pub async fn list_repositories(
        &self,
        project_key: &str,
        vcs_server: &str,
    ) -> Result<Vec<RemoteRepository>> {
        let url = format!(
            "{}/project/{}/repositories_manager/{}/repos",
            self.base_url, project_key, vcs_server
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
