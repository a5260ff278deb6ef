//! Application and pipeline inventory endpoints

use crate::ControlPlaneClient;
use crate::error::Result;
use tether_core::domain::application::Application;
use tether_core::domain::pipeline::Pipeline;
use tether_core::domain::project::ApplicationKey;

impl ControlPlaneClient {
    // =============================================================================
    // Applications
    // =============================================================================

    /// List applications of a project
    pub async fn list_applications(&self, project_key: &str) -> Result<Vec<Application>> {
        let url = format!("{}/project/{}/applications", self.base_url, project_key);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List keys attached to an application
    ///
    /// # Arguments
    /// * `project_key` - The project key
    /// * `application` - The application name
    pub async fn list_application_keys(
        &self,
        project_key: &str,
        application: &str,
    ) -> Result<Vec<ApplicationKey>> {
        let url = format!(
            "{}/project/{}/application/{}/keys",
            self.base_url, project_key, application
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Pipelines
    // =============================================================================

    /// List pipelines of a project
    pub async fn list_pipelines(&self, project_key: &str) -> Result<Vec<Pipeline>> {
        let url = format!("{}/project/{}/pipeline", self.base_url, project_key);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
