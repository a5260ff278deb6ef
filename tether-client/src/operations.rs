//! Workflow-as-code operation endpoints
//!
//! An operation asks the control plane to clone and analyse a repository.
//! Callers start it, poll its status, then ask the server to perform it.

use crate::ControlPlaneClient;
use crate::error::Result;
use tether_core::domain::operation::Operation;
use tether_core::dto::operation::RepositoryStrategy;
use uuid::Uuid;

impl ControlPlaneClient {
    /// Start analysing a repository for workflow-as-code import
    ///
    /// # Arguments
    /// * `project_key` - The project key
    /// * `repo_url` - Fetch URL of the repository to analyse
    /// * `strategy` - Clone strategy; an empty one uses project defaults
    pub async fn start_workflow_as_code(
        &self,
        project_key: &str,
        repo_url: &str,
        strategy: &RepositoryStrategy,
    ) -> Result<Operation> {
        let url = format!("{}/import/{}", self.base_url, project_key);
        let response = self
            .client
            .post(&url)
            .query(&[("repo", repo_url)])
            .json(strategy)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch the current state of an operation
    pub async fn get_operation(&self, project_key: &str, uuid: Uuid) -> Result<Operation> {
        let url = format!("{}/import/{}/{}", self.base_url, project_key, uuid);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Turn a completed analysis into workflow definitions on the server
    ///
    /// # Returns
    /// Messages describing what the server created. On failure the messages
    /// are carried by [`crate::ClientError::Rejected`].
    pub async fn perform_operation(&self, project_key: &str, uuid: Uuid) -> Result<Vec<String>> {
        let url = format!("{}/import/{}/{}/perform", self.base_url, project_key, uuid);
        let response = self.client.post(&url).send().await?;

        self.handle_messages_response(response).await
    }
}
