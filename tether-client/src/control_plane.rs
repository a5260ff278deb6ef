//! Control plane abstraction
//!
//! The reconciler talks to the control plane through this trait so the HTTP
//! client can be injected explicitly and replaced in tests.

use async_trait::async_trait;
use tether_core::domain::application::Application;
use tether_core::domain::operation::Operation;
use tether_core::domain::pipeline::Pipeline;
use tether_core::domain::project::{ApplicationKey, Project};
use tether_core::domain::repository::RemoteRepository;
use tether_core::dto::operation::RepositoryStrategy;
use tether_core::dto::workflow::PushResponse;
use uuid::Uuid;

use crate::ControlPlaneClient;
use crate::error::Result;

/// Remote control plane operations used by workflow initialization
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Lists all projects visible to the current user
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Fetches a project with its repositories managers and key material
    async fn get_project(&self, project_key: &str) -> Result<Project>;

    /// Lists repositories reachable through a repositories manager
    async fn list_repositories(
        &self,
        project_key: &str,
        vcs_server: &str,
    ) -> Result<Vec<RemoteRepository>>;

    /// Lists applications of a project
    async fn list_applications(&self, project_key: &str) -> Result<Vec<Application>>;

    /// Lists pipelines of a project
    async fn list_pipelines(&self, project_key: &str) -> Result<Vec<Pipeline>>;

    /// Lists keys attached to an application
    async fn list_application_keys(
        &self,
        project_key: &str,
        application: &str,
    ) -> Result<Vec<ApplicationKey>>;

    /// Starts a workflow-as-code analysis of a repository
    async fn start_workflow_as_code(
        &self,
        project_key: &str,
        repo_url: &str,
        strategy: &RepositoryStrategy,
    ) -> Result<Operation>;

    /// Fetches the current state of an operation
    async fn get_operation(&self, project_key: &str, uuid: Uuid) -> Result<Operation>;

    /// Performs a completed operation, returning the server messages
    async fn perform_operation(&self, project_key: &str, uuid: Uuid) -> Result<Vec<String>>;

    /// Pushes a definition archive and returns the canonical one
    async fn push_workflow(
        &self,
        project_key: &str,
        archive: Vec<u8>,
        origin_url: &str,
    ) -> Result<PushResponse>;
}

#[async_trait]
impl ControlPlane for ControlPlaneClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        ControlPlaneClient::list_projects(self).await
    }

    async fn get_project(&self, project_key: &str) -> Result<Project> {
        ControlPlaneClient::get_project(self, project_key).await
    }

    async fn list_repositories(
        &self,
        project_key: &str,
        vcs_server: &str,
    ) -> Result<Vec<RemoteRepository>> {
        ControlPlaneClient::list_repositories(self, project_key, vcs_server).await
    }

    async fn list_applications(&self, project_key: &str) -> Result<Vec<Application>> {
        ControlPlaneClient::list_applications(self, project_key).await
    }

    async fn list_pipelines(&self, project_key: &str) -> Result<Vec<Pipeline>> {
        ControlPlaneClient::list_pipelines(self, project_key).await
    }

    async fn list_application_keys(
        &self,
        project_key: &str,
        application: &str,
    ) -> Result<Vec<ApplicationKey>> {
        ControlPlaneClient::list_application_keys(self, project_key, application).await
    }

    async fn start_workflow_as_code(
        &self,
        project_key: &str,
        repo_url: &str,
        strategy: &RepositoryStrategy,
    ) -> Result<Operation> {
        ControlPlaneClient::start_workflow_as_code(self, project_key, repo_url, strategy).await
    }

    async fn get_operation(&self, project_key: &str, uuid: Uuid) -> Result<Operation> {
        ControlPlaneClient::get_operation(self, project_key, uuid).await
    }

    async fn perform_operation(&self, project_key: &str, uuid: Uuid) -> Result<Vec<String>> {
        ControlPlaneClient::perform_operation(self, project_key, uuid).await
    }

    async fn push_workflow(
        &self,
        project_key: &str,
        archive: Vec<u8>,
        origin_url: &str,
    ) -> Result<PushResponse> {
        ControlPlaneClient::push_workflow(self, project_key, archive, origin_url).await
    }
}
