//! Workflow archive endpoints

use reqwest::header::CONTENT_TYPE;
use tether_core::dto::workflow::{PushResponse, WORKFLOW_AS_CODE_HEADER, WORKFLOW_NAME_HEADER};

use crate::error::{ClientError, Result};
use crate::{ControlPlaneClient, parse_messages};

const TAR_CONTENT_TYPE: &str = "application/tar";

impl ControlPlaneClient {
    /// Push a tar archive of workflow definitions
    ///
    /// The server registers the definitions, then the canonical archive of the
    /// resulting workflow is pulled back.
    ///
    /// # Arguments
    /// * `project_key` - The project key
    /// * `archive` - Tar archive of definition files
    /// * `origin_url` - Fetch URL of the repository the definitions come from
    ///
    /// # Errors
    /// Returns [`ClientError::Rejected`] with every message the server sent
    /// when the push or the follow-up pull fails.
    pub async fn push_workflow(
        &self,
        project_key: &str,
        archive: Vec<u8>,
        origin_url: &str,
    ) -> Result<PushResponse> {
        let url = format!("{}/project/{}/push/workflows", self.base_url, project_key);
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, TAR_CONTENT_TYPE)
            .header(WORKFLOW_AS_CODE_HEADER, origin_url)
            .body(archive)
            .send()
            .await?;

        let status = response.status();
        let workflow_name = response
            .headers()
            .get(WORKFLOW_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        let mut messages = parse_messages(&body);

        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                messages,
            });
        }

        let Some(name) = workflow_name else {
            messages.push(format!(
                "Response did not carry the {} header",
                WORKFLOW_NAME_HEADER
            ));
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                messages,
            });
        };

        tracing::debug!("Workflow {} pushed, pulling canonical archive", name);

        match self.pull_workflow(project_key, &name).await {
            Ok(archive) => Ok(PushResponse {
                messages,
                workflow_name: Some(name),
                archive,
            }),
            Err(e) => {
                let status = match &e {
                    ClientError::ApiError { status, .. } | ClientError::Rejected { status, .. } => {
                        *status
                    }
                    ClientError::NotFound(_) => 404,
                    _ => status.as_u16(),
                };
                messages.push(format!("Unable to pull workflow {}: {}", name, e));
                Err(ClientError::Rejected { status, messages })
            }
        }
    }

    /// Pull the tar archive of a workflow's definitions
    pub async fn pull_workflow(&self, project_key: &str, workflow: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/project/{}/pull/workflows/{}",
            self.base_url, project_key, workflow
        );
        let response = self
            .client
            .get(&url)
            .query(&[("withPermissions", "false")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
