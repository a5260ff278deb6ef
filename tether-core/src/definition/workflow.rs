//! Workflow definition

use serde::{Deserialize, Serialize};

use super::DEFINITION_VERSION;

/// Single-application, single-pipeline workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub version: String,
    pub name: String,
    #[serde(rename = "application")]
    pub application_name: String,
    #[serde(rename = "pipeline")]
    pub pipeline_name: String,
}

impl WorkflowDefinition {
    pub fn new(
        name: impl Into<String>,
        application_name: impl Into<String>,
        pipeline_name: impl Into<String>,
    ) -> Self {
        Self {
            version: DEFINITION_VERSION.to_string(),
            name: name.into(),
            application_name: application_name.into(),
            pipeline_name: pipeline_name.into(),
        }
    }
}
