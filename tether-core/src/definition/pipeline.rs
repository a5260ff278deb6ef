//! Pipeline definition

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DEFINITION_VERSION;

/// Name of the job added to freshly generated pipelines
pub const DEFAULT_JOB_NAME: &str = "First job";

/// Pipeline made of ordered jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub version: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<Job>,
}

/// Job made of ordered steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "job", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

/// Single step, keyed by action name (`checkout`, `script`, ...)
///
/// Step semantics are owned by the control plane; the content is carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step(pub BTreeMap<String, serde_yaml::Value>);

impl Step {
    /// `checkout` step cloning the application repository into the workspace
    pub fn checkout() -> Self {
        Self::action("checkout", "{{.cds.workspace}}")
    }

    pub fn action(name: impl Into<String>, argument: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(name.into(), serde_yaml::Value::String(argument.into()));
        Step(map)
    }

    /// Action names carried by this step
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl PipelineDefinition {
    pub fn new(name: impl Into<String>, jobs: Vec<Job>) -> Self {
        Self {
            version: DEFINITION_VERSION.to_string(),
            name: name.into(),
            jobs,
        }
    }

    /// Pipeline with one job holding a single `checkout` step
    pub fn with_default_job(name: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![Job {
                name: DEFAULT_JOB_NAME.to_string(),
                steps: vec![Step::checkout()],
            }],
        )
    }
}
