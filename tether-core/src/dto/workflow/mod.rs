//! Workflow push DTOs

/// Header carrying the fetch URL that triggered a workflow-as-code push
pub const WORKFLOW_AS_CODE_HEADER: &str = "X-Api-Workflow-As-Code";

/// Header naming the workflow the server created or updated on push
pub const WORKFLOW_NAME_HEADER: &str = "X-Api-Workflow-Name";

/// Result of a successful workflow push
#[derive(Debug, Clone, Default)]
pub struct PushResponse {
    /// Messages returned by the server, in order
    pub messages: Vec<String>,
    /// Name of the workflow the server registered
    pub workflow_name: Option<String>,
    /// Canonical tar archive of the pushed definitions
    pub archive: Vec<u8>,
}
