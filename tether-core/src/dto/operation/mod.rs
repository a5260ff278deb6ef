//! Operation DTOs

use serde::{Deserialize, Serialize};

/// Credentials and branch hints the control plane uses to clone a repository
///
/// Sent as the body of a workflow-as-code start request. Every field is
/// optional; an empty strategy lets the server use the project defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryStrategy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pgp_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
