//! Application domain types

use serde::{Deserialize, Serialize};

/// Application registered in a project
///
/// An application is linked to at most one source repository through
/// `repository_fullname`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub project_key: String,
    #[serde(default)]
    pub repository_fullname: String,
    #[serde(default)]
    pub vcs_server: Option<String>,
}

impl Application {
    /// Whether this application is linked to the given repository
    ///
    /// The comparison is exact: callers pass the canonical full name returned
    /// by the VCS server.
    pub fn is_linked_to(&self, repository_fullname: &str) -> bool {
        !self.repository_fullname.is_empty() && self.repository_fullname == repository_fullname
    }
}
