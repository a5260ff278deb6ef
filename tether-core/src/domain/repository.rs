//! Repository domain types
//!
//! A local repository is identified by the `owner/repo` full name derived from
//! its origin fetch URL. Remote repositories are listed by the repositories
//! manager linked to a project.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository as listed by a repositories manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub fullname: String,
    #[serde(default)]
    pub ssh_url: Option<String>,
    #[serde(default)]
    pub http_url: Option<String>,
}

impl RemoteRepository {
    pub fn new(fullname: impl Into<String>) -> Self {
        Self {
            fullname: fullname.into(),
            ssh_url: None,
            http_url: None,
        }
    }
}

/// Identity of the local repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentity {
    /// `owner/repo` (every group segment kept), lowercase until matched against the remote list
    pub full_name: String,
    /// Origin fetch URL
    pub fetch_url: String,
}

impl RepositoryIdentity {
    /// Build an identity from an origin fetch URL
    ///
    /// Returns `None` when no `owner/repo` pair can be extracted.
    pub fn from_fetch_url(fetch_url: &str) -> Option<Self> {
        let full_name = full_name_from_url(fetch_url)?;
        Some(Self {
            full_name,
            fetch_url: fetch_url.trim().to_string(),
        })
    }

    /// Last path segment of the full name (`repo` in `owner/repo`)
    pub fn short_name(&self) -> &str {
        self.full_name
            .rsplit('/')
            .next()
            .unwrap_or(self.full_name.as_str())
    }

    /// Connection type implied by the fetch URL scheme
    pub fn connection_type(&self) -> ConnectionType {
        ConnectionType::from_fetch_url(&self.fetch_url)
    }

    /// Replace the full name with the canonical casing returned by the server
    pub fn with_canonical_name(mut self, canonical: impl Into<String>) -> Self {
        self.full_name = canonical.into();
        self
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

/// How the control plane should clone the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Ssh,
    Https,
}

impl ConnectionType {
    pub fn from_fetch_url(fetch_url: &str) -> Self {
        if fetch_url.trim().starts_with("https") {
            ConnectionType::Https
        } else {
            ConnectionType::Ssh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Ssh => "ssh",
            ConnectionType::Https => "https",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the lowercase repository path from a git remote URL
///
/// Handles `scheme://[user@]host[:port]/path` and scp-like `user@host:path`.
/// Every path segment is kept (nested groups), except the `scm/` prefix that
/// Bitbucket Server puts in front of `PROJECT/repo`.
fn full_name_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/').map(|(_, path)| path)?
    } else if let Some((_, path)) = url.split_once(':') {
        path
    } else {
        url
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > 2 && segments[0] == "scm" {
        segments.remove(0);
    }
    if segments.len() < 2 {
        return None;
    }

    Some(segments.join("/").to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_scp_url() {
        let id = RepositoryIdentity::from_fetch_url("git@github.com:Org/Demo.git").unwrap();
        assert_eq!(id.full_name, "org/demo");
        assert_eq!(id.short_name(), "demo");
        assert_eq!(id.connection_type(), ConnectionType::Ssh);
    }

    #[test]
    fn test_identity_from_https_url() {
        let id = RepositoryIdentity::from_fetch_url("https://github.com/org/demo-app").unwrap();
        assert_eq!(id.full_name, "org/demo-app");
        assert_eq!(id.connection_type(), ConnectionType::Https);
    }

    #[test]
    fn test_identity_from_ssh_url_with_port_and_prefix() {
        let id =
            RepositoryIdentity::from_fetch_url("ssh://git@stash.local:7999/scm/PRJ/api.git/")
                .unwrap();
        assert_eq!(id.full_name, "prj/api");
        assert_eq!(id.short_name(), "api");
    }

    #[test]
    fn test_identity_keeps_nested_groups() {
        let id =
            RepositoryIdentity::from_fetch_url("https://gitlab.com/acme/platform/demo.git").unwrap();
        assert_eq!(id.full_name, "acme/platform/demo");
        assert_eq!(id.short_name(), "demo");

        let id = RepositoryIdentity::from_fetch_url("git@gitlab.com:Acme/Platform/Demo.git").unwrap();
        assert_eq!(id.full_name, "acme/platform/demo");
    }

    #[test]
    fn test_identity_requires_owner_and_repo() {
        assert!(RepositoryIdentity::from_fetch_url("https://github.com/").is_none());
        assert!(RepositoryIdentity::from_fetch_url("git@host:lonely.git").is_none());
    }

    #[test]
    fn test_canonical_name_keeps_fetch_url() {
        let id = RepositoryIdentity::from_fetch_url("git@github.com:org/demo.git")
            .unwrap()
            .with_canonical_name("Org/Demo");
        assert_eq!(id.full_name, "Org/Demo");
        assert_eq!(id.fetch_url, "git@github.com:org/demo.git");
        assert_eq!(id.short_name(), "Demo");
    }
}
