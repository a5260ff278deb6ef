//! Local git collaborator
//!
//! Reads the origin remote of the working repository and reads/writes keys
//! in its local (non-global) configuration. Everything goes through the `git`
//! binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tether_core::domain::repository::RepositoryIdentity;
use thiserror::Error;
use tracing::debug;

/// Errors raised by the git collaborator
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("unable to retrieve origin URL: no origin remote configured")]
    MissingOrigin,

    #[error("unable to retrieve repository name from origin URL {0}")]
    InvalidRemote(String),
}

type Result<T> = std::result::Result<T, GitError>;

/// Read/write access to the local repository
pub trait LocalRepository {
    /// Working tree root
    fn root(&self) -> &Path;

    /// Fetch URL of the `origin` remote
    fn fetch_url(&self) -> Result<String>;

    /// Reads `<section>.<key>` from the local configuration
    fn local_config_get(&self, section: &str, key: &str) -> Result<Option<String>>;

    /// Writes `<section>.<key>` into the local configuration
    fn local_config_set(&self, section: &str, key: &str, value: &str) -> Result<()>;

    /// Identity derived from the origin fetch URL
    fn identity(&self) -> Result<RepositoryIdentity> {
        let fetch_url = self.fetch_url()?;
        RepositoryIdentity::from_fetch_url(&fetch_url).ok_or(GitError::InvalidRemote(fetch_url))
    }
}

/// Repository backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let output = Command::new("git")
            .arg("-C")
            .arg(path.as_ref())
            .args(["rev-parse", "--show-toplevel"])
            .output()?;

        if !output.status.success() {
            return Err(command_failed("rev-parse", &output));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Opened git repository at {}", root);

        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        Ok(Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()?)
    }
}

impl LocalRepository for GitRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn fetch_url(&self) -> Result<String> {
        let output = self.git(&["config", "--get", "remote.origin.url"])?;

        // `git config --get` exits with 1 when the key is unset
        if output.status.code() == Some(1) {
            return Err(GitError::MissingOrigin);
        }
        if !output.status.success() {
            return Err(command_failed("config", &output));
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if url.is_empty() {
            return Err(GitError::MissingOrigin);
        }
        Ok(url)
    }

    fn local_config_get(&self, section: &str, key: &str) -> Result<Option<String>> {
        let name = format!("{}.{}", section, key);
        let output = self.git(&["config", "--local", "--get", &name])?;

        if output.status.code() == Some(1) {
            return Ok(None);
        }
        if !output.status.success() {
            return Err(command_failed("config", &output));
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }

    fn local_config_set(&self, section: &str, key: &str, value: &str) -> Result<()> {
        let name = format!("{}.{}", section, key);
        debug!("Setting local git config {}={}", name, value);

        let output = self.git(&["config", "--local", &name, value])?;
        if !output.status.success() {
            return Err(command_failed("config", &output));
        }
        Ok(())
    }
}

fn command_failed(command: &str, output: &Output) -> GitError {
    GitError::CommandFailed {
        command: command.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn init_repo(dir: &Path) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["init", "--quiet"])
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_open_outside_repository_fails() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        assert!(GitRepository::open(dir.path()).is_err());
    }

    #[test]
    fn test_missing_origin() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());

        let repo = GitRepository::open(dir.path()).unwrap();
        assert!(matches!(repo.fetch_url(), Err(GitError::MissingOrigin)));
        assert!(matches!(repo.identity(), Err(GitError::MissingOrigin)));
    }

    #[test]
    fn test_identity_and_local_config() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let status = Command::new("git")
            .arg("-C")
            .arg(dir.path())
            .args(["remote", "add", "origin", "git@github.com:Org/Demo.git"])
            .status()
            .unwrap();
        assert!(status.success());

        let repo = GitRepository::open(dir.path()).unwrap();
        let identity = repo.identity().unwrap();
        assert_eq!(identity.full_name, "org/demo");
        assert_eq!(identity.fetch_url, "git@github.com:Org/Demo.git");

        assert_eq!(repo.local_config_get("cds", "workflow").unwrap(), None);
        repo.local_config_set("cds", "workflow", "demo").unwrap();
        assert_eq!(
            repo.local_config_get("cds", "workflow").unwrap(),
            Some("demo".to_string())
        );
    }
}
