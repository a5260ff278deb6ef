//! Initialization errors
//!
//! Every variant is terminal for the run. Remote messages attached to a
//! failure are printed before the error is returned.

use std::io;
use std::path::PathBuf;
use tether_client::ClientError;
use tether_core::definition::CodecError;
use thiserror::Error;

use crate::git::GitError;
use crate::prompt::PromptError;

/// Reasons a definition file could not be produced
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors that end a workflow initialization run
#[derive(Debug, Error)]
pub enum InitError {
    #[error("{context}: {source}")]
    RemoteUnavailable {
        context: String,
        #[source]
        source: ClientError,
    },

    #[error(
        "your project {0} must be linked to a repositories manager to perform this operation"
    )]
    ProjectNotLinked(String),

    #[error("unable to find repository {repository} from {vcs_server}: please check your credentials")]
    RepositoryNotFound {
        repository: String,
        vcs_server: String,
    },

    #[error(
        "{} already contains {} workflow file(s): edit them directly or use --from-remote",
        .dir.display(),
        .files.len()
    )]
    AlreadyInitialized { dir: PathBuf, files: Vec<PathBuf> },

    #[error("operation aborted: {0}")]
    OperationAborted(String),

    #[error("{kind} name '{name}' does not respect pattern {pattern}")]
    InvalidName {
        kind: &'static str,
        name: String,
        pattern: &'static str,
    },

    #[error("unable to write {}: {source}", .path.display())]
    DefinitionWriteFailed {
        path: PathBuf,
        #[source]
        source: DefinitionError,
    },

    #[error("workflow push rejected: {source}")]
    PushRejected {
        #[source]
        source: ClientError,
    },

    #[error("unable to perform operation {operation}: {reason}")]
    OperationPollFailed { operation: String, reason: String },

    #[error("unable to record cds.{key} in local git config: {source}")]
    BindingWriteFailed {
        key: String,
        #[source]
        source: GitError,
    },

    #[error(transparent)]
    LocalRepository(#[from] GitError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("unable to {context} workflow archive: {source}")]
    ArchiveFailed {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl InitError {
    /// Remote failure, with a hint when the status says whose side failed
    pub(crate) fn remote(context: impl Into<String>, source: ClientError) -> Self {
        let mut context = context.into();
        if source.is_not_found() {
            context.push_str(" (not found or not visible with your credentials)");
        } else if source.is_server_error() {
            context.push_str(" (control plane error)");
        }
        InitError::RemoteUnavailable { context, source }
    }

    pub(crate) fn write_failed(path: impl Into<PathBuf>, source: impl Into<DefinitionError>) -> Self {
        InitError::DefinitionWriteFailed {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_context_hint() {
        let missing = InitError::remote("unable to get project", ClientError::NotFound("PRJ".into()));
        assert!(matches!(
            missing,
            InitError::RemoteUnavailable { ref context, .. }
                if context == "unable to get project (not found or not visible with your credentials)"
        ));

        let down = InitError::remote("unable to list pipelines", ClientError::api_error(503, "down"));
        assert!(down.to_string().starts_with("unable to list pipelines (control plane error): "));

        let denied = InitError::remote("unable to list pipelines", ClientError::api_error(403, "no"));
        assert!(matches!(
            denied,
            InitError::RemoteUnavailable { ref context, .. } if context == "unable to list pipelines"
        ));
    }
}
