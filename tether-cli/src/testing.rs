//! Test doubles for the reconciler
//!
//! Scripted answers, an in-memory repository and a control plane that replays
//! canned inventories while recording every call.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tether_client::{ClientError, ControlPlane, PushResponse};
use tether_core::domain::application::Application;
use tether_core::domain::operation::{Operation, OperationStatus};
use tether_core::domain::pipeline::Pipeline;
use tether_core::domain::project::{ApplicationKey, KeyType, Project, ProjectKey, VcsServer};
use tether_core::domain::repository::RemoteRepository;
use tether_core::dto::operation::RepositoryStrategy;
use uuid::Uuid;

use crate::git::{GitError, LocalRepository};
use crate::prompt::{PromptError, Prompter};

// =============================================================================
// Prompter
// =============================================================================

/// Answer queued in a [`ScriptedPrompter`]
#[derive(Debug, Clone)]
pub enum Answer {
    Choice(usize),
    Confirm(bool),
    Line(String),
}

/// Prompter replaying queued answers and recording every prompt
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, prompt: &str) -> Option<Answer> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front()
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize, PromptError> {
        match self.next(prompt) {
            Some(Answer::Choice(i)) => {
                assert!(i < options.len(), "choice {i} out of range for {prompt:?}");
                Ok(i)
            }
            Some(other) => panic!("expected a choice for {prompt:?}, got {other:?}"),
            None => Err(PromptError::Closed),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        match self.next(prompt) {
            Some(Answer::Confirm(yes)) => Ok(yes),
            Some(other) => panic!("expected a confirmation for {prompt:?}, got {other:?}"),
            None => Err(PromptError::Closed),
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        match self.next(prompt) {
            Some(Answer::Line(line)) => Ok(line),
            Some(other) => panic!("expected a line for {prompt:?}, got {other:?}"),
            None => Err(PromptError::Closed),
        }
    }
}

// =============================================================================
// Local repository
// =============================================================================

/// In-memory repository rooted at a real directory
pub struct FakeRepository {
    root: PathBuf,
    fetch_url: Option<String>,
    pub config: RefCell<BTreeMap<String, String>>,
    pub fail_writes: bool,
}

impl FakeRepository {
    pub fn new(root: &Path, fetch_url: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            fetch_url: Some(fetch_url.to_string()),
            config: RefCell::new(BTreeMap::new()),
            fail_writes: false,
        }
    }

    pub fn without_origin(root: &Path) -> Self {
        Self {
            fetch_url: None,
            ..Self::new(root, "")
        }
    }

    /// Repository whose config writes all fail
    pub fn failing_writes(root: &Path, fetch_url: &str) -> Self {
        Self {
            fail_writes: true,
            ..Self::new(root, fetch_url)
        }
    }

    pub fn config_value(&self, name: &str) -> Option<String> {
        self.config.borrow().get(name).cloned()
    }
}

impl LocalRepository for FakeRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn fetch_url(&self) -> Result<String, GitError> {
        self.fetch_url.clone().ok_or(GitError::MissingOrigin)
    }

    fn local_config_get(&self, section: &str, key: &str) -> Result<Option<String>, GitError> {
        Ok(self.config_value(&format!("{}.{}", section, key)))
    }

    fn local_config_set(&self, section: &str, key: &str, value: &str) -> Result<(), GitError> {
        if self.fail_writes {
            return Err(GitError::CommandFailed {
                command: "config".to_string(),
                stderr: "could not lock config file".to_string(),
            });
        }
        self.config
            .borrow_mut()
            .insert(format!("{}.{}", section, key), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Control plane
// =============================================================================

/// Archive received by [`FakeControlPlane::push_workflow`]
#[derive(Debug, Clone)]
pub struct PushedArchive {
    pub project_key: String,
    pub archive: Vec<u8>,
    pub origin_url: String,
}

/// Control plane replaying canned state
///
/// `operations` feeds the start request first, then each status query; the
/// last entry repeats once the queue is drained. Pushes echo the received
/// archive back unless `canonical_archive` is set.
#[derive(Default)]
pub struct FakeControlPlane {
    pub projects: Vec<Project>,
    pub project: Option<Project>,
    pub repositories: Vec<RemoteRepository>,
    pub applications: Vec<Application>,
    pub pipelines: Vec<Pipeline>,
    pub application_keys: Vec<ApplicationKey>,
    pub operations: Mutex<VecDeque<Operation>>,
    pub fail_status_query: bool,
    pub perform_messages: Vec<String>,
    pub perform_fails: bool,
    pub push_messages: Vec<String>,
    pub push_rejected: bool,
    pub canonical_archive: Option<Vec<u8>>,
    pub unavailable: bool,
    pub pushes: Mutex<Vec<PushedArchive>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeControlPlane {
    pub fn with_project(project: Project) -> Self {
        Self {
            project: Some(project),
            ..Default::default()
        }
    }

    pub fn with_operations(self, operations: impl IntoIterator<Item = Operation>) -> Self {
        *self.operations.lock().unwrap() = operations.into_iter().collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> Vec<PushedArchive> {
        self.pushes.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call.into());
        if self.unavailable {
            return Err(ClientError::api_error(503, "service unavailable"));
        }
        Ok(())
    }

    fn next_operation(&self) -> Result<Operation, ClientError> {
        let mut queue = self.operations.lock().unwrap();
        match queue.len() {
            0 => Err(ClientError::NotFound("operation".to_string())),
            1 => Ok(queue[0].clone()),
            _ => Ok(queue.pop_front().unwrap()),
        }
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.record("list_projects")?;
        Ok(self.projects.clone())
    }

    async fn get_project(&self, project_key: &str) -> Result<Project, ClientError> {
        self.record(format!("get_project {}", project_key))?;
        self.project
            .clone()
            .ok_or_else(|| ClientError::NotFound(project_key.to_string()))
    }

    async fn list_repositories(
        &self,
        _project_key: &str,
        vcs_server: &str,
    ) -> Result<Vec<RemoteRepository>, ClientError> {
        self.record(format!("list_repositories {}", vcs_server))?;
        Ok(self.repositories.clone())
    }

    async fn list_applications(&self, _project_key: &str) -> Result<Vec<Application>, ClientError> {
        self.record("list_applications")?;
        Ok(self.applications.clone())
    }

    async fn list_pipelines(&self, _project_key: &str) -> Result<Vec<Pipeline>, ClientError> {
        self.record("list_pipelines")?;
        Ok(self.pipelines.clone())
    }

    async fn list_application_keys(
        &self,
        _project_key: &str,
        application: &str,
    ) -> Result<Vec<ApplicationKey>, ClientError> {
        self.record(format!("list_application_keys {}", application))?;
        Ok(self.application_keys.clone())
    }

    async fn start_workflow_as_code(
        &self,
        _project_key: &str,
        repo_url: &str,
        _strategy: &RepositoryStrategy,
    ) -> Result<Operation, ClientError> {
        self.record(format!("start_workflow_as_code {}", repo_url))?;
        self.next_operation()
    }

    async fn get_operation(&self, _project_key: &str, uuid: Uuid) -> Result<Operation, ClientError> {
        self.record(format!("get_operation {}", uuid))?;
        if self.fail_status_query {
            return Err(ClientError::api_error(500, "operation store unavailable"));
        }
        self.next_operation()
    }

    async fn perform_operation(
        &self,
        _project_key: &str,
        uuid: Uuid,
    ) -> Result<Vec<String>, ClientError> {
        self.record(format!("perform_operation {}", uuid))?;
        if self.perform_fails {
            return Err(ClientError::Rejected {
                status: 400,
                messages: self.perform_messages.clone(),
            });
        }
        Ok(self.perform_messages.clone())
    }

    async fn push_workflow(
        &self,
        project_key: &str,
        archive: Vec<u8>,
        origin_url: &str,
    ) -> Result<PushResponse, ClientError> {
        self.record("push_workflow")?;
        self.pushes.lock().unwrap().push(PushedArchive {
            project_key: project_key.to_string(),
            archive: archive.clone(),
            origin_url: origin_url.to_string(),
        });

        if self.push_rejected {
            return Err(ClientError::Rejected {
                status: 400,
                messages: self.push_messages.clone(),
            });
        }

        Ok(PushResponse {
            messages: self.push_messages.clone(),
            workflow_name: Some("pushed".to_string()),
            archive: self.canonical_archive.clone().unwrap_or(archive),
        })
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn project(key: &str, vcs_servers: &[&str], keys: &[(&str, KeyType)]) -> Project {
    Project {
        key: key.to_string(),
        name: format!("{} project", key),
        vcs_servers: vcs_servers
            .iter()
            .map(|name| VcsServer {
                name: name.to_string(),
            })
            .collect(),
        keys: keys
            .iter()
            .map(|(name, key_type)| ProjectKey {
                name: name.to_string(),
                key_type: *key_type,
                public: None,
            })
            .collect(),
    }
}

pub fn application(name: &str, repository_fullname: &str) -> Application {
    Application {
        name: name.to_string(),
        project_key: "PRJ".to_string(),
        repository_fullname: repository_fullname.to_string(),
        vcs_server: None,
    }
}

pub fn operation(uuid: Uuid, status: OperationStatus) -> Operation {
    Operation {
        uuid,
        status,
        url: None,
        error: None,
        messages: Vec::new(),
        date: None,
    }
}
