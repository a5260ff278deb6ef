//! Workflow initialization
//!
//! Reconciles the local repository, its `.cds` directory and the control
//! plane inventories into one workflow, then publishes it. Two entry points:
//! [`WorkflowInit::run_local`] generates the definitions here and pushes
//! them; [`WorkflowInit::run_from_remote`] lets the control plane analyze the
//! repository itself.

pub mod archive;
pub mod binding;
mod error;
pub mod generator;
pub mod poller;
pub mod probe;
pub mod resolver;

pub use error::InitError;

use colored::*;
use std::path::PathBuf;
use tether_client::ControlPlane;
use tether_core::definition::naming::{NAME_PATTERN, is_valid_name};
use tether_core::definition::{ApplicationDefinition, PipelineDefinition, WorkflowDefinition};
use tether_core::domain::repository::RepositoryIdentity;
use tracing::{debug, info};
use uuid::Uuid;

use crate::git::LocalRepository;
use crate::prompt::Prompter;
use archive::{ArchiveTransport, UnpackOptions};
use binding::{BindingKey, LocalBindingWriter};
use generator::{DEFINITIONS_DIR, DefinitionGenerator, GeneratedFileSet, existing_definitions};
use poller::{OperationPoller, PollSettings};
use probe::RemoteStateProber;
use resolver::{ApplicationDecision, PipelineDecision};

/// Prints remote-provided messages, one per line
pub(crate) fn print_messages(messages: &[String]) {
    for message in messages {
        println!("\t{}", message);
    }
}

/// Outcome of a local initialization
#[derive(Debug)]
pub struct LocalInitReport {
    pub project_key: String,
    pub workflow_name: String,
    pub application_name: String,
    pub pipeline_name: String,
    /// Files written before the push
    pub generated: GeneratedFileSet,
    /// Files written from the canonical archive
    pub unpacked: Vec<PathBuf>,
    pub messages: Vec<String>,
}

/// Outcome of a remote-driven initialization
#[derive(Debug)]
pub struct RemoteInitReport {
    pub project_key: String,
    pub operation: Uuid,
    pub messages: Vec<String>,
}

/// One initialization run against a repository
pub struct WorkflowInit<'a> {
    client: &'a dyn ControlPlane,
    repo: &'a dyn LocalRepository,
    prompter: &'a mut dyn Prompter,
    poll: PollSettings,
}

impl<'a> WorkflowInit<'a> {
    pub fn new(
        client: &'a dyn ControlPlane,
        repo: &'a dyn LocalRepository,
        prompter: &'a mut dyn Prompter,
        poll: PollSettings,
    ) -> Self {
        Self {
            client,
            repo,
            prompter,
            poll,
        }
    }

    /// Project key from the argument, then `cds.project`, then an
    /// interactive choice that is recorded as `cds.project`
    pub async fn resolve_project_key(&mut self, argument: Option<String>) -> Result<String, InitError> {
        if let Some(key) = argument.filter(|k| !k.is_empty()) {
            return Ok(key);
        }

        let bindings = LocalBindingWriter::new(self.repo);
        if let Some(key) = bindings.get(BindingKey::Project)?.filter(|k| !k.is_empty()) {
            debug!("Using project {} from {}", key, BindingKey::Project);
            return Ok(key);
        }

        let projects = self
            .client
            .list_projects()
            .await
            .map_err(|e| InitError::remote("unable to list projects", e))?;
        let options: Vec<String> = projects
            .iter()
            .map(|p| format!("{} - {}", p.key, p.name))
            .collect();
        let index = self.prompter.choose("Choose the project:", &options)?;
        let key = projects[index].key.clone();

        bindings.set(BindingKey::Project, &key)?;
        Ok(key)
    }

    /// Generates the definitions locally, pushes them and records bindings
    pub async fn run_local(&mut self, project_key: Option<String>) -> Result<LocalInitReport, InitError> {
        let identity = self.repo.identity()?;
        let workflow_name = identity.short_name().to_string();
        if !is_valid_name(&workflow_name) {
            return Err(InitError::InvalidName {
                kind: "workflow",
                name: workflow_name,
                pattern: NAME_PATTERN,
            });
        }

        let dot_cds = self.repo.root().join(DEFINITIONS_DIR);
        let existing = existing_definitions(&dot_cds).map_err(|e| InitError::write_failed(&dot_cds, e))?;
        if !existing.is_empty() {
            return Err(InitError::AlreadyInitialized {
                dir: dot_cds,
                files: existing,
            });
        }

        let project_key = self.resolve_project_key(project_key).await?;
        announce(&identity);

        let prober = RemoteStateProber::new(self.client, &project_key);
        let project = prober.project().await?;
        let vcs_server = resolver::select_vcs_server(&project, &mut *self.prompter)?;

        let repositories = prober.repositories(&vcs_server).await?;
        let identity = resolver::resolve_repository(identity, &repositories, &vcs_server)?;

        let applications = prober.applications().await?;
        let application = resolver::resolve_application(
            &applications,
            &identity.full_name,
            &workflow_name,
            &mut *self.prompter,
        )?;

        let pipelines = prober.pipelines().await?;
        let pipeline = resolver::resolve_pipeline(&pipelines, &mut *self.prompter)?;

        let application_definition = match &application {
            ApplicationDecision::Reuse(_) => None,
            ApplicationDecision::Create { name } => {
                let mut definition = ApplicationDefinition::new(
                    name.as_str(),
                    identity.full_name.as_str(),
                    vcs_server.as_str(),
                    identity.connection_type(),
                );
                resolver::apply_key_references(&mut definition, &project, &mut *self.prompter)?;
                Some(definition)
            }
        };

        let mut generator = DefinitionGenerator::new(&dot_cds);
        generator.write_workflow(&WorkflowDefinition::new(
            workflow_name.as_str(),
            application.name(),
            pipeline.name(),
        ))?;
        if let Some(definition) = &application_definition {
            generator.write_application(definition)?;
        }
        if let PipelineDecision::Create(name) = &pipeline {
            generator.write_pipeline(&PipelineDefinition::with_default_job(name.as_str()))?;
        }
        let generated = generator.into_files();

        let archive = archive::pack(&generated)?;
        println!("Pushing workflow...");
        let response = ArchiveTransport::new(self.client, &project_key)
            .push(archive, &identity.fetch_url)
            .await?;
        if let Some(name) = &response.workflow_name {
            info!("Workflow registered as {}", name);
        }
        let unpacked = archive::unpack(&response.archive, &dot_cds, UnpackOptions::default())?;

        let bindings = LocalBindingWriter::new(self.repo);
        bindings.set(BindingKey::Workflow, &workflow_name)?;
        bindings.set(BindingKey::Application, application.name())?;

        println!(
            "Now you can run: {}",
            format!(
                "git add {}/ && git commit -s -m \"chore: init workflow files\"",
                DEFINITIONS_DIR
            )
            .magenta()
        );

        let keys = prober.application_keys(application.name()).await?;
        if !keys.is_empty() {
            println!(
                "You should consider adding the following keys in {}",
                vcs_server.magenta()
            );
            for key in &keys {
                println!("{} ({})", key.name, key.key_type.to_string().magenta());
                println!("{}", key.public);
                println!();
            }
        }

        Ok(LocalInitReport {
            project_key,
            workflow_name,
            application_name: application.name().to_string(),
            pipeline_name: pipeline.name().to_string(),
            generated,
            unpacked,
            messages: response.messages,
        })
    }

    /// Asks the control plane to analyze the origin repository and create
    /// the workflow from it
    pub async fn run_from_remote(
        &mut self,
        project_key: Option<String>,
    ) -> Result<RemoteInitReport, InitError> {
        let identity = self.repo.identity()?;
        let project_key = self.resolve_project_key(project_key).await?;
        announce(&identity);

        let poller = OperationPoller::new(self.client, &project_key, self.poll);
        let (operation, messages) = poller.run(&identity.fetch_url).await?;

        LocalBindingWriter::new(self.repo).set(BindingKey::Project, &project_key)?;

        Ok(RemoteInitReport {
            project_key,
            operation,
            messages,
        })
    }
}

fn announce(identity: &RepositoryIdentity) {
    println!(
        "Initializing workflow from {} ({})...",
        identity.full_name.magenta(),
        identity.fetch_url.magenta()
    );
}
