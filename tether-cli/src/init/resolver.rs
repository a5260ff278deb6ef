//! Decision resolver
//!
//! Matches the local repository against the remote inventories and decides
//! what to reuse and what to create. Ambiguous cases go through the
//! [`Prompter`].

use colored::*;
use tether_core::definition::ApplicationDefinition;
use tether_core::definition::naming::{NAME_PATTERN, is_valid_name};
use tether_core::domain::application::Application;
use tether_core::domain::pipeline::Pipeline;
use tether_core::domain::project::{KeyType, Project};
use tether_core::domain::repository::{ConnectionType, RemoteRepository, RepositoryIdentity};
use tracing::debug;

use super::InitError;
use crate::prompt::Prompter;

/// Outcome for the application of the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationDecision {
    Reuse(Application),
    Create { name: String },
}

impl ApplicationDecision {
    pub fn name(&self) -> &str {
        match self {
            ApplicationDecision::Reuse(app) => &app.name,
            ApplicationDecision::Create { name } => name,
        }
    }
}

/// Outcome for the pipeline of the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineDecision {
    Reuse(String),
    Create(String),
}

impl PipelineDecision {
    pub fn name(&self) -> &str {
        match self {
            PipelineDecision::Reuse(name) | PipelineDecision::Create(name) => name,
        }
    }
}

/// Key referenced by a new application's VCS strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyReference {
    /// Existing project key
    Existing(String),
    /// Key the control plane generates on push
    Generate(String),
}

/// Picks the repositories manager; only asks when there is a choice
pub fn select_vcs_server(
    project: &Project,
    prompter: &mut dyn Prompter,
) -> Result<String, InitError> {
    let names: Vec<String> = project.vcs_servers.iter().map(|s| s.name.clone()).collect();
    match names.len() {
        0 => Err(InitError::ProjectNotLinked(project.key.clone())),
        1 => Ok(names[0].clone()),
        _ => {
            let index = prompter.choose("Choose the repository manager:", &names)?;
            Ok(names[index].clone())
        }
    }
}

/// Finds the local repository in the remote list
///
/// Matching ignores case. The returned identity carries the canonical casing
/// of the remote full name.
pub fn resolve_repository(
    identity: RepositoryIdentity,
    repositories: &[RemoteRepository],
    vcs_server: &str,
) -> Result<RepositoryIdentity, InitError> {
    let mut matches = repositories
        .iter()
        .filter(|r| r.fullname.eq_ignore_ascii_case(&identity.full_name));

    match (matches.next(), matches.next()) {
        (Some(found), None) => {
            debug!("Repository {} resolved as {}", identity.full_name, found.fullname);
            let canonical = found.fullname.clone();
            Ok(identity.with_canonical_name(canonical))
        }
        _ => Err(InitError::RepositoryNotFound {
            repository: identity.full_name,
            vcs_server: vcs_server.to_string(),
        }),
    }
}

/// Reuses the application linked to the repository, or decides to create one
///
/// An unrelated application already named `candidate` is only replaced after
/// explicit confirmation.
pub fn resolve_application(
    applications: &[Application],
    repository_fullname: &str,
    candidate: &str,
    prompter: &mut dyn Prompter,
) -> Result<ApplicationDecision, InitError> {
    if let Some(app) = applications
        .iter()
        .find(|a| a.is_linked_to(repository_fullname))
    {
        println!(
            "application {}/{} ({}) found",
            app.project_key.magenta(),
            app.name.magenta(),
            app.repository_fullname.magenta()
        );
        return Ok(ApplicationDecision::Reuse(app.clone()));
    }

    if let Some(app) = applications.iter().find(|a| a.name == candidate) {
        println!(
            "application {}/{} found.",
            app.project_key.magenta(),
            app.name.magenta()
        );
        println!(
            "{} {}",
            "But it's not linked to repository".red(),
            repository_fullname.red()
        );
        if !prompter.confirm("Do you want to overwrite it?")? {
            return Err(InitError::OperationAborted(format!(
                "application {} was not overwritten",
                app.name
            )));
        }
    }

    Ok(ApplicationDecision::Create {
        name: candidate.to_string(),
    })
}

/// Reuses a chosen pipeline or reads the name of a new one
pub fn resolve_pipeline(
    pipelines: &[Pipeline],
    prompter: &mut dyn Prompter,
) -> Result<PipelineDecision, InitError> {
    if !pipelines.is_empty() && prompter.confirm("Do you want to reuse an existing pipeline?")? {
        let names: Vec<String> = pipelines.iter().map(|p| p.name.clone()).collect();
        let index = prompter.choose("Choose your pipeline:", &names)?;
        return Ok(PipelineDecision::Reuse(names[index].clone()));
    }

    let name = prompter.read_line("Enter your pipeline name")?;
    if !is_valid_name(&name) {
        return Err(InitError::InvalidName {
            kind: "pipeline",
            name,
            pattern: NAME_PATTERN,
        });
    }

    Ok(PipelineDecision::Create(name))
}

/// Picks the key of `key_type` for a new application's VCS strategy
///
/// One project key: offered for confirmation. Several: offered in a list
/// headed by a "new key" option. Declining, picking the new key, or having
/// none yields a generated `app-<type>-<vcs server>` key.
pub fn resolve_key_reference(
    key_type: KeyType,
    project: &Project,
    vcs_server: &str,
    prompter: &mut dyn Prompter,
) -> Result<KeyReference, InitError> {
    let keys = project.keys_of_type(key_type);
    let label = key_type.label();

    match keys.as_slice() {
        [] => {}
        [only] => {
            let question = format!(
                "Found one existing {} key '{}' on project. Use it in application VCS strategy?",
                label, only.name
            );
            if prompter.confirm(&question)? {
                return Ok(KeyReference::Existing(only.name.clone()));
            }
        }
        several => {
            let options: Vec<String> = std::iter::once(format!("Use a new {} key", key_type))
                .chain(several.iter().map(|k| k.name.clone()))
                .collect();
            let question = format!("Select a {} key to use in application VCS strategy", label);
            let index = prompter.choose(&question, &options)?;
            if index > 0 {
                return Ok(KeyReference::Existing(options[index].clone()));
            }
        }
    }

    Ok(KeyReference::Generate(format!(
        "app-{}-{}",
        key_type, vcs_server
    )))
}

/// Resolves every key a new application references and records it
///
/// PGP is always resolved; SSH only for ssh connections.
pub fn apply_key_references(
    definition: &mut ApplicationDefinition,
    project: &Project,
    prompter: &mut dyn Prompter,
) -> Result<(), InitError> {
    let mut key_types = vec![KeyType::Pgp];
    if definition.vcs_connection_type == ConnectionType::Ssh {
        key_types.push(KeyType::Ssh);
    }

    for key_type in key_types {
        let vcs_server = definition.vcs_server.clone();
        match resolve_key_reference(key_type, project, &vcs_server, prompter)? {
            KeyReference::Existing(name) => definition.use_vcs_key(key_type, name),
            KeyReference::Generate(name) => definition.declare_generated_key(key_type, name),
        }
    }

    Ok(())
}
