//! Workflow command handlers
//!
//! Wires the terminal, the local git repository and the control plane client
//! into a [`WorkflowInit`] run.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use tether_client::ControlPlaneClient;

use crate::config::Config;
use crate::git::GitRepository;
use crate::init::WorkflowInit;
use crate::init::poller::PollSettings;
use crate::prompt::TerminalPrompter;

/// Workflow subcommands
#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// Initialize a workflow from the current repository
    ///
    /// Generates workflow, application and pipeline definitions into .cds/
    /// and pushes them to the control plane.
    Init {
        /// Project key; defaults to cds.project from git config, then an interactive choice
        project_key: Option<String>,

        /// Let the control plane analyze the git origin instead of generating files locally
        #[arg(short = 'r', long)]
        from_remote: bool,
    },
}

/// Handle workflow commands
///
/// # Arguments
/// * `command` - The workflow command to execute
/// * `config` - The CLI configuration
pub async fn handle_workflow_command(command: WorkflowCommands, config: &Config) -> Result<()> {
    match command {
        WorkflowCommands::Init {
            project_key,
            from_remote,
        } => init_workflow(project_key, from_remote, config).await,
    }
}

async fn init_workflow(project_key: Option<String>, from_remote: bool, config: &Config) -> Result<()> {
    let client = match &config.token {
        Some(token) => ControlPlaneClient::with_token(&config.api_url, token)
            .context("Failed to build control plane client")?,
        None => ControlPlaneClient::new(&config.api_url),
    };
    let repo = GitRepository::open(".").context("Current directory is not a git repository")?;
    let mut prompter = TerminalPrompter::stdio();

    let mut init = WorkflowInit::new(&client, &repo, &mut prompter, PollSettings::from(config));

    if from_remote {
        let report = init.run_from_remote(project_key).await?;
        println!(
            "{} Operation {} performed on project {} ({} message(s))",
            "✓".green().bold(),
            report.operation.to_string().dimmed(),
            report.project_key.cyan(),
            report.messages.len()
        );
    } else {
        let report = init.run_local(project_key).await?;
        println!(
            "{} Workflow {} initialized on project {} (application {}, pipeline {})",
            "✓".green().bold(),
            report.workflow_name.cyan(),
            report.project_key.cyan(),
            report.application_name,
            report.pipeline_name
        );
        println!(
            "  {} file(s) generated, {} written back from the server, {} message(s)",
            report.generated.len(),
            report.unpacked.len(),
            report.messages.len()
        );
    }

    Ok(())
}
