//! Definition generator
//!
//! Serializes workflow, application and pipeline definitions into the `.cds`
//! directory and records each written path in order.

use colored::*;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tether_core::definition::naming::{
    application_file_name, is_definition_file, pipeline_file_name, workflow_file_name,
};
use tether_core::definition::{
    ApplicationDefinition, Format, PipelineDefinition, WorkflowDefinition, marshal,
};
use tracing::debug;

use super::InitError;

/// Name of the definitions directory at the repository root
pub const DEFINITIONS_DIR: &str = ".cds";

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Ordered list of generated files: workflow, then application, then pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFileSet {
    paths: Vec<PathBuf>,
}

impl GeneratedFileSet {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

pub struct DefinitionGenerator {
    dir: PathBuf,
    files: GeneratedFileSet,
}

impl DefinitionGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: GeneratedFileSet::default(),
        }
    }

    pub fn write_workflow(&mut self, workflow: &WorkflowDefinition) -> Result<PathBuf, InitError> {
        self.write(workflow_file_name(&workflow.name), workflow)
    }

    pub fn write_application(
        &mut self,
        application: &ApplicationDefinition,
    ) -> Result<PathBuf, InitError> {
        self.write(application_file_name(&application.name), application)
    }

    pub fn write_pipeline(&mut self, pipeline: &PipelineDefinition) -> Result<PathBuf, InitError> {
        self.write(pipeline_file_name(&pipeline.name), pipeline)
    }

    pub fn into_files(self) -> GeneratedFileSet {
        self.files
    }

    fn write<T: Serialize>(&mut self, file_name: String, entity: &T) -> Result<PathBuf, InitError> {
        let path = self.dir.join(file_name);
        if self.files.contains(&path) {
            return Err(InitError::write_failed(
                &path,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "another definition of this run already uses this file name",
                ),
            ));
        }
        let bytes = marshal(entity, Format::Yaml).map_err(|e| InitError::write_failed(&path, e))?;

        create_dir(&self.dir).map_err(|e| InitError::write_failed(&self.dir, e))?;
        write_file(&path, &bytes).map_err(|e| InitError::write_failed(&path, e))?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        println!("File {} created", path.display().to_string().magenta());
        self.files.push(path.clone());
        Ok(path)
    }
}

/// Definition files already present in `dir`, sorted
///
/// A missing directory has none.
pub fn existing_definitions(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_definition_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn create_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(DIR_MODE))?;
    }
    Ok(())
}

pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE))?;
    }
    Ok(())
}
