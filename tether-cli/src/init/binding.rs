//! Local binding writer
//!
//! Records resolved identifiers under the `cds` section of the repository's
//! local git config so later commands can reuse them.

use std::fmt;
use tracing::debug;

use super::InitError;
use crate::git::LocalRepository;

pub const BINDING_SECTION: &str = "cds";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKey {
    Project,
    Workflow,
    Application,
}

impl BindingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKey::Project => "project",
            BindingKey::Workflow => "workflow",
            BindingKey::Application => "application",
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", BINDING_SECTION, self.as_str())
    }
}

pub struct LocalBindingWriter<'a> {
    repo: &'a dyn LocalRepository,
}

impl<'a> LocalBindingWriter<'a> {
    pub fn new(repo: &'a dyn LocalRepository) -> Self {
        Self { repo }
    }

    pub fn set(&self, key: BindingKey, value: &str) -> Result<(), InitError> {
        self.repo
            .local_config_set(BINDING_SECTION, key.as_str(), value)
            .map_err(|source| InitError::BindingWriteFailed {
                key: key.as_str().to_string(),
                source,
            })?;
        debug!("Bound {} = {}", key, value);
        Ok(())
    }

    pub fn get(&self, key: BindingKey) -> Result<Option<String>, InitError> {
        Ok(self.repo.local_config_get(BINDING_SECTION, key.as_str())?)
    }
}
