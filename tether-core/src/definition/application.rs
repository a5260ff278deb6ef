//! Application definition

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DEFINITION_VERSION;
use crate::domain::project::KeyType;
use crate::domain::repository::ConnectionType;

/// Application linked to a repository through a repositories manager
///
/// `keys` declares application keys the control plane must generate on push.
/// `vcs_pgp_key` and `vcs_ssh_key` name either one of those declared keys or
/// an existing project key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDefinition {
    pub version: String,
    pub name: String,
    #[serde(rename = "repo")]
    pub repository_name: String,
    pub vcs_server: String,
    pub vcs_connection_type: ConnectionType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vcs_pgp_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vcs_ssh_key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keys: BTreeMap<String, KeyValue>,
}

/// Declared application key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    #[serde(rename = "type")]
    pub key_type: KeyType,
}

impl KeyValue {
    /// Key to be generated by the control plane
    pub fn generated(key_type: KeyType) -> Self {
        Self { key_type }
    }
}

impl ApplicationDefinition {
    pub fn new(
        name: impl Into<String>,
        repository_name: impl Into<String>,
        vcs_server: impl Into<String>,
        vcs_connection_type: ConnectionType,
    ) -> Self {
        Self {
            version: DEFINITION_VERSION.to_string(),
            name: name.into(),
            repository_name: repository_name.into(),
            vcs_server: vcs_server.into(),
            vcs_connection_type,
            vcs_pgp_key: String::new(),
            vcs_ssh_key: String::new(),
            keys: BTreeMap::new(),
        }
    }

    /// Reference a key for the VCS strategy of the given type
    pub fn use_vcs_key(&mut self, key_type: KeyType, name: impl Into<String>) {
        match key_type {
            KeyType::Pgp => self.vcs_pgp_key = name.into(),
            KeyType::Ssh => self.vcs_ssh_key = name.into(),
            KeyType::Other => {}
        }
    }

    /// Declare a key the control plane must generate, and reference it
    pub fn declare_generated_key(&mut self, key_type: KeyType, name: impl Into<String>) {
        let name = name.into();
        self.keys
            .insert(name.clone(), KeyValue::generated(key_type));
        self.use_vcs_key(key_type, name);
    }

    /// Key referenced for the VCS strategy of the given type, if any
    pub fn vcs_key(&self, key_type: KeyType) -> Option<&str> {
        let name = match key_type {
            KeyType::Pgp => &self.vcs_pgp_key,
            KeyType::Ssh => &self.vcs_ssh_key,
            KeyType::Other => return None,
        };
        (!name.is_empty()).then_some(name.as_str())
    }
}
