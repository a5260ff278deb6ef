//! Project domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Project as returned by the control plane
///
/// `keys` is only populated when the project is fetched with key material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub vcs_servers: Vec<VcsServer>,
    #[serde(default)]
    pub keys: Vec<ProjectKey>,
}

impl Project {
    /// Whether the project is linked to at least one repositories manager
    pub fn is_linked(&self) -> bool {
        !self.vcs_servers.is_empty()
    }

    /// Project keys of the given type, in server order
    pub fn keys_of_type(&self, key_type: KeyType) -> Vec<&ProjectKey> {
        self.keys.iter().filter(|k| k.key_type == key_type).collect()
    }
}

/// Repositories manager linked to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsServer {
    pub name: String,
}

/// Key pair stored on a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectKey {
    pub name: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    #[serde(default)]
    pub public: Option<String>,
}

/// Key pair stored on an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationKey {
    pub name: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    #[serde(default)]
    pub public: String,
}

/// Key pair type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Pgp,
    Ssh,
    /// Any key type this tool does not reference (e.g. raw keys)
    #[serde(other)]
    Other,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Pgp => "pgp",
            KeyType::Ssh => "ssh",
            KeyType::Other => "other",
        }
    }

    /// Label used in prompts ("PGP", "SSH")
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
