//! Definition codec
//!
//! Serializes definitions to the declarative text formats the control plane
//! accepts.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while encoding or decoding a definition
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("YAML codec error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Declarative text format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

/// Encode an entity in the given format
pub fn marshal<T: Serialize>(entity: &T, format: Format) -> Result<Vec<u8>, CodecError> {
    match format {
        Format::Yaml => Ok(serde_yaml::to_string(entity)?.into_bytes()),
        Format::Json => {
            let mut bytes = serde_json::to_vec_pretty(entity)?;
            bytes.push(b'\n');
            Ok(bytes)
        }
    }
}

/// Decode an entity from the given format
pub fn unmarshal<T: DeserializeOwned>(bytes: &[u8], format: Format) -> Result<T, CodecError> {
    match format {
        Format::Yaml => Ok(serde_yaml::from_slice(bytes)?),
        Format::Json => Ok(serde_json::from_slice(bytes)?),
    }
}
