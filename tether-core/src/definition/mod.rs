//! Workflow-as-code definitions
//!
//! Versioned declarative representations of a workflow, an application and a
//! pipeline, as stored in the repository's `.cds/` directory and exchanged with
//! the control plane in push archives.

pub mod application;
pub mod codec;
pub mod naming;
pub mod pipeline;
pub mod workflow;

pub use application::{ApplicationDefinition, KeyValue};
pub use codec::{CodecError, Format, marshal, unmarshal};
pub use pipeline::{Job, PipelineDefinition, Step};
pub use workflow::WorkflowDefinition;

/// Schema version written into every generated definition
pub const DEFINITION_VERSION: &str = "v1.0";
