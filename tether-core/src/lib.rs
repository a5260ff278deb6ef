//! Tether Core
//!
//! Core types and abstractions for the Tether workflow-as-code tooling.
//!
//! This crate contains:
//! - Domain types: Entities owned by the control plane (Project, Application, Operation, etc.)
//! - DTOs: Data transfer objects exchanged with the control plane
//! - Definitions: Versioned declarative files stored under `.cds/`

pub mod definition;
pub mod domain;
pub mod dto;
