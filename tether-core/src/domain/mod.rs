//! Core domain types
//!
//! This module contains the entities the control plane owns and the CLI reads.
//! They are shared between the HTTP client (for deserialization) and the
//! reconciler (for decisions).

pub mod application;
pub mod operation;
pub mod pipeline;
pub mod project;
pub mod repository;
