//! Data Transfer Objects for control plane communication
//!
//! This module contains request and response payloads that are not domain
//! entities in their own right.

pub mod operation;
pub mod workflow;
