//! # fleetagent-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the fleetagent workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate. The status domains and the ENI attachment model live here
//! so that both the event core and the runtime can name them without
//! depending on each other.

pub mod attachment;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;
