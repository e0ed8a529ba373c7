//! # fleetagent-cni
//!
//! Configuration consumed by the VPC ENI network plugin and the retry
//! policy governing task network namespace setup.
//!
//! This crate does not invoke the plugin. It provides:
//! - [`VpcEniPluginConfig`](plugin::VpcEniPluginConfig): the serialized plugin input.
//! - [`ExponentialBackoff`](backoff::ExponentialBackoff): capped, jittered delays.
//! - [`retry_setup`](retry::retry_setup): a bounded retry loop that ends in
//!   [`CniError::RetriesExhausted`](error::CniError::RetriesExhausted).

pub mod backoff;
pub mod error;
pub mod plugin;
pub mod retry;
