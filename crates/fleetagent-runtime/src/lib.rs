//! # fleetagent-runtime
//!
//! The producer side of state-change reporting.
//!
//! [`Task`](task::Task) and [`Container`](container::Container) are the live,
//! internally synchronized objects the agent mutates as work progresses.
//! They implement the metadata getter traits of `fleetagent-statechange`
//! (see [`metadata`]), and [`events`] builds state-change events that point
//! back at them through non-owning handles.

pub mod container;
pub mod events;
pub mod metadata;
pub mod task;
