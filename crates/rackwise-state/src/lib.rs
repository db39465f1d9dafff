//! rackwise-state: the inventory model the planner reads.
//!
//! Nodes, hardware catalog entries, installed-component records,
//! services and service assignments, plus the [`Snapshot`] that bundles
//! them for one planning request.
//!
//! # Architecture
//!
//! The storage layer owns these entities. It exports them in full (no
//! pagination) as a JSON snapshot, and every planning call borrows one
//! immutable [`Snapshot`]. Nothing in this crate writes state back.

pub mod error;
pub mod snapshot;
pub mod types;

pub use error::{StateError, StateResult};
pub use snapshot::{ServiceIndex, Snapshot};
pub use types::*;
