//! rackwise-core: shared types for the rackwise capacity planner.
//!
//! - [`Quantity`]: integral-or-fractional resource amount
//! - [`ResourceVector`]: named quantities (capacity, demand, availability)
//! - [`RackwiseConfig`]: `rackwise.toml` parsing, including the spec
//!   field table used to read vendor hardware specs

pub mod config;
pub mod quantity;
pub mod resources;

pub use config::{PlannerConfig, RackwiseConfig, SpecAttribute, SpecField, SpecFieldTable};
pub use quantity::Quantity;
pub use resources::{ResourceVector, keys};
