//! Planner error types.
//!
//! An infeasible plan is not an error; it is a [`CapacityPlan`] with
//! `feasible == false`. Errors are reserved for malformed caller input.
//!
//! [`CapacityPlan`]: crate::planner::CapacityPlan

use thiserror::Error;

/// Errors that can occur while planning.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type PlanResult<T> = Result<T, PlanError>;
