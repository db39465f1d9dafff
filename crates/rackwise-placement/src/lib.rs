//! rackwise-placement: resource accounting and capacity planning.
//!
//! Answers two questions for a snapshot of the inventory: where can a
//! service be placed, and what should be bought if nowhere fits. Every
//! function here is pure; nothing is cached or persisted.
//!
//! # Components
//!
//! - **`raid`**: Effective capacity of a RAID group
//! - **`aggregate`**: Node capacity from installed hardware, with diagnostics
//! - **`accounting`**: Allocated and available resources
//! - **`matcher`**: Affinity, anti-affinity and spread rules
//! - **`scorer`**: Utilization and fit scoring
//! - **`planner`**: Candidate search, ranking and purchase recommendation
//! - **`report`**: Per-node capacity breakdown

pub mod accounting;
pub mod aggregate;
pub mod error;
pub mod matcher;
pub mod planner;
pub mod raid;
pub mod report;
pub mod scorer;

pub use accounting::{allocated_resources, available_resources, can_fit_resources};
pub use aggregate::{
    Aggregation, DiagnosticKind, SpecDiagnostic, aggregate_resources, aggregate_with_diagnostics,
};
pub use error::{PlanError, PlanResult};
pub use matcher::{PlacementViolation, can_place_on, check_placement, selector_matches};
pub use planner::{
    CapacityPlan, CapacityPlanner, Candidate, PlanConstraints, PlanRequest, PlannerSettings,
    Recommendation, RejectReason, Rejection,
};
pub use raid::raid_capacity;
pub use report::{NodeCapacity, capacity_report, node_capacity};
pub use scorer::{fit_score, mean_utilization, projected_utilization};
