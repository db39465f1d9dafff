//! Per-node capacity breakdown: total, allocated, available.

use serde::Serialize;

use rackwise_core::{ResourceVector, SpecFieldTable};
use rackwise_state::{Node, NodeId, NodeStatus, ServiceIndex, Snapshot};

use crate::accounting::{allocated_resources, available_resources};
use crate::aggregate::{SpecDiagnostic, aggregate_with_diagnostics};
use crate::scorer::mean_utilization;

/// Capacity of one node as derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeCapacity {
    pub node_id: NodeId,
    pub name: String,
    pub status: NodeStatus,
    pub total: ResourceVector,
    pub allocated: ResourceVector,
    pub available: ResourceVector,
    pub utilization: f64,
    pub diagnostics: Vec<SpecDiagnostic>,
}

/// Derive the capacity of a single node.
pub fn node_capacity(
    snapshot: &Snapshot,
    services: &ServiceIndex<'_>,
    node: &Node,
    fields: &SpecFieldTable,
) -> NodeCapacity {
    let aggregation =
        aggregate_with_diagnostics(&snapshot.components, &snapshot.installed, &node.id, fields);
    let total = aggregation.resources;
    let allocated = allocated_resources(node, &snapshot.assignments, services);
    let available = available_resources(&total, &allocated);

    NodeCapacity {
        node_id: node.id.clone(),
        name: node.name.clone(),
        status: node.status,
        utilization: mean_utilization(&allocated, &total),
        total,
        allocated,
        available,
        diagnostics: aggregation.diagnostics,
    }
}

/// Capacity of every node in the snapshot, sorted by node ID.
pub fn capacity_report(snapshot: &Snapshot, fields: &SpecFieldTable) -> Vec<NodeCapacity> {
    let services = snapshot.service_index();
    let mut report: Vec<NodeCapacity> = snapshot
        .nodes
        .iter()
        .map(|node| node_capacity(snapshot, &services, node, fields))
        .collect();
    report.sort_by(|a, b| a.node_id.cmp(&b.node_id));
    report
}
