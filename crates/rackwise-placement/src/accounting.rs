//! Allocation accounting: what a node's assignments already claim.
//!
//! Allocations are charged at each service's *maximum* spec, so a node
//! is never planned past what its workloads may grow to.

use tracing::debug;

use rackwise_core::ResourceVector;
use rackwise_state::{Node, ServiceAssignment, ServiceIndex};

/// Sum of `max_spec × instances` over every assignment on `node`.
///
/// Assignments naming a service missing from `services` are skipped.
pub fn allocated_resources(
    node: &Node,
    assignments: &[ServiceAssignment],
    services: &ServiceIndex<'_>,
) -> ResourceVector {
    let mut allocated = ResourceVector::new();
    for assignment in assignments.iter().filter(|a| a.node_id == node.id) {
        match services.get(assignment.service_id.as_str()) {
            Some(service) => allocated.accumulate(&service.max_spec, assignment.instances()),
            None => debug!(
                node = %node.id,
                service = %assignment.service_id,
                "assignment references unknown service, skipping"
            ),
        }
    }
    allocated
}

/// `total − allocated` for every key of `total`.
///
/// Keys only present in `allocated` are dropped rather than reported as
/// negative availability.
pub fn available_resources(total: &ResourceVector, allocated: &ResourceVector) -> ResourceVector {
    total.minus(allocated)
}

/// True if every required key is available in at least that amount.
/// A key missing from `available` can never be satisfied.
pub fn can_fit_resources(required: &ResourceVector, available: &ResourceVector) -> bool {
    required.fits_within(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackwise_core::Quantity;
    use rackwise_state::*;

    fn vector<const N: usize>(pairs: [(&str, i64); N]) -> ResourceVector {
        pairs.into_iter().collect()
    }

    fn make_node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            name: id.to_string(),
            node_type: NodeType::Baremetal,
            provider: None,
            region: None,
            tags: Tags::new(),
            status: NodeStatus::Active,
        }
    }

    fn make_service(id: &str, max_spec: ResourceVector) -> Service {
        Service {
            id: id.to_string(),
            name: id.to_string(),
            min_spec: ResourceVector::new(),
            max_spec,
            placement: PlacementRules::default(),
        }
    }

    fn assign(service: &str, node: &str, quantity: Option<u32>) -> ServiceAssignment {
        ServiceAssignment {
            service_id: service.to_string(),
            node_id: node.to_string(),
            quantity,
        }
    }

    #[test]
    fn charges_max_spec_times_quantity() {
        let services = [
            make_service("api", vector([("cpu", 2), ("ram", 4)])),
            make_service("db", vector([("cpu", 4), ("nvme", 100)])),
        ];
        let index: ServiceIndex<'_> = services.iter().map(|s| (s.id.as_str(), s)).collect();
        let assignments = [
            assign("api", "n1", Some(3)),
            assign("db", "n1", None),
            assign("db", "n2", Some(5)),
        ];

        let allocated = allocated_resources(&make_node("n1"), &assignments, &index);

        assert_eq!(allocated, vector([("cpu", 10), ("ram", 12), ("nvme", 100)]));
    }

    #[test]
    fn zero_quantity_counts_as_one() {
        let services = [make_service("api", vector([("cpu", 2)]))];
        let index: ServiceIndex<'_> = services.iter().map(|s| (s.id.as_str(), s)).collect();

        let allocated = allocated_resources(&make_node("n1"), &[assign("api", "n1", Some(0))], &index);

        assert_eq!(allocated.get("cpu"), Some(Quantity::Int(2)));
    }

    #[test]
    fn unknown_service_is_skipped() {
        let index = ServiceIndex::new();
        let allocated = allocated_resources(&make_node("n1"), &[assign("ghost", "n1", Some(2))], &index);
        assert!(allocated.is_empty());
    }

    #[test]
    fn mixed_numeric_kinds_accumulate() {
        let mut fractional = ResourceVector::new();
        fractional.insert("bandwidth_gbps", 0.5);
        let services = [
            make_service("edge", fractional),
            make_service("bulk", vector([("bandwidth_gbps", 2)])),
        ];
        let index: ServiceIndex<'_> = services.iter().map(|s| (s.id.as_str(), s)).collect();
        let assignments = [assign("bulk", "n1", None), assign("edge", "n1", Some(3))];

        let allocated = allocated_resources(&make_node("n1"), &assignments, &index);

        assert_eq!(allocated.get("bandwidth_gbps"), Some(Quantity::Float(3.5)));
    }

    #[test]
    fn available_subtracts_known_keys_only() {
        let available = available_resources(&vector([("cpu", 8), ("ram", 32)]), &vector([("cpu", 3)]));
        assert_eq!(available, vector([("cpu", 5), ("ram", 32)]));
    }

    #[test]
    fn fit_checks() {
        assert!(!can_fit_resources(&vector([("cpu", 4)]), &vector([("cpu", 3)])));
        assert!(can_fit_resources(&vector([("cpu", 2)]), &vector([("cpu", 4)])));
        assert!(!can_fit_resources(&vector([("gpu", 1)]), &vector([("cpu", 4)])));
        assert!(can_fit_resources(&ResourceVector::new(), &vector([("cpu", 4)])));
    }
}
