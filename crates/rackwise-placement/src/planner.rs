//! Capacity planner: where a service can go, and what to buy when nowhere fits.
//!
//! For one request the planner walks every node in the snapshot:
//! 1. Filters by lifecycle state and the request's constraints
//! 2. Applies the service's placement rules (skipped when a node is pinned)
//! 3. Checks the minimum spec against available capacity and the buffer
//! 4. Scores survivors against the target utilization and ranks them
//!
//! When nothing survives, it recommends buying one node sized to the
//! service's maximum spec.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rackwise_core::{PlannerConfig, ResourceVector, SpecFieldTable};
use rackwise_state::{
    Node, NodeStatus, PlacementRules, SelectorOperator, Service, ServiceId, ServiceIndex, Snapshot,
    Tags,
};

use crate::error::{PlanError, PlanResult};
use crate::matcher::{PlacementViolation, check_placement, validate_rules};
use crate::report::node_capacity;
use crate::scorer::{
    DEFAULT_TARGET_UTILIZATION, fit_score, projected_utilization, rank_candidates,
};

/// Tag key an affinity selector uses to pin a node type.
const TYPE_LABEL: &str = "type";

/// A request to place one more instance of a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanRequest {
    pub service_id: ServiceId,
    #[serde(default)]
    pub constraints: PlanConstraints,
}

/// Optional hard constraints narrowing the candidate nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanConstraints {
    /// Only consider this node. Placement rules are not applied.
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Tags the node must carry with exactly these values.
    #[serde(default)]
    pub tags: Tags,
    /// Fraction of capacity that must stay free after placement.
    #[serde(default)]
    pub min_buffer_fraction: Option<f64>,
}

/// Result of a planning request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CapacityPlan {
    pub service_id: ServiceId,
    pub feasible: bool,
    /// Ranked best first.
    pub candidates: Vec<Candidate>,
    pub recommendations: Vec<Recommendation>,
    pub rejections: Vec<Rejection>,
    pub message: String,
}

/// A node that can take the service.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Candidate {
    pub node: Node,
    /// Range: up to 100.0, higher is better.
    pub score: f64,
    /// Mean utilization once the minimum spec is placed.
    pub projected_utilization: f64,
    /// Availability once the minimum spec is placed.
    pub available_after: ResourceVector,
    pub total: ResourceVector,
    pub allocated: ResourceVector,
}

/// A suggested purchase when no existing node fits.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub preferred_type: String,
    pub spec: ResourceVector,
    pub quantity: u32,
    pub rationale: String,
}

/// A node the planner ruled out, and why.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Rejection {
    pub node_id: String,
    #[serde(flatten)]
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    Inactive { status: NodeStatus },
    Constraint { detail: String },
    Placement { violation: PlacementViolation },
    /// Required keys the node lacks or cannot cover.
    InsufficientResources { short: Vec<String> },
    BufferExceeded { projected: f64, limit: f64 },
}

impl RejectReason {
    fn label(&self) -> &'static str {
        match self {
            RejectReason::Inactive { .. } => "inactive",
            RejectReason::Constraint { .. } => "constraint",
            RejectReason::Placement { .. } => "placement rules",
            RejectReason::InsufficientResources { .. } => "insufficient resources",
            RejectReason::BufferExceeded { .. } => "buffer exceeded",
        }
    }
}

/// Planner tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    /// Utilization the scorer aims for, within `[0, 1]`.
    pub target_utilization: f64,
    pub default_node_type: String,
    /// Buffer used when a request does not set one.
    pub default_min_buffer: Option<f64>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            target_utilization: DEFAULT_TARGET_UTILIZATION,
            default_node_type: "baremetal".to_string(),
            default_min_buffer: None,
        }
    }
}

impl From<&PlannerConfig> for PlannerSettings {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            target_utilization: config.target_utilization,
            default_node_type: config.default_node_type.clone(),
            default_min_buffer: config.default_min_buffer,
        }
    }
}

/// Plans placements against one immutable snapshot.
pub struct CapacityPlanner<'a> {
    snapshot: &'a Snapshot,
    fields: &'a SpecFieldTable,
    settings: PlannerSettings,
}

impl<'a> CapacityPlanner<'a> {
    pub fn new(snapshot: &'a Snapshot, fields: &'a SpecFieldTable) -> Self {
        Self {
            snapshot,
            fields,
            settings: PlannerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PlannerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Plan one placement of `request.service_id`.
    ///
    /// An unknown service or a fleet with no room is a normal result with
    /// `feasible == false`. Only malformed input is an error.
    pub fn plan(&self, request: &PlanRequest) -> PlanResult<CapacityPlan> {
        validate_target(self.settings.target_utilization)?;
        validate_constraints(&request.constraints)?;
        let buffer = request
            .constraints
            .min_buffer_fraction
            .or(self.settings.default_min_buffer);
        if let Some(buffer) = buffer {
            validate_buffer(buffer)?;
        }

        let Some(service) = self.snapshot.service(&request.service_id) else {
            debug!(service = %request.service_id, "service not found");
            return Ok(CapacityPlan {
                service_id: request.service_id.clone(),
                feasible: false,
                candidates: Vec::new(),
                recommendations: Vec::new(),
                rejections: Vec::new(),
                message: format!("service {} not found", request.service_id),
            });
        };
        validate_rules(&service.placement)?;

        let services = self.snapshot.service_index();
        let constraints = &request.constraints;
        let mut candidates = Vec::new();
        let mut rejections = Vec::new();

        for node in &self.snapshot.nodes {
            if constraints.node_id.as_ref().is_some_and(|id| *id != node.id) {
                continue;
            }

            let verdict = self.evaluate(service, node, constraints, buffer, &services);
            match verdict {
                Ok(candidate) => {
                    debug!(
                        node = %node.id,
                        score = candidate.score,
                        utilization = candidate.projected_utilization,
                        "candidate accepted"
                    );
                    candidates.push(candidate);
                }
                Err(reason) => {
                    debug!(node = %node.id, reason = reason.label(), "node rejected");
                    rejections.push(Rejection {
                        node_id: node.id.clone(),
                        reason,
                    });
                }
            }
        }

        rank_candidates(&mut candidates);

        if !candidates.is_empty() {
            info!(
                service = %service.id,
                candidates = candidates.len(),
                best = %candidates[0].node.id,
                "placement plan computed"
            );
            return Ok(CapacityPlan {
                service_id: service.id.clone(),
                feasible: true,
                message: format!(
                    "{} candidate node(s) for service {}",
                    candidates.len(),
                    service.id
                ),
                candidates,
                recommendations: Vec::new(),
                rejections,
            });
        }

        let recommendation = self.recommend(service, &rejections);
        warn!(
            service = %service.id,
            rejected = rejections.len(),
            preferred_type = %recommendation.preferred_type,
            "no feasible node, recommending purchase"
        );
        Ok(CapacityPlan {
            service_id: service.id.clone(),
            feasible: false,
            candidates: Vec::new(),
            recommendations: vec![recommendation],
            rejections,
            message: format!("no feasible node for service {}; purchase recommended", service.id),
        })
    }

    /// Evaluate one node, returning a scored candidate or the first reason
    /// it was ruled out.
    fn evaluate(
        &self,
        service: &Service,
        node: &Node,
        constraints: &PlanConstraints,
        buffer: Option<f64>,
        services: &ServiceIndex<'_>,
    ) -> Result<Candidate, RejectReason> {
        if !node.is_active() {
            return Err(RejectReason::Inactive {
                status: node.status,
            });
        }
        if let Some(detail) = constraint_mismatch(node, constraints) {
            return Err(RejectReason::Constraint { detail });
        }
        if constraints.node_id.is_none() {
            check_placement(service, node, &self.snapshot.assignments)
                .map_err(|violation| RejectReason::Placement { violation })?;
        }

        let capacity = node_capacity(self.snapshot, services, node, self.fields);

        let short = service.min_spec.shortfall(&capacity.available);
        if !short.is_empty() {
            return Err(RejectReason::InsufficientResources { short });
        }

        let projected = projected_utilization(&capacity.allocated, &service.min_spec, &capacity.total);
        if let Some(buffer) = buffer {
            let limit = 1.0 - buffer;
            if projected > limit {
                return Err(RejectReason::BufferExceeded { projected, limit });
            }
        }

        Ok(Candidate {
            node: node.clone(),
            score: fit_score(projected, self.settings.target_utilization),
            projected_utilization: projected,
            available_after: capacity.available.minus(&service.min_spec),
            total: capacity.total,
            allocated: capacity.allocated,
        })
    }

    fn recommend(&self, service: &Service, rejections: &[Rejection]) -> Recommendation {
        let preferred_type = pinned_node_type(&service.placement)
            .unwrap_or(&self.settings.default_node_type)
            .to_string();

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for rejection in rejections {
            *counts.entry(rejection.reason.label()).or_insert(0) += 1;
        }
        let rationale = if counts.is_empty() {
            format!("no node matches the constraints for {}", service.name)
        } else {
            let summary: Vec<String> = counts
                .iter()
                .map(|(label, n)| format!("{n} {label}"))
                .collect();
            format!(
                "no existing node can host {} ({}); buy one {preferred_type} node sized to its maximum spec",
                service.name,
                summary.join(", ")
            )
        };

        Recommendation {
            preferred_type,
            spec: service.max_spec.clone(),
            quantity: 1,
            rationale,
        }
    }
}

/// Node type pinned by an affinity selector, via `matchLabels` or a
/// single-value `In` expression on the `type` key.
fn pinned_node_type(rules: &PlacementRules) -> Option<&str> {
    rules.affinity.iter().find_map(|selector| {
        selector
            .match_labels
            .get(TYPE_LABEL)
            .map(String::as_str)
            .or_else(|| {
                selector
                    .match_expressions
                    .iter()
                    .find(|req| {
                        req.key == TYPE_LABEL
                            && req.operator == SelectorOperator::In
                            && req.values.len() == 1
                    })
                    .map(|req| req.values[0].as_str())
            })
    })
}

/// The first request constraint `node` fails, if any.
fn constraint_mismatch(node: &Node, constraints: &PlanConstraints) -> Option<String> {
    if let Some(provider) = &constraints.provider {
        if node.provider.as_ref() != Some(provider) {
            return Some(format!("provider is not {provider}"));
        }
    }
    if let Some(region) = &constraints.region {
        if node.region.as_ref() != Some(region) {
            return Some(format!("region is not {region}"));
        }
    }
    constraints
        .tags
        .iter()
        .find(|(k, v)| node.tags.get(*k) != Some(*v))
        .map(|(k, v)| format!("tag {k}={v} missing"))
}

fn validate_constraints(constraints: &PlanConstraints) -> PlanResult<()> {
    let named = [
        ("node_id", &constraints.node_id),
        ("provider", &constraints.provider),
        ("region", &constraints.region),
    ];
    for (name, value) in named {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(PlanError::InvalidInput(format!("{name} constraint must not be empty")));
        }
    }
    if constraints.tags.keys().any(|k| k.is_empty()) {
        return Err(PlanError::InvalidInput("tag constraint key must not be empty".to_string()));
    }
    if let Some(buffer) = constraints.min_buffer_fraction {
        validate_buffer(buffer)?;
    }
    Ok(())
}

fn validate_target(target: f64) -> PlanResult<()> {
    if target.is_finite() && (0.0..=1.0).contains(&target) {
        Ok(())
    } else {
        Err(PlanError::InvalidInput(format!(
            "target_utilization must be within [0, 1], got {target}"
        )))
    }
}

fn validate_buffer(buffer: f64) -> PlanResult<()> {
    if buffer.is_finite() && (0.0..1.0).contains(&buffer) {
        Ok(())
    } else {
        Err(PlanError::InvalidInput(format!(
            "min_buffer_fraction must be within [0, 1), got {buffer}"
        )))
    }
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
            provider: Some("hetzner".to_string()),
            region: Some("fsn1".to_string()),
            tags: Tags::new(),
            status: NodeStatus::Active,
        }
    }

    fn make_service(id: &str, min: ResourceVector, max: ResourceVector) -> Service {
        Service {
            id: id.to_string(),
            name: id.to_string(),
            min_spec: min,
            max_spec: max,
            placement: PlacementRules::default(),
        }
    }

    fn cpu_component() -> HardwareComponent {
        HardwareComponent {
            id: "cpu8".to_string(),
            category: ComponentCategory::Cpu,
            vendor: None,
            model: None,
            specs: [("cores".to_string(), serde_json::json!(8))].into_iter().collect(),
        }
    }

    fn install_cpu(node: &str, quantity: u32) -> InstalledComponent {
        InstalledComponent {
            id: format!("{node}-cpu"),
            node_id: node.to_string(),
            component_id: "cpu8".to_string(),
            quantity,
            slot: None,
            serial: None,
            raid_level: None,
            raid_group: None,
        }
    }

    /// Nodes n1 (8 cores) and n2 (16 cores); service `web` needs 2 cores.
    fn fleet() -> Snapshot {
        Snapshot {
            nodes: vec![make_node("n1"), make_node("n2")],
            components: vec![cpu_component()],
            installed: vec![install_cpu("n1", 1), install_cpu("n2", 2)],
            services: vec![make_service(
                "web",
                vector([("cores", 2)]),
                vector([("cores", 4)]),
            )],
            assignments: Vec::new(),
        }
    }

    fn request(service: &str) -> PlanRequest {
        PlanRequest {
            service_id: service.to_string(),
            constraints: PlanConstraints::default(),
        }
    }

    fn plan(snapshot: &Snapshot, req: &PlanRequest) -> CapacityPlan {
        let fields = SpecFieldTable::default();
        CapacityPlanner::new(snapshot, &fields).plan(req).unwrap()
    }

    #[test]
    fn unknown_service_is_infeasible_not_an_error() {
        let result = plan(&fleet(), &request("ghost"));
        assert!(!result.feasible);
        assert!(result.message.contains("not found"));
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn ranks_closest_to_target_first() {
        // n1: 2/8 = 0.25 → 60; n2: 2/16 = 0.125 → 47.5.
        let result = plan(&fleet(), &request("web"));

        assert!(result.feasible);
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(result.candidates[0].node.id, "n1");
        assert!((result.candidates[0].score - 60.0).abs() < 1e-9);
        assert_eq!(
            result.candidates[0].available_after.get("cores"),
            Some(Quantity::Int(6))
        );
    }

    #[test]
    fn skips_inactive_nodes() {
        let mut snap = fleet();
        snap.nodes[0].status = NodeStatus::Maintenance;

        let result = plan(&snap, &request("web"));

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].node.id, "n2");
        assert_eq!(
            result.rejections[0].reason,
            RejectReason::Inactive { status: NodeStatus::Maintenance }
        );
    }

    #[test]
    fn provider_region_and_tag_constraints_filter() {
        let mut snap = fleet();
        snap.nodes[1].region = Some("hel1".to_string());
        snap.nodes[1].tags.insert("disk".to_string(), "nvme".to_string());

        let mut req = request("web");
        req.constraints.region = Some("hel1".to_string());
        let result = plan(&snap, &req);
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].node.id, "n2");

        let mut req = request("web");
        req.constraints.tags.insert("disk".to_string(), "nvme".to_string());
        let result = plan(&snap, &req);
        assert_eq!(result.candidates.len(), 1);

        let mut req = request("web");
        req.constraints.provider = Some("ovh".to_string());
        let result = plan(&snap, &req);
        assert!(!result.feasible);
        assert!(matches!(result.rejections[0].reason, RejectReason::Constraint { .. }));
    }

    #[test]
    fn pinned_node_bypasses_placement_rules() {
        let mut snap = fleet();
        snap.services[0].placement.anti_affinity = vec![TagSelector::default()];

        let result = plan(&snap, &request("web"));
        assert!(!result.feasible);
        assert!(result
            .rejections
            .iter()
            .all(|r| matches!(r.reason, RejectReason::Placement { .. })));

        let mut req = request("web");
        req.constraints.node_id = Some("n2".to_string());
        let result = plan(&snap, &req);
        assert!(result.feasible);
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].node.id, "n2");
        assert!(result.rejections.is_empty());
    }

    #[test]
    fn insufficient_resources_lists_short_keys() {
        let mut snap = fleet();
        snap.services[0].min_spec = vector([("cores", 2), ("gpu", 1)]);

        let result = plan(&snap, &request("web"));

        assert!(!result.feasible);
        assert_eq!(
            result.rejections[0].reason,
            RejectReason::InsufficientResources { short: vec!["gpu".to_string()] }
        );
    }

    #[test]
    fn buffer_rejects_crowded_nodes() {
        let mut snap = fleet();
        // Six cores already allocated on n1: projected (6 + 2) / 8 = 1.0.
        snap.services.push(make_service("batch", ResourceVector::new(), vector([("cores", 6)])));
        snap.assignments.push(ServiceAssignment {
            service_id: "batch".to_string(),
            node_id: "n1".to_string(),
            quantity: None,
        });

        let mut req = request("web");
        req.constraints.min_buffer_fraction = Some(0.2);
        let result = plan(&snap, &req);

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].node.id, "n2");
        assert!(matches!(
            result.rejections[0].reason,
            RejectReason::BufferExceeded { limit, .. } if (limit - 0.8).abs() < 1e-9
        ));
    }

    #[test]
    fn default_buffer_applies_when_request_has_none() {
        let snap = fleet();
        let fields = SpecFieldTable::default();
        let settings = PlannerSettings {
            default_min_buffer: Some(0.8),
            ..Default::default()
        };

        // n1 projects 0.25 > 0.2; n2 projects 0.125.
        let result = CapacityPlanner::new(&snap, &fields)
            .with_settings(settings)
            .plan(&request("web"))
            .unwrap();

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].node.id, "n2");
    }

    #[test]
    fn request_buffer_overrides_default() {
        let snap = fleet();
        let fields = SpecFieldTable::default();
        let settings = PlannerSettings {
            default_min_buffer: Some(0.8),
            ..Default::default()
        };
        let mut req = request("web");
        req.constraints.min_buffer_fraction = Some(0.0);

        let result = CapacityPlanner::new(&snap, &fields)
            .with_settings(settings)
            .plan(&req)
            .unwrap();

        assert_eq!(result.candidates.len(), 2);
        assert!(result.rejections.is_empty());
    }

    #[test]
    fn zero_buffer_still_rejects_overcommitted_node() {
        let mut snap = fleet();
        // n1 gets 1 GiB of memory with 4 GiB already allocated. `web` asks
        // for cores only, so it fits, but n1 projects (0.25 + 4.0) / 2.
        snap.components.push(HardwareComponent {
            id: "dimm1g".to_string(),
            category: ComponentCategory::Ram,
            vendor: None,
            model: None,
            specs: [("capacity_gb".to_string(), serde_json::json!(1))].into_iter().collect(),
        });
        snap.installed.push(InstalledComponent {
            id: "n1-ram".to_string(),
            component_id: "dimm1g".to_string(),
            ..install_cpu("n1", 1)
        });
        snap.services.push(make_service("batch", ResourceVector::new(), vector([("memory", 4096)])));
        snap.assignments.push(ServiceAssignment {
            service_id: "batch".to_string(),
            node_id: "n1".to_string(),
            quantity: None,
        });

        let result = plan(&snap, &request("web"));
        assert_eq!(result.candidates.len(), 2);

        let mut req = request("web");
        req.constraints.min_buffer_fraction = Some(0.0);
        let result = plan(&snap, &req);

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].node.id, "n2");
        assert_eq!(result.rejections[0].node_id, "n1");
        assert!(matches!(
            result.rejections[0].reason,
            RejectReason::BufferExceeded { projected, limit }
                if (projected - 2.125).abs() < 1e-9 && limit == 1.0
        ));
    }

    #[test]
    fn target_utilization_outside_unit_range_is_an_error() {
        let snap = fleet();
        let fields = SpecFieldTable::default();

        for target in [1.5, -0.1, f64::NAN] {
            let settings = PlannerSettings {
                target_utilization: target,
                ..Default::default()
            };
            let err = CapacityPlanner::new(&snap, &fields)
                .with_settings(settings)
                .plan(&request("web"))
                .unwrap_err();
            assert!(matches!(err, PlanError::InvalidInput(ref msg) if msg.contains("target_utilization")));
        }
    }

    #[test]
    fn ties_rank_by_node_id() {
        let mut snap = fleet();
        snap.installed = vec![install_cpu("n2", 1), install_cpu("n1", 1)];
        snap.nodes.reverse();

        let result = plan(&snap, &request("web"));

        let order: Vec<&str> = result.candidates.iter().map(|c| c.node.id.as_str()).collect();
        assert_eq!(order, vec!["n1", "n2"]);
    }

    #[test]
    fn recommends_max_spec_when_nothing_fits() {
        let mut snap = fleet();
        snap.services[0].min_spec = vector([("cores", 64)]);

        let result = plan(&snap, &request("web"));

        assert!(!result.feasible);
        assert_eq!(result.recommendations.len(), 1);
        let rec = &result.recommendations[0];
        assert_eq!(rec.spec, vector([("cores", 4)]));
        assert_eq!(rec.quantity, 1);
        assert_eq!(rec.preferred_type, "baremetal");
        assert!(rec.rationale.contains("2 insufficient resources"));
    }

    #[test]
    fn recommendation_follows_pinned_type() {
        let mut snap = fleet();
        snap.services[0].placement.affinity = vec![TagSelector {
            match_labels: [("type".to_string(), "vps".to_string())].into_iter().collect(),
            match_expressions: Vec::new(),
        }];

        let result = plan(&snap, &request("web"));

        assert!(!result.feasible);
        assert_eq!(result.recommendations[0].preferred_type, "vps");
    }

    #[test]
    fn recommendation_reads_single_value_in_expression() {
        let rules = PlacementRules {
            affinity: vec![TagSelector {
                match_labels: Tags::new(),
                match_expressions: vec![SelectorRequirement {
                    key: "type".to_string(),
                    operator: SelectorOperator::In,
                    values: vec!["virtual".to_string()],
                }],
            }],
            ..Default::default()
        };
        assert_eq!(pinned_node_type(&rules), Some("virtual"));
    }

    #[test]
    fn invalid_buffer_is_an_error() {
        let snap = fleet();
        let fields = SpecFieldTable::default();
        let planner = CapacityPlanner::new(&snap, &fields);

        for bad in [1.0, -0.1, f64::NAN] {
            let mut req = request("web");
            req.constraints.min_buffer_fraction = Some(bad);
            assert!(matches!(planner.plan(&req), Err(PlanError::InvalidInput(_))));
        }
    }

    #[test]
    fn malformed_selector_is_an_error() {
        let mut snap = fleet();
        snap.services[0].placement.affinity = vec![TagSelector {
            match_labels: Tags::new(),
            match_expressions: vec![SelectorRequirement {
                key: "env".to_string(),
                operator: SelectorOperator::In,
                values: Vec::new(),
            }],
        }];
        let fields = SpecFieldTable::default();

        let result = CapacityPlanner::new(&snap, &fields).plan(&request("web"));
        assert!(matches!(result, Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn empty_constraint_strings_are_errors() {
        let snap = fleet();
        let fields = SpecFieldTable::default();
        let mut req = request("web");
        req.constraints.region = Some("  ".to_string());

        assert!(CapacityPlanner::new(&snap, &fields).plan(&req).is_err());
    }
}
