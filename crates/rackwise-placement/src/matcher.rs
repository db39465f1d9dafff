//! Placement rule evaluation: tag selectors and per-node spread limits.

use serde::Serialize;

use rackwise_state::{
    Node, PlacementRules, SelectorOperator, SelectorRequirement, Service, ServiceAssignment,
    Tags, TagSelector,
};

use crate::error::{PlanError, PlanResult};

/// Why a service's placement rules reject a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PlacementViolation {
    /// The affinity selector at `index` does not match.
    Affinity { index: usize },
    /// The anti-affinity selector at `index` matches.
    AntiAffinity { index: usize },
    /// The node already runs `current` instances against a limit of `limit`.
    Spread { limit: u32, current: u32 },
}

/// True if every label and expression of `selector` holds for `tags`.
pub fn selector_matches(selector: &TagSelector, tags: &Tags) -> bool {
    let labels_ok = selector
        .match_labels
        .iter()
        .all(|(k, v)| tags.get(k).is_some_and(|tv| tv == v));

    labels_ok
        && selector
            .match_expressions
            .iter()
            .all(|req| requirement_matches(req, tags))
}

fn requirement_matches(req: &SelectorRequirement, tags: &Tags) -> bool {
    let value = tags.get(&req.key);
    match req.operator {
        SelectorOperator::Exists => value.is_some(),
        SelectorOperator::DoesNotExist => value.is_none(),
        SelectorOperator::In => value.is_some_and(|v| req.values.contains(v)),
        SelectorOperator::NotIn => value.is_none_or(|v| !req.values.contains(v)),
    }
}

/// Reject selectors whose expressions cannot be evaluated meaningfully.
pub fn validate_selector(selector: &TagSelector) -> PlanResult<()> {
    if selector.match_labels.keys().any(|k| k.is_empty()) {
        return Err(PlanError::InvalidInput("matchLabels key must not be empty".to_string()));
    }
    for req in &selector.match_expressions {
        if req.key.is_empty() {
            return Err(PlanError::InvalidInput(
                "matchExpressions key must not be empty".to_string(),
            ));
        }
        match req.operator {
            SelectorOperator::In | SelectorOperator::NotIn if req.values.is_empty() => {
                return Err(PlanError::InvalidInput(format!(
                    "{:?} on key {} requires at least one value",
                    req.operator, req.key
                )));
            }
            SelectorOperator::Exists | SelectorOperator::DoesNotExist if !req.values.is_empty() => {
                return Err(PlanError::InvalidInput(format!(
                    "{:?} on key {} takes no values",
                    req.operator, req.key
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validate every selector in a service's placement rules.
pub fn validate_rules(rules: &PlacementRules) -> PlanResult<()> {
    rules
        .affinity
        .iter()
        .chain(&rules.anti_affinity)
        .try_for_each(validate_selector)
}

/// Instances of `service_id` already assigned to `node_id`.
pub fn instances_on(service_id: &str, node_id: &str, assignments: &[ServiceAssignment]) -> u32 {
    assignments
        .iter()
        .filter(|a| a.service_id == service_id && a.node_id == node_id)
        .map(ServiceAssignment::instances)
        .fold(0u32, u32::saturating_add)
}

/// Check a service's placement rules against a node.
pub fn check_placement(
    service: &Service,
    node: &Node,
    assignments: &[ServiceAssignment],
) -> Result<(), PlacementViolation> {
    let rules = &service.placement;

    if let Some(index) = rules
        .affinity
        .iter()
        .position(|sel| !selector_matches(sel, &node.tags))
    {
        return Err(PlacementViolation::Affinity { index });
    }

    if let Some(index) = rules
        .anti_affinity
        .iter()
        .position(|sel| selector_matches(sel, &node.tags))
    {
        return Err(PlacementViolation::AntiAffinity { index });
    }

    if let Some(limit) = rules.spread_max.filter(|&l| l > 0) {
        let current = instances_on(&service.id, &node.id, assignments);
        if current >= limit {
            return Err(PlacementViolation::Spread { limit, current });
        }
    }

    Ok(())
}

/// True if `service` may be placed on `node` given existing assignments.
pub fn can_place_on(service: &Service, node: &Node, assignments: &[ServiceAssignment]) -> bool {
    check_placement(service, node, assignments).is_ok()
}
