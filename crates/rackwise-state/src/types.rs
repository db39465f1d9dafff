//! Domain types for the rackwise inventory.
//!
//! These mirror the records kept by the storage layer: nodes, hardware
//! catalog entries, installed-component records, services and service
//! assignments. All types are serializable to/from JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rackwise_core::ResourceVector;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node.
pub type NodeId = String;

/// Unique identifier for a hardware catalog entry.
pub type ComponentId = String;

/// Unique identifier for a service (workload).
pub type ServiceId = String;

/// Node tags, key → value.
pub type Tags = BTreeMap<String, String>;

// ── Node ──────────────────────────────────────────────────────────

/// Kind of machine a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[serde(alias = "physical")]
    Baremetal,
    Vps,
    Virtual,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Baremetal => "baremetal",
            NodeType::Vps => "vps",
            NodeType::Virtual => "virtual",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a node. Only active nodes receive placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Active,
    Maintenance,
    Decommissioned,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeStatus::Active => "active",
            NodeStatus::Maintenance => "maintenance",
            NodeStatus::Decommissioned => "decommissioned",
        })
    }
}

/// A physical or virtual compute node.
///
/// Total capacity is not stored here. It is derived from the node's
/// installed components each time it is needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Arbitrary tags matched by placement selectors.
    #[serde(default)]
    pub tags: Tags,
    pub status: NodeStatus,
}

impl Node {
    pub fn is_active(&self) -> bool {
        self.status == NodeStatus::Active
    }
}

// ── Hardware ──────────────────────────────────────────────────────

/// Category of a hardware catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    Cpu,
    Ram,
    Storage,
    Gpu,
    Nic,
    #[serde(other)]
    Other,
}

/// A hardware catalog entry with vendor-specific specs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HardwareComponent {
    pub id: ComponentId,
    pub category: ComponentCategory,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Free-form spec fields. Names and units vary by vendor.
    #[serde(default)]
    pub specs: BTreeMap<String, serde_json::Value>,
}

/// RAID level of an installed storage record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RaidLevel {
    None,
    Raid0,
    Raid1,
    Raid5,
    Raid6,
    Raid10,
    /// A level name rackwise does not know; aggregated as plain capacity.
    Unrecognized(String),
}

impl RaidLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RaidLevel::None => "none",
            RaidLevel::Raid0 => "raid0",
            RaidLevel::Raid1 => "raid1",
            RaidLevel::Raid5 => "raid5",
            RaidLevel::Raid6 => "raid6",
            RaidLevel::Raid10 => "raid10",
            RaidLevel::Unrecognized(name) => name,
        }
    }
}

impl FromStr for RaidLevel {
    type Err = std::convert::Infallible;

    /// Case-insensitive; separators are ignored (`RAID-5`, `raid1+0`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' ' | '+'))
            .flat_map(char::to_lowercase)
            .collect();
        Ok(match normalized.as_str() {
            "" | "none" => RaidLevel::None,
            "raid0" => RaidLevel::Raid0,
            "raid1" => RaidLevel::Raid1,
            "raid5" => RaidLevel::Raid5,
            "raid6" => RaidLevel::Raid6,
            "raid10" => RaidLevel::Raid10,
            _ => RaidLevel::Unrecognized(s.to_string()),
        })
    }
}

impl From<String> for RaidLevel {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

impl From<RaidLevel> for String {
    fn from(level: RaidLevel) -> Self {
        level.as_str().to_string()
    }
}

/// A component installed in a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstalledComponent {
    pub id: String,
    pub node_id: NodeId,
    pub component_id: ComponentId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub raid_level: Option<RaidLevel>,
    /// Records sharing a group and level form one RAID array.
    #[serde(default)]
    pub raid_group: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl InstalledComponent {
    /// The (group, level) this record is striped into, if any.
    pub fn raid_membership(&self) -> Option<(&str, &RaidLevel)> {
        match (self.raid_group.as_deref(), self.raid_level.as_ref()) {
            (Some(group), Some(level)) if *level != RaidLevel::None => Some((group, level)),
            _ => None,
        }
    }
}

// ── Service ───────────────────────────────────────────────────────

/// A workload that can be placed on nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Resources that must be available for a placement.
    #[serde(default)]
    pub min_spec: ResourceVector,
    /// Resources charged per instance, and the size of suggested purchases.
    #[serde(default)]
    pub max_spec: ResourceVector,
    #[serde(default)]
    pub placement: PlacementRules,
}

/// Where a service may be placed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRules {
    /// Every selector must match the node's tags.
    #[serde(default)]
    pub affinity: Vec<TagSelector>,
    /// No selector may match the node's tags.
    #[serde(default)]
    pub anti_affinity: Vec<TagSelector>,
    /// Maximum instances of this service per node; 0 or unset means no limit.
    #[serde(default)]
    pub spread_max: Option<u32>,
}

/// Label selector over node tags. All clauses must pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagSelector {
    #[serde(default)]
    pub match_labels: Tags,
    #[serde(default)]
    pub match_expressions: Vec<SelectorRequirement>,
}

/// One expression clause of a [`TagSelector`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectorRequirement {
    pub key: String,
    pub operator: SelectorOperator,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

// ── Assignment ────────────────────────────────────────────────────

/// Instances of a service running on a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceAssignment {
    pub service_id: ServiceId,
    pub node_id: NodeId,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl ServiceAssignment {
    /// Instance count; unset or zero counts as one.
    pub fn instances(&self) -> u32 {
        match self.quantity {
            Some(q) if q > 0 => q,
            _ => 1,
        }
    }
}
