//! Hardware aggregation: a node's total capacity from its installed
//! components.
//!
//! Vendor specs are read through the [`SpecFieldTable`]: for each
//! attribute the candidate field names are tried in order and the first
//! one holding a number wins. Anything that cannot be read contributes
//! zero and is reported as a [`SpecDiagnostic`] instead of failing.
//!
//! | category | keys written                 |
//! |----------|------------------------------|
//! | cpu      | `cores`                      |
//! | ram      | `memory` (MiB)               |
//! | storage  | `nvme` (GB, RAID-aware)      |
//! | gpu      | `gpu`, `vram` (MiB)          |
//! | nic      | `bandwidth_gbps`             |

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use rackwise_core::{Quantity, ResourceVector, SpecAttribute, SpecFieldTable, keys};
use rackwise_state::{
    ComponentCategory, HardwareComponent, InstalledComponent, NodeId, RaidLevel,
};

use crate::raid::raid_capacity;

/// Leading number of a spec string such as `"3.2 GHz"` or `"25Gbps"`.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)").expect("static regex")
});

/// A node's aggregated capacity plus everything that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub resources: ResourceVector,
    pub diagnostics: Vec<SpecDiagnostic>,
}

/// A hardware record that contributed less than it may have.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDiagnostic {
    pub node_id: NodeId,
    pub installed_id: String,
    pub component_id: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The installed record points at a component missing from the catalog.
    MissingComponent,
    /// The component's category has no resource mapping.
    UnsupportedCategory { category: ComponentCategory },
    /// None of the candidate fields for the attribute were present.
    MissingField { attribute: SpecAttribute },
    /// A candidate field was present but did not hold a number.
    Unparsable {
        attribute: SpecAttribute,
        field: String,
        raw: String,
    },
}

impl fmt::Display for SpecDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): ", self.installed_id, self.component_id)?;
        match &self.kind {
            DiagnosticKind::MissingComponent => write!(f, "component not in catalog"),
            DiagnosticKind::UnsupportedCategory { category } => {
                write!(f, "category {category:?} is not counted")
            }
            DiagnosticKind::MissingField { attribute } => {
                write!(f, "no {} field found", attribute.label())
            }
            DiagnosticKind::Unparsable { attribute, field, raw } => {
                write!(f, "{} field {field} is not numeric: {raw}", attribute.label())
            }
        }
    }
}

/// Sum a node's installed components into its total resource vector.
///
/// Skipped fields are dropped silently; use [`aggregate_with_diagnostics`]
/// to see them.
pub fn aggregate_resources(
    components: &[HardwareComponent],
    installed: &[InstalledComponent],
    node_id: &str,
    fields: &SpecFieldTable,
) -> ResourceVector {
    aggregate_with_diagnostics(components, installed, node_id, fields).resources
}

/// Like [`aggregate_resources`], also returning what could not be read.
pub fn aggregate_with_diagnostics(
    components: &[HardwareComponent],
    installed: &[InstalledComponent],
    node_id: &str,
    fields: &SpecFieldTable,
) -> Aggregation {
    let catalog: HashMap<&str, &HardwareComponent> =
        components.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut agg = Aggregator {
        node_id,
        fields,
        out: Aggregation::default(),
    };
    let mut arrays: Vec<RaidArray<'_>> = Vec::new();

    for record in installed.iter().filter(|r| r.node_id == node_id) {
        let Some(component) = catalog.get(record.component_id.as_str()) else {
            agg.note(record, DiagnosticKind::MissingComponent);
            continue;
        };

        match component.category {
            ComponentCategory::Cpu => {
                agg.add_per_unit(record, component, SpecAttribute::CpuCores, keys::CORES);
            }
            ComponentCategory::Ram => {
                agg.add_per_unit(record, component, SpecAttribute::Memory, keys::MEMORY);
            }
            ComponentCategory::Gpu => {
                agg.out.resources.add(keys::GPU, Quantity::from(record.quantity));
                agg.add_per_unit(record, component, SpecAttribute::Vram, keys::VRAM);
            }
            ComponentCategory::Nic => {
                agg.add_per_unit(record, component, SpecAttribute::NicSpeed, keys::BANDWIDTH_GBPS);
            }
            ComponentCategory::Storage => {
                agg.out.resources.ensure(keys::NVME);
                let Some(size) = agg.read(record, component, SpecAttribute::Storage) else {
                    continue;
                };
                match record.raid_membership() {
                    Some((group, level)) => {
                        match arrays.iter_mut().find(|a| a.group == group && a.level == level) {
                            Some(array) => array.disks.push((size, record.quantity)),
                            None => arrays.push(RaidArray {
                                group,
                                level,
                                disks: vec![(size, record.quantity)],
                            }),
                        }
                    }
                    None => agg.out.resources.add(keys::NVME, size.times(record.quantity)),
                }
            }
            ComponentCategory::Other => {
                agg.note(
                    record,
                    DiagnosticKind::UnsupportedCategory {
                        category: component.category,
                    },
                );
            }
        }
    }

    for array in &arrays {
        let capacity = raid_capacity(&array.disks, array.level);
        debug!(
            node = node_id,
            group = array.group,
            level = array.level.as_str(),
            disks = array.disks.len(),
            %capacity,
            "raid group aggregated"
        );
        agg.out.resources.add(keys::NVME, capacity);
    }

    agg.out
}

/// Storage records sharing a RAID group and level.
struct RaidArray<'a> {
    group: &'a str,
    level: &'a RaidLevel,
    disks: Vec<(Quantity, u32)>,
}

struct Aggregator<'a> {
    node_id: &'a str,
    fields: &'a SpecFieldTable,
    out: Aggregation,
}

impl Aggregator<'_> {
    /// Add `quantity × per-unit value` of `attribute` under `key`.
    ///
    /// The key is written even when the value cannot be read.
    fn add_per_unit(
        &mut self,
        record: &InstalledComponent,
        component: &HardwareComponent,
        attribute: SpecAttribute,
        key: &str,
    ) {
        self.out.resources.ensure(key);
        if let Some(per_unit) = self.read(record, component, attribute) {
            self.out.resources.add(key, per_unit.times(record.quantity));
        }
    }

    /// Read one attribute in base units, noting every field that failed.
    fn read(
        &mut self,
        record: &InstalledComponent,
        component: &HardwareComponent,
        attribute: SpecAttribute,
    ) -> Option<Quantity> {
        let (value, problems) = lookup(&component.specs, self.fields, attribute);
        for kind in problems {
            self.note(record, kind);
        }
        value
    }

    fn note(&mut self, record: &InstalledComponent, kind: DiagnosticKind) {
        let diagnostic = SpecDiagnostic {
            node_id: self.node_id.to_string(),
            installed_id: record.id.clone(),
            component_id: record.component_id.clone(),
            kind,
        };
        debug!(node = self.node_id, %diagnostic, "hardware spec skipped");
        self.out.diagnostics.push(diagnostic);
    }
}

/// Try the candidate fields for `attribute` in priority order.
fn lookup(
    specs: &BTreeMap<String, serde_json::Value>,
    fields: &SpecFieldTable,
    attribute: SpecAttribute,
) -> (Option<Quantity>, Vec<DiagnosticKind>) {
    let mut problems = Vec::new();
    let mut present = false;

    for field in fields.fields(attribute) {
        let Some(raw) = specs.get(&field.name) else {
            continue;
        };
        present = true;
        match parse_spec_value(raw) {
            Some(value) => return (Some(value.scale(field.multiplier)), problems),
            None => problems.push(DiagnosticKind::Unparsable {
                attribute,
                field: field.name.clone(),
                raw: raw.to_string(),
            }),
        }
    }

    if !present {
        problems.push(DiagnosticKind::MissingField { attribute });
    }
    (None, problems)
}

/// Numbers as-is; strings by their leading number. Anything else is `None`.
pub fn parse_spec_value(raw: &serde_json::Value) -> Option<Quantity> {
    match raw {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Quantity::Int)
            .or_else(|| n.as_u64().map(Quantity::from))
            .or_else(|| n.as_f64().map(Quantity::Float)),
        serde_json::Value::String(s) => {
            let digits = LEADING_NUMBER.captures(s)?.get(1)?.as_str();
            if digits.contains('.') {
                digits.parse::<f64>().ok().map(Quantity::Float)
            } else {
                digits.parse::<i64>().ok().map(Quantity::Int)
            }
        }
        _ => None,
    }
}
