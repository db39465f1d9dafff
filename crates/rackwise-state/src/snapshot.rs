//! Snapshot: one full, immutable export of the inventory.
//!
//! The storage layer produces a snapshot per planning request. Lookups
//! here are linear scans or short-lived indexes; a snapshot holds no
//! caches and is never mutated by the planner.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Services keyed by ID.
pub type ServiceIndex<'a> = HashMap<&'a str, &'a Service>;

/// Every entity a planning request needs, loaded in full.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub components: Vec<HardwareComponent>,
    #[serde(default)]
    pub installed: Vec<InstalledComponent>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub assignments: Vec<ServiceAssignment>,
}

impl Snapshot {
    /// Parse and validate a JSON snapshot.
    pub fn from_json_str(json: &str) -> StateResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(map_err!(Deserialize))?;
        snapshot.validate()?;
        debug!(
            nodes = snapshot.nodes.len(),
            components = snapshot.components.len(),
            installed = snapshot.installed.len(),
            services = snapshot.services.len(),
            assignments = snapshot.assignments.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Read, parse and validate a JSON snapshot file.
    pub fn from_json_file(path: &Path) -> StateResult<Self> {
        let content = std::fs::read_to_string(path).map_err(map_err!(Read))?;
        debug!(?path, bytes = content.len(), "snapshot file read");
        Self::from_json_str(&content)
    }

    /// Reject snapshots where two entities of one kind share an ID.
    ///
    /// Dangling references (assignments to unknown services, installed
    /// records for unknown components) are tolerated; the planner skips
    /// them.
    pub fn validate(&self) -> StateResult<()> {
        unique_ids("node", self.nodes.iter().map(|n| n.id.as_str()))?;
        unique_ids("component", self.components.iter().map(|c| c.id.as_str()))?;
        unique_ids("installed component", self.installed.iter().map(|r| r.id.as_str()))?;
        unique_ids("service", self.services.iter().map(|s| s.id.as_str()))?;
        Ok(())
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }

    pub fn component(&self, component_id: &str) -> Option<&HardwareComponent> {
        self.components.iter().find(|c| c.id == component_id)
    }

    pub fn service_index(&self) -> ServiceIndex<'_> {
        self.services.iter().map(|s| (s.id.as_str(), s)).collect()
    }

    pub fn active_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_active())
    }

    pub fn assignments_on<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a ServiceAssignment> + 'a {
        self.assignments.iter().filter(move |a| a.node_id == node_id)
    }

    pub fn installed_on<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a InstalledComponent> + 'a {
        self.installed.iter().filter(move |r| r.node_id == node_id)
    }
}

fn unique_ids<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> StateResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StateError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
