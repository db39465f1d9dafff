//! rackwise.toml configuration parser.
//!
//! Holds the planner tunables and the spec field table used to read
//! vendor hardware specs. All sections are optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RackwiseConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub spec_fields: SpecFieldTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Utilization a placement should ideally leave the node at.
    pub target_utilization: f64,
    /// Node type suggested for purchases when affinity does not pin one.
    pub default_node_type: String,
    /// Headroom applied when a plan request does not ask for one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_min_buffer: Option<f64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            target_utilization: 0.65,
            default_node_type: "baremetal".to_string(),
            default_min_buffer: None,
        }
    }
}

/// A candidate spec field and the factor converting it to the base unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecField {
    pub name: String,
    #[serde(default = "unit", skip_serializing_if = "is_unit")]
    pub multiplier: f64,
}

fn unit() -> f64 {
    1.0
}

fn is_unit(m: &f64) -> bool {
    *m == 1.0
}

impl SpecField {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            multiplier: 1.0,
        }
    }

    pub fn scaled(name: &str, multiplier: f64) -> Self {
        Self {
            name: name.to_string(),
            multiplier,
        }
    }
}

/// Hardware attributes read from component spec maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecAttribute {
    CpuCores,
    Memory,
    Storage,
    Vram,
    NicSpeed,
}

impl SpecAttribute {
    pub fn label(&self) -> &'static str {
        match self {
            SpecAttribute::CpuCores => "cpu_cores",
            SpecAttribute::Memory => "memory",
            SpecAttribute::Storage => "storage",
            SpecAttribute::Vram => "vram",
            SpecAttribute::NicSpeed => "nic_speed",
        }
    }
}

/// Ordered candidate field names per attribute. First match wins.
///
/// Base units: memory and VRAM in MiB, storage in GB, NIC speed in Gbps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecFieldTable {
    pub cpu_cores: Vec<SpecField>,
    pub memory: Vec<SpecField>,
    pub storage: Vec<SpecField>,
    pub vram: Vec<SpecField>,
    pub nic_speed: Vec<SpecField>,
}

impl SpecFieldTable {
    pub fn fields(&self, attribute: SpecAttribute) -> &[SpecField] {
        match attribute {
            SpecAttribute::CpuCores => &self.cpu_cores,
            SpecAttribute::Memory => &self.memory,
            SpecAttribute::Storage => &self.storage,
            SpecAttribute::Vram => &self.vram,
            SpecAttribute::NicSpeed => &self.nic_speed,
        }
    }
}

impl Default for SpecFieldTable {
    fn default() -> Self {
        Self {
            cpu_cores: vec![
                SpecField::new("threads"),
                SpecField::new("thread_count"),
                SpecField::new("logical_cores"),
                SpecField::new("cores"),
                SpecField::new("core_count"),
                SpecField::new("vcpus"),
            ],
            memory: vec![
                SpecField::new("capacity_mb"),
                SpecField::new("size_mb"),
                SpecField::new("memory_mb"),
                SpecField::scaled("capacity_gb", 1024.0),
                SpecField::scaled("size_gb", 1024.0),
                SpecField::scaled("memory_gb", 1024.0),
                SpecField::new("capacity"),
                SpecField::new("size"),
            ],
            storage: vec![
                SpecField::new("capacity_gb"),
                SpecField::new("size_gb"),
                SpecField::scaled("capacity_tb", 1000.0),
                SpecField::scaled("size_tb", 1000.0),
                SpecField::new("capacity"),
                SpecField::new("size"),
            ],
            vram: vec![
                SpecField::new("vram_mb"),
                SpecField::new("memory_mb"),
                SpecField::scaled("vram_gb", 1024.0),
                SpecField::scaled("memory_gb", 1024.0),
                SpecField::new("vram"),
            ],
            nic_speed: vec![
                SpecField::new("speed_gbps"),
                SpecField::new("link_speed_gbps"),
                SpecField::new("port_speed_gbps"),
                SpecField::scaled("speed_mbps", 0.001),
                SpecField::new("speed"),
            ],
        }
    }
}

impl RackwiseConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: RackwiseConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The built-in configuration rendered as TOML.
    pub fn default_toml() -> anyhow::Result<String> {
        Self::default().to_toml_string()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let target = self.planner.target_utilization;
        if !(0.0..=1.0).contains(&target) {
            anyhow::bail!("planner.target_utilization must be within [0, 1], got {target}");
        }
        if let Some(buffer) = self.planner.default_min_buffer {
            if !(0.0..1.0).contains(&buffer) {
                anyhow::bail!("planner.default_min_buffer must be within [0, 1), got {buffer}");
            }
        }
        if self.planner.default_node_type.trim().is_empty() {
            anyhow::bail!("planner.default_node_type must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let config = RackwiseConfig::from_toml_str("").unwrap();
        assert_eq!(config, RackwiseConfig::default());
    }

    #[test]
    fn test_partial_planner_section() {
        let toml_str = r#"
[planner]
target_utilization = 0.5
"#;
        let config = RackwiseConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.planner.target_utilization, 0.5);
        assert_eq!(config.planner.default_node_type, "baremetal");
        assert_eq!(config.spec_fields, SpecFieldTable::default());
    }

    #[test]
    fn test_override_one_attribute() {
        let toml_str = r#"
[spec_fields]
memory = [{ name = "ram_gib", multiplier = 1024 }]
"#;
        let config = RackwiseConfig::from_toml_str(toml_str).unwrap();
        let memory = config.spec_fields.fields(SpecAttribute::Memory);
        assert_eq!(memory, &[SpecField::scaled("ram_gib", 1024.0)]);
        assert_eq!(
            config.spec_fields.cpu_cores,
            SpecFieldTable::default().cpu_cores
        );
    }

    #[test]
    fn test_rejects_out_of_range_target() {
        let err = RackwiseConfig::from_toml_str("[planner]\ntarget_utilization = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("target_utilization"));
    }

    #[test]
    fn test_rejects_full_buffer() {
        assert!(RackwiseConfig::from_toml_str("[planner]\ndefault_min_buffer = 1.0\n").is_err());
    }

    #[test]
    fn test_default_toml_round_trips() {
        let rendered = RackwiseConfig::default_toml().unwrap();
        assert!(rendered.contains("capacity_gb"));
        let parsed = RackwiseConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, RackwiseConfig::default());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rackwise.toml");
        std::fs::write(&path, "[planner]\ndefault_node_type = \"vps\"\n").unwrap();

        let config = RackwiseConfig::from_file(&path).unwrap();
        assert_eq!(config.planner.default_node_type, "vps");
    }
}
