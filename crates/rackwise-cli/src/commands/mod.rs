pub mod capacity;
pub mod config;
pub mod plan;

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use tracing::debug;

use rackwise_core::{RackwiseConfig, ResourceVector};
use rackwise_state::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Load `rackwise.toml`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RackwiseConfig> {
    match path {
        Some(path) => RackwiseConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => {
            debug!("no config given, using defaults");
            Ok(RackwiseConfig::default())
        }
    }
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    Snapshot::from_json_file(path).with_context(|| format!("loading snapshot {}", path.display()))
}

/// Parse a `key=value` tag argument.
pub fn parse_tag(raw: &str) -> anyhow::Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        anyhow::bail!("tag must be key=value, got {raw:?}");
    };
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("tag key must not be empty in {raw:?}");
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// `cores=8 memory=16384`, or `-` for an empty vector.
pub fn format_vector(vector: &ResourceVector) -> String {
    if vector.is_empty() {
        return "-".to_string();
    }
    vector
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
