use std::path::PathBuf;

use clap::Args;

use rackwise_placement::{NodeCapacity, capacity_report};

use super::{OutputFormat, format_vector, load_config, load_snapshot, percent};

#[derive(Debug, Args)]
pub struct CapacityArgs {
    /// Inventory snapshot (JSON)
    #[arg(short, long)]
    pub snapshot: PathBuf,
    /// Report a single node
    #[arg(long)]
    pub node: Option<String>,
    /// Path to rackwise.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: &CapacityArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let snapshot = load_snapshot(&args.snapshot)?;

    let mut report = capacity_report(&snapshot, &config.spec_fields);
    if let Some(node) = &args.node {
        report.retain(|n| &n.node_id == node);
        if report.is_empty() {
            anyhow::bail!("node {node} not found in snapshot");
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", format_capacity(&report)),
    }
    Ok(())
}

pub fn format_capacity(report: &[NodeCapacity]) -> String {
    let mut out = String::new();

    for node in report {
        out.push_str(&format!(
            "{} ({})  {}  utilization {}\n",
            node.node_id,
            node.name,
            node.status,
            percent(node.utilization)
        ));
        out.push_str(&format!("  total:     {}\n", format_vector(&node.total)));
        out.push_str(&format!("  allocated: {}\n", format_vector(&node.allocated)));
        out.push_str(&format!("  available: {}\n", format_vector(&node.available)));
        for diagnostic in &node.diagnostics {
            out.push_str(&format!("  ⚠️  {diagnostic}\n"));
        }
        out.push('\n');
    }

    let diagnostics: usize = report.iter().map(|n| n.diagnostics.len()).sum();
    out.push_str(&format!("{} node(s), {diagnostics} diagnostic(s)\n", report.len()));
    out
}
