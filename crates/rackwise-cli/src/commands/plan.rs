use std::path::PathBuf;

use clap::Args;
use tracing::info;

use rackwise_placement::{
    CapacityPlan, CapacityPlanner, PlacementViolation, PlanConstraints, PlanRequest,
    PlannerSettings, RejectReason,
};

use super::{OutputFormat, format_vector, load_config, load_snapshot, parse_tag, percent};

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Inventory snapshot (JSON)
    #[arg(short, long)]
    pub snapshot: PathBuf,
    /// Service to place
    #[arg(long)]
    pub service: String,
    /// Only consider this node; its placement rules are not applied
    #[arg(long)]
    pub node: Option<String>,
    #[arg(long)]
    pub provider: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    /// Required node tag as key=value. Repeatable.
    #[arg(long = "tag", value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,
    /// Fraction of capacity that must stay free, in [0, 1)
    #[arg(long)]
    pub min_buffer: Option<f64>,
    /// Path to rackwise.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl PlanArgs {
    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            service_id: self.service.clone(),
            constraints: PlanConstraints {
                node_id: self.node.clone(),
                provider: self.provider.clone(),
                region: self.region.clone(),
                tags: self.tags.iter().cloned().collect(),
                min_buffer_fraction: self.min_buffer,
            },
        }
    }
}

pub fn run(args: &PlanArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let snapshot = load_snapshot(&args.snapshot)?;

    let plan = CapacityPlanner::new(&snapshot, &config.spec_fields)
        .with_settings(PlannerSettings::from(&config.planner))
        .plan(&args.to_request())?;
    info!(service = %plan.service_id, feasible = plan.feasible, "plan finished");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => print!("{}", format_plan(&plan)),
    }
    Ok(())
}

pub fn format_plan(plan: &CapacityPlan) -> String {
    let mut out = String::new();

    out.push_str(&format!("Service:  {}\n", plan.service_id));
    out.push_str(&format!(
        "Feasible: {}\n",
        if plan.feasible { "yes" } else { "no" }
    ));
    out.push_str(&format!("{}\n", plan.message));

    if !plan.candidates.is_empty() {
        out.push_str("\nCandidates:\n");
        for (i, c) in plan.candidates.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} ({})  score {:.1}  utilization {}\n",
                i + 1,
                c.node.id,
                c.node.node_type,
                c.score,
                percent(c.projected_utilization)
            ));
            out.push_str(&format!("     available after: {}\n", format_vector(&c.available_after)));
        }
    }

    if !plan.recommendations.is_empty() {
        out.push_str("\nRecommended purchase:\n");
        for r in &plan.recommendations {
            out.push_str(&format!(
                "  • {} × {}: {}\n",
                r.quantity,
                r.preferred_type,
                format_vector(&r.spec)
            ));
            out.push_str(&format!("    {}\n", r.rationale));
        }
    }

    if !plan.rejections.is_empty() {
        out.push_str("\nRejected:\n");
        for r in &plan.rejections {
            out.push_str(&format!("  • {}: {}\n", r.node_id, describe(&r.reason)));
        }
    }

    out
}

fn describe(reason: &RejectReason) -> String {
    match reason {
        RejectReason::Inactive { status } => format!("node is {status}"),
        RejectReason::Constraint { detail } => detail.clone(),
        RejectReason::Placement { violation } => match violation {
            PlacementViolation::Affinity { index } => {
                format!("affinity selector {index} does not match")
            }
            PlacementViolation::AntiAffinity { index } => {
                format!("anti-affinity selector {index} matches")
            }
            PlacementViolation::Spread { limit, current } => {
                format!("spread limit {limit} reached ({current} running)")
            }
        },
        RejectReason::InsufficientResources { short } => {
            format!("insufficient {}", short.join(", "))
        }
        RejectReason::BufferExceeded { projected, limit } => format!(
            "projected utilization {} exceeds {}",
            percent(*projected),
            percent(*limit)
        ),
    }
}
