use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "rackwise",
    about = "rackwise: placement and capacity planning for server fleets",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find nodes that can take one more instance of a service.
    ///
    /// When no node fits, prints a purchase recommendation sized to the
    /// service's maximum spec. An infeasible plan is not an error.
    Plan(commands::plan::PlanArgs),
    /// Show total, allocated and available capacity per node
    Capacity(commands::capacity::CapacityArgs),
    /// Manage rackwise.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a rackwise.toml holding the default settings
    Init {
        #[arg(short, long, default_value = "rackwise.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rackwise=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => commands::plan::run(&args),
        Commands::Capacity(args) => commands::capacity::run(&args),
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => commands::config::init(&path, force),
        },
    }
}
