//! rov CLI
//!
//! Route origin validation (RFC 6483) with local SLURM overrides (RFC 8416).
//!
//! # Usage
//!
//! ```bash
//! rov --roas vrps.json --slurm local.slurm.json validate --asn AS65001 --prefix 10.0.0.0/24
//! rov --roas vrps.json validate --asn 65001 --prefix 10.0.0.0/24 --quick
//! rov --roas vrps.json batch --input routes.txt --format json
//! rov check-slurm local.slurm.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "rov")]
#[command(version)]
#[command(about = "Route origin validation with SLURM overrides", long_about = None)]
struct Cli {
    /// VRP export (JSON) holding the ROA set
    #[arg(long, env = "ROV_ROAS")]
    roas: Option<PathBuf>,

    /// SLURM file with local filters and assertions
    #[arg(long, env = "ROV_SLURM")]
    slurm: Option<PathBuf>,

    /// Output format
    #[arg(long, short, env = "ROV_FORMAT")]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short, env = "ROV_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one announcement
    Validate {
        /// Origin AS, `AS65001` or `65001`
        #[arg(long)]
        asn: String,
        /// Announced prefix in CIDR notation
        #[arg(long)]
        prefix: String,
        /// Exact matches only
        #[arg(long)]
        quick: bool,
    },
    /// Validate one `ASN PREFIX` pair per line
    Batch {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Parse a SLURM file and print its entry counts
    CheckSlurm { file: PathBuf },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with printed verdicts
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::Config::load(cli.profile.as_deref()).context("loading configuration")?;
    let format = cli.format.or(config.format).unwrap_or_default();
    let sources = commands::Sources {
        roas: cli.roas.or(config.roas),
        slurm: cli.slurm.or(config.slurm),
        store: config.store,
    };

    match cli.command {
        Commands::Validate { asn, prefix, quick } => {
            let validator = sources.validator()?;
            commands::validate::handle(&validator, &asn, &prefix, quick, format).await
        }
        Commands::Batch { input } => {
            let validator = sources.validator()?;
            commands::batch::handle(validator, &input, format).await
        }
        Commands::CheckSlurm { file } => commands::check_slurm::handle(&file, format),
    }
}
