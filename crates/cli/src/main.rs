//! Platecheck CLI - Main Entry Point
//!
//! Command-line interface for the registration lookup harness:
//! candidate extraction, browser-driven verification and
//! reconciliation against a golden catalog.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{extract, probe, reconcile, run, verify};

/// Platecheck - registration lookup verification harness
#[derive(Parser)]
#[command(name = "platecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "platecheck.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine registration candidates from the corpus
    Extract(extract::ExtractArgs),

    /// Drive every candidate through the lookup surface
    Verify(verify::VerifyArgs),

    /// Compare recorded outcomes against the expected catalog
    Reconcile(reconcile::ReconcileArgs),

    /// Check that the lookup surface is reachable
    Probe(probe::ProbeArgs),

    /// Full pipeline: probe, extract, verify, reconcile
    Run(run::RunArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    // Exit 0 on success, 1 on a failed check, 2 on harness errors
    match dispatch(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    let config = platecheck_harness::HarnessConfig::load(&cli.config)?;

    match cli.command {
        Commands::Extract(args) => extract::execute(args, config).await,
        Commands::Verify(args) => verify::execute(args, config).await,
        Commands::Reconcile(args) => reconcile::execute(args, config).await,
        Commands::Probe(args) => probe::execute(args, config).await,
        Commands::Run(args) => run::execute(args, config).await,
    }
}
