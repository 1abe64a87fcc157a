//! Browser verification command

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use platecheck_harness::extract::load_candidates;
use platecheck_harness::record::RecordStore;
use platecheck_harness::{HarnessConfig, SessionManager, Verifier};

#[derive(Args)]
pub struct VerifyArgs {
    /// Browser backend (chromium, firefox, webkit)
    #[arg(long)]
    pub browser: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    pub headed: bool,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub summary_out: Option<PathBuf>,
}

pub async fn execute(args: VerifyArgs, mut config: HarnessConfig) -> anyhow::Result<bool> {
    if let Some(browser) = &args.browser {
        config.browser.backend = browser.parse()?;
    }
    if args.headed {
        config.browser.headless = false;
    }

    let candidates = load_candidates(&config.paths.candidates_file)?;
    info!(
        "Loaded {} candidate(s) from {}",
        candidates.len(),
        config.paths.candidates_file.display()
    );

    let store = RecordStore::new(&config.paths.output_file);
    store.init()?;

    let mut manager = SessionManager::new(config.browser.clone());
    manager.acquire().await?;

    let verifier = Verifier::new(&config);
    // Release the browser before surfacing any verification error
    let result = verifier
        .verify_all(manager.session()?, &candidates, &store)
        .await;
    manager.release().await?;
    let summary = result?;

    if let Some(path) = &args.summary_out {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!("Summary written to {}", path.display());
    }

    Ok(true)
}
