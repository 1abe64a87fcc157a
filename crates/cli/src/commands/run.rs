//! Full pipeline command

use clap::Args;
use tracing::warn;

use platecheck_harness::HarnessConfig;

use super::{extract, probe, reconcile, verify};

#[derive(Args)]
pub struct RunArgs {
    /// Browser backend (chromium, firefox, webkit)
    #[arg(long)]
    pub browser: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    pub headed: bool,

    /// Skip the availability probe
    #[arg(long)]
    pub no_probe: bool,
}

pub async fn execute(args: RunArgs, config: HarnessConfig) -> anyhow::Result<bool> {
    if config.verify.probe_first && !args.no_probe {
        if !probe::execute(probe::ProbeArgs {}, config.clone()).await? {
            warn!("Surface probe failed, aborting the run");
            return Ok(false);
        }
    }

    let extracted = extract::execute(
        extract::ExtractArgs {
            corpus: None,
            output: None,
        },
        config.clone(),
    )
    .await?;
    if !extracted {
        return Ok(false);
    }

    let verified = verify::execute(
        verify::VerifyArgs {
            browser: args.browser,
            headed: args.headed,
            summary_out: None,
        },
        config.clone(),
    )
    .await?;
    if !verified {
        return Ok(false);
    }

    reconcile::execute(
        reconcile::ReconcileArgs {
            expected: None,
            actual: None,
        },
        config,
    )
    .await
}
