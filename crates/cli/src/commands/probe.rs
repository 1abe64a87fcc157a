//! Surface availability probe command

use clap::Args;
use tracing::{error, info};

use platecheck_harness::session::probe_surface;
use platecheck_harness::{HarnessConfig, HarnessError};

#[derive(Args)]
pub struct ProbeArgs {}

pub async fn execute(_args: ProbeArgs, config: HarnessConfig) -> anyhow::Result<bool> {
    match probe_surface(&config.urls.entry, config.verify.race_timeout()).await {
        Ok(()) => {
            info!("{} is reachable", config.urls.entry);
            Ok(true)
        }
        Err(e @ HarnessError::SurfaceUnreachable(_)) => {
            error!("{}", e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
