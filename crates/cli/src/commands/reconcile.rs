//! Result reconciliation command

use clap::Args;
use std::path::PathBuf;
use tracing::error;

use platecheck_harness::reconcile::reconcile_files;
use platecheck_harness::{HarnessConfig, HarnessError};

#[derive(Args)]
pub struct ReconcileArgs {
    /// Golden expected-output file (overrides the configured path)
    #[arg(long)]
    pub expected: Option<PathBuf>,

    /// Record file to check (overrides the configured path)
    #[arg(long)]
    pub actual: Option<PathBuf>,
}

pub async fn execute(args: ReconcileArgs, config: HarnessConfig) -> anyhow::Result<bool> {
    let expected = args.expected.unwrap_or(config.paths.expected_file);
    let actual = args.actual.unwrap_or(config.paths.output_file);

    match reconcile_files(&expected, &actual) {
        Ok(()) => Ok(true),
        Err(
            e @ (HarnessError::LineCountMismatch { .. }
            | HarnessError::FieldCountMismatch { .. }
            | HarnessError::FieldMismatch { .. }),
        ) => {
            error!("{}", e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
