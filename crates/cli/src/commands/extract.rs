//! Candidate extraction command

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use platecheck_harness::extract;
use platecheck_harness::HarnessConfig;

#[derive(Args)]
pub struct ExtractArgs {
    /// Corpus directory to scan (overrides the configured path)
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Candidate table to write (overrides the configured path)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn execute(args: ExtractArgs, config: HarnessConfig) -> anyhow::Result<bool> {
    let corpus = args.corpus.unwrap_or(config.paths.corpus_dir);
    let output = args.output.unwrap_or(config.paths.candidates_file);

    let set = extract::extract_dir(&corpus)?;
    info!(
        "Extracted {} valid and {} invalid candidate(s) from {}",
        set.valid.len(),
        set.invalid.len(),
        corpus.display()
    );

    extract::write_candidates(&set, &output)?;
    info!("Candidate table written to {}", output.display());
    Ok(true)
}
