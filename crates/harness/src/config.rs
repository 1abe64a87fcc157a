//! Harness configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::HarnessResult;
use crate::session::Backend;

/// Top-level configuration, loaded from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub browser: BrowserConfig,
    pub urls: UrlConfig,
    pub paths: PathConfig,
    pub verify: VerifyConfig,
}

/// Browser backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Backend family: chromium, firefox or webkit
    pub backend: Backend,

    /// Run without a visible window
    pub headless: bool,

    /// Element lookup timeout applied inside the browser, in milliseconds.
    /// Distinct from the explicit race deadline.
    pub implicit_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Chromium,
            headless: true,
            implicit_timeout_ms: 2_000,
        }
    }
}

/// Addresses of the lookup surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Entry form
    pub entry: String,

    /// Report page
    pub report: String,

    /// URL substring that marks a navigation to the report
    pub report_marker: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            entry: "https://car-checking.com/".to_string(),
            report: "https://car-checking.com/report".to_string(),
            report_marker: "report".to_string(),
        }
    }
}

/// File locations used across a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory scanned for corpus files
    pub corpus_dir: PathBuf,

    /// Candidate table produced by extraction
    pub candidates_file: PathBuf,

    /// Record file produced by verification
    pub output_file: PathBuf,

    /// Golden expected-output file
    pub expected_file: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("data/corpus"),
            candidates_file: PathBuf::from("data/cleaned_test_data.txt"),
            output_file: PathBuf::from("data/car_output.txt"),
            expected_file: PathBuf::from("data/expected_output.txt"),
        }
    }
}

/// Verification loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Deadline for the outcome race, in milliseconds
    pub race_timeout_ms: u64,

    /// Delay between outcome polls, in milliseconds
    pub poll_interval_ms: u64,

    /// Probe the surface before a full pipeline run
    pub probe_first: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            race_timeout_ms: 2_000,
            poll_interval_ms: 100,
            probe_first: true,
        }
    }
}

impl VerifyConfig {
    pub fn race_timeout(&self) -> Duration {
        Duration::from_millis(self.race_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl HarnessConfig {
    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> HarnessResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the configuration out as TOML.
    pub fn save(&self, path: &Path) -> HarnessResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
