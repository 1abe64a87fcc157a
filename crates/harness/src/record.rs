//! Output record file for verification outcomes

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::HarnessResult;

/// First line of the record file.
pub const RECORD_HEADER: &str = "VARIANT_REG,MAKE,MODEL,YEAR";

/// Append-only store for verification records.
///
/// The file is opened and closed around every append; a crash mid-run
/// leaves every record produced so far on disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reset the store to a bare header, truncating any previous contents.
    pub fn init(&self) -> HarnessResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, format!("{}\n", RECORD_HEADER))?;
        Ok(())
    }

    /// Append one record line. The store must have been initialized first.
    pub fn append(&self, line: &str) -> HarnessResult<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        debug!("Recorded: {}", line);
        Ok(())
    }

    /// Read the store back as lines, header included.
    pub fn read_lines(&self) -> HarnessResult<Vec<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content.lines().map(str::to_string).collect())
    }
}
