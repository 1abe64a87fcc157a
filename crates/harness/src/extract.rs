//! Candidate extraction from raw text corpora
//!
//! Scans a directory of input files for registration-shaped tokens and
//! splits them into well-formed plates and everything else worth probing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{HarnessError, HarnessResult};

/// Message recorded for candidates the surface is expected to turn away.
pub const REJECTION_MESSAGE: &str = "The license plate number is not recognised";

/// First line of the candidate table.
pub const CANDIDATE_HEADER: &str = "VARIANT_REG,STATUS";

/// Corpus files must carry this marker in their name to be scanned.
const INPUT_MARKER: &str = "_input";

/// Current-format UK plate: two letters, two digits, a space, three letters.
/// Word boundaries are ASCII on both patterns, so an accented letter ends a
/// token rather than extending it.
static VALID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)\b[A-Z]{2}[0-9]{2} [A-Z]{3}\b").expect("valid plate pattern"));

/// Any short run of capitals and digits standing alone as a word.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)\b[A-Z0-9]{1,7}\b").expect("candidate token pattern"));

/// How a candidate is expected to fare against the lookup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatus {
    Valid,
    Invalid,
}

/// One registration candidate from the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub reg: String,
    pub status: CandidateStatus,
}

/// Candidates mined from a corpus, split by expected outcome.
///
/// Both lists preserve first-occurrence order across the scanned files.
#[derive(Debug, Default)]
pub struct CandidateSet {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

/// Scan every corpus file directly under `corpus` and mine candidates.
///
/// Only regular files whose name contains `_input` and ends in `.txt`
/// take part. Files are visited in name order so repeated runs over the
/// same corpus produce the same table.
pub fn extract_dir(corpus: &Path) -> HarnessResult<CandidateSet> {
    if !corpus.is_dir() {
        return Err(HarnessError::InvalidConfig(format!(
            "corpus directory not found: {}",
            corpus.display()
        )));
    }

    let mut raw = CandidateSet::default();
    let mut scanned = 0usize;

    for entry in walkdir::WalkDir::new(corpus)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.contains(INPUT_MARKER) || !name.ends_with(".txt") {
            continue;
        }

        debug!("Scanning corpus file {}", entry.path().display());
        let content = fs::read_to_string(entry.path())?;
        for line in content.lines() {
            classify_line(line, &mut raw);
        }
        scanned += 1;
    }

    info!(
        "Scanned {} corpus file(s) under {}",
        scanned,
        corpus.display()
    );
    Ok(dedup(raw))
}

/// Pull every candidate out of one line of corpus text.
fn classify_line(line: &str, out: &mut CandidateSet) {
    for m in VALID_RE.find_iter(line) {
        out.valid.push(m.as_str().to_string());
    }
    for m in TOKEN_RE.find_iter(line) {
        // A token that begins a full plate match belongs to the valid list.
        if begins_valid_plate(line, m.start()) {
            continue;
        }
        out.invalid.push(m.as_str().to_string());
    }
}

/// True when a full plate match starts exactly at `pos`.
///
/// The token pattern stops at word boundaries, so the letter block of a
/// plate would otherwise surface again as its own invalid candidate.
fn begins_valid_plate(line: &str, pos: usize) -> bool {
    VALID_RE
        .find_at(line, pos)
        .map_or(false, |m| m.start() == pos)
}

/// Drop repeats, keeping the first occurrence, and keep the lists disjoint.
///
/// A registration seen as valid anywhere never also appears as invalid.
fn dedup(raw: CandidateSet) -> CandidateSet {
    let mut seen_valid = HashSet::new();
    let mut valid = Vec::new();
    for reg in raw.valid {
        if seen_valid.insert(reg.clone()) {
            valid.push(reg);
        }
    }

    let mut seen_invalid = HashSet::new();
    let mut invalid = Vec::new();
    for reg in raw.invalid {
        if seen_valid.contains(&reg) {
            continue;
        }
        if seen_invalid.insert(reg.clone()) {
            invalid.push(reg);
        }
    }

    CandidateSet { valid, invalid }
}

/// Write the candidate table: header, valid rows, then invalid rows.
pub fn write_candidates(set: &CandidateSet, path: &Path) -> HarnessResult<()> {
    let mut table = String::new();
    table.push_str(CANDIDATE_HEADER);
    table.push('\n');
    for reg in &set.valid {
        table.push_str(&format!("{},VALID\n", reg));
    }
    for reg in &set.invalid {
        table.push_str(&format!("{},{}\n", reg, REJECTION_MESSAGE));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, table)?;
    Ok(())
}

/// Read a candidate table back, skipping the header and blank lines.
pub fn load_candidates(path: &Path) -> HarnessResult<Vec<Candidate>> {
    let content = fs::read_to_string(path)
        .map_err(|e| HarnessError::CandidateFile(format!("{}: {}", path.display(), e)))?;

    let mut candidates = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if idx == 0 || line.trim().is_empty() {
            continue;
        }
        let (reg, status) = line.split_once(',').ok_or_else(|| {
            HarnessError::CandidateFile(format!(
                "{}: line {} has no status field",
                path.display(),
                idx + 1
            ))
        })?;
        let status = if status == "VALID" {
            CandidateStatus::Valid
        } else {
            CandidateStatus::Invalid
        };
        candidates.push(Candidate {
            reg: reg.to_string(),
            status,
        });
    }
    Ok(candidates)
}
