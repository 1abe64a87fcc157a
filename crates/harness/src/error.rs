//! Error types for the verification harness

use thiserror::Error;

/// Result type alias using the harness error
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Harness error types
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported browser backend: {0}")]
    UnsupportedBackend(String),

    #[error("Playwright not found. Install with: npx playwright install")]
    DriverNotFound,

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("No active browser session")]
    NoSession,

    #[error("Surface unreachable: {0}")]
    SurfaceUnreachable(String),

    #[error("Candidate file error: {0}")]
    CandidateFile(String),

    #[error("Line count mismatch: expected {expected} line(s), got {actual}")]
    LineCountMismatch { expected: usize, actual: usize },

    #[error("Field count mismatch at line {line}: expected {expected} field(s), got {actual}")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Mismatch at line {line}, field {field}: expected '{expected}', got '{actual}'")]
    FieldMismatch {
        line: usize,
        field: usize,
        expected: String,
        actual: String,
    },
}
