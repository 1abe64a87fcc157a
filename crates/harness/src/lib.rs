//! Registration lookup verification harness
//!
//! Mines raw text corpora for candidate registration plates, drives each
//! candidate through the car-checking.com lookup form in a real browser,
//! and reconciles the recorded outcomes against a golden expected-output
//! file.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  extract    corpus dir -> candidate table (reg, status)        │
//! │  verify     per candidate: navigate -> fill -> submit, then    │
//! │             race(error banner | report URL) -> append record   │
//! │  reconcile  actual records vs expected, line and field wise    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod playwright;
pub mod reconcile;
pub mod record;
pub mod session;
pub mod verify;

pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use session::{Backend, BrowserSession, Locator, SessionManager};
pub use verify::{Verifier, VerifyOutcome, VerifySummary};

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
