//! Verification orchestration
//!
//! Feeds each candidate through the entry form, then races two signals
//! against a shared deadline: the error banner appearing, or the URL
//! moving to the report page. Whichever wins decides the outcome path.

use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::extract::{Candidate, CandidateStatus, REJECTION_MESSAGE};
use crate::record::RecordStore;
use crate::session::{BrowserSession, Locator};

/// Terminal state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The report page had every field; values are the page's, not ours.
    Accepted {
        reg: String,
        make: String,
        model: String,
        year: String,
    },
    /// The surface turned the candidate away.
    Rejected { reg: String, message: String },
    /// Neither signal fired before the deadline.
    Incomplete { reg: String },
}

impl VerifyOutcome {
    /// Record-file line for this outcome, or None when nothing is recorded.
    pub fn record_line(&self) -> Option<String> {
        match self {
            VerifyOutcome::Accepted {
                reg,
                make,
                model,
                year,
            } => Some(format!("{},{},{},{}", reg, make, model, year)),
            VerifyOutcome::Rejected { reg, message } => Some(format!("{},{}", reg, message)),
            VerifyOutcome::Incomplete { .. } => None,
        }
    }
}

/// Counts for a whole verification pass.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VerifySummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub incomplete: usize,
    pub duration_ms: u64,
}

enum RaceWinner {
    ErrorPresent,
    Report,
    Deadline,
}

/// Drives candidates through the lookup surface one at a time.
pub struct Verifier {
    entry_url: String,
    report_url: String,
    report_marker: String,
    race_timeout: Duration,
    poll_interval: Duration,
}

impl Verifier {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            entry_url: config.urls.entry.clone(),
            report_url: config.urls.report.clone(),
            report_marker: config.urls.report_marker.clone(),
            race_timeout: config.verify.race_timeout(),
            poll_interval: config.verify.poll_interval(),
        }
    }

    /// Verify every candidate in order, appending records as they land.
    ///
    /// A browser error mid-candidate counts that candidate as incomplete
    /// and moves on; the records appended so far stay on disk.
    pub async fn verify_all(
        &self,
        session: &dyn BrowserSession,
        candidates: &[Candidate],
        store: &RecordStore,
    ) -> HarnessResult<VerifySummary> {
        let start = Instant::now();
        let mut accepted = 0;
        let mut rejected = 0;
        let mut incomplete = 0;

        info!("Verifying {} candidate(s)...", candidates.len());

        for candidate in candidates {
            let outcome = match self.verify_candidate(session, &candidate.reg).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("✗ {} - {}", candidate.reg, e);
                    incomplete += 1;
                    continue;
                }
            };

            match &outcome {
                VerifyOutcome::Accepted {
                    reg, make, model, ..
                } => {
                    info!("✓ {} accepted ({} {})", reg, make, model);
                    if candidate.status == CandidateStatus::Invalid {
                        debug!("{} was expected to be rejected", candidate.reg);
                    }
                    accepted += 1;
                }
                VerifyOutcome::Rejected { reg, message } => {
                    info!("✗ {} rejected: {}", reg, message);
                    if candidate.status == CandidateStatus::Valid {
                        debug!("{} was expected to be accepted", candidate.reg);
                    }
                    rejected += 1;
                }
                VerifyOutcome::Incomplete { reg } => {
                    warn!("? {} reached no outcome before the deadline", reg);
                    incomplete += 1;
                }
            }

            if let Some(line) = outcome.record_line() {
                store.append(&line)?;
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("");
        info!(
            "Verification: {} accepted, {} rejected, {} incomplete ({} ms)",
            accepted, rejected, incomplete, duration_ms
        );

        Ok(VerifySummary {
            total: candidates.len(),
            accepted,
            rejected,
            incomplete,
            duration_ms,
        })
    }

    /// Run one candidate through the form and decide its outcome.
    pub async fn verify_candidate(
        &self,
        session: &dyn BrowserSession,
        reg: &str,
    ) -> HarnessResult<VerifyOutcome> {
        session.navigate(&self.entry_url).await?;
        session.fill(Locator::RegistrationInput, reg).await?;
        session.click(Locator::SubmitButton).await?;

        match self.race_outcome(session).await? {
            RaceWinner::ErrorPresent => {
                if session.is_visible(Locator::ErrorBanner).await? {
                    let message = session
                        .inner_text(Locator::ErrorBanner)
                        .await?
                        .unwrap_or_default();
                    return Ok(VerifyOutcome::Rejected {
                        reg: reg.to_string(),
                        message,
                    });
                }
                // Present but not displayed: let the report page decide.
                self.read_report(session).await
            }
            RaceWinner::Report => self.read_report(session).await,
            RaceWinner::Deadline => Ok(VerifyOutcome::Incomplete {
                reg: reg.to_string(),
            }),
        }
    }

    /// Poll until the banner exists, the URL reaches the report, or the
    /// deadline passes.
    async fn race_outcome(&self, session: &dyn BrowserSession) -> HarnessResult<RaceWinner> {
        let deadline = Instant::now() + self.race_timeout;
        loop {
            if session.is_present(Locator::ErrorBanner).await? {
                return Ok(RaceWinner::ErrorPresent);
            }
            if session.current_url().await?.contains(&self.report_marker) {
                return Ok(RaceWinner::Report);
            }
            if Instant::now() >= deadline {
                return Ok(RaceWinner::Deadline);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Read the report page and accept only when every field is there.
    async fn read_report(&self, session: &dyn BrowserSession) -> HarnessResult<VerifyOutcome> {
        session.navigate(&self.report_url).await?;

        let reg = session.input_value(Locator::ReportRegistration).await?;
        let make = session.inner_text(Locator::ReportMake).await?;
        let model = session.inner_text(Locator::ReportModel).await?;
        let year = session.inner_text(Locator::ReportYear).await?;

        match (reg, make, model, year) {
            (Some(reg), Some(make), Some(model), Some(year))
                if !reg.is_empty() && !make.is_empty() && !model.is_empty() && !year.is_empty() =>
            {
                Ok(VerifyOutcome::Accepted {
                    reg,
                    make,
                    model,
                    year,
                })
            }
            (reg, _, _, _) => Ok(VerifyOutcome::Rejected {
                reg: reg.unwrap_or_default(),
                message: REJECTION_MESSAGE.to_string(),
            }),
        }
    }
}
