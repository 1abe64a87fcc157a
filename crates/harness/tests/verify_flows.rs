//! Verification flows driven against a scripted browser session.
//!
//! The stub plays the lookup surface: submitting either raises the
//! error banner, lands on the report page, or does nothing at all.

use async_trait::async_trait;
use std::sync::Mutex;

use platecheck_harness::extract::{Candidate, CandidateStatus, REJECTION_MESSAGE};
use platecheck_harness::record::{RecordStore, RECORD_HEADER};
use platecheck_harness::{
    BrowserSession, HarnessConfig, HarnessError, HarnessResult, Locator, Verifier, VerifyOutcome,
};

const STUB_REPORT_URL: &str = "https://car-checking.com/report";

/// How the fake surface answers a submitted candidate.
enum SiteBehavior {
    /// Error banner appears, visible, with this message
    RejectWith(String),
    /// Redirect to the report page carrying a full vehicle row
    AcceptWith {
        reg: String,
        make: String,
        model: String,
        year: String,
    },
    /// Banner exists in the DOM but stays hidden; the report has the data
    HiddenBannerThenReport {
        reg: String,
        make: String,
        model: String,
        year: String,
    },
    /// Report page echoes the registration but the vehicle table is empty
    ReportMissingFields { reg: String },
    /// Report page loads with nothing readable on it at all
    EmptyReport,
    /// Neither signal ever fires
    Unresponsive,
}

struct PageState {
    url: String,
    filled: String,
    submitted: bool,
}

struct StubSession {
    behavior: SiteBehavior,
    /// Submitting this registration fails at the driver level.
    broken_submit: Option<String>,
    state: Mutex<PageState>,
}

impl StubSession {
    fn new(behavior: SiteBehavior) -> Self {
        Self {
            behavior,
            broken_submit: None,
            state: Mutex::new(PageState {
                url: String::new(),
                filled: String::new(),
                submitted: false,
            }),
        }
    }

    fn with_broken_submit(behavior: SiteBehavior, reg: &str) -> Self {
        let mut session = Self::new(behavior);
        session.broken_submit = Some(reg.to_string());
        session
    }

    fn on_report(&self) -> bool {
        self.state.lock().unwrap().url.contains("report")
    }

    fn submitted(&self) -> bool {
        self.state.lock().unwrap().submitted
    }

    fn report_fields(&self) -> Option<(String, Option<String>, Option<String>, Option<String>)> {
        match &self.behavior {
            SiteBehavior::AcceptWith {
                reg,
                make,
                model,
                year,
            }
            | SiteBehavior::HiddenBannerThenReport {
                reg,
                make,
                model,
                year,
            } => Some((
                reg.clone(),
                Some(make.clone()),
                Some(model.clone()),
                Some(year.clone()),
            )),
            SiteBehavior::ReportMissingFields { reg } => Some((reg.clone(), None, None, None)),
            _ => None,
        }
    }
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn navigate(&self, url: &str) -> HarnessResult<()> {
        let mut state = self.state.lock().unwrap();
        state.url = url.to_string();
        if !url.contains("report") {
            state.submitted = false;
        }
        Ok(())
    }

    async fn fill(&self, _locator: Locator, value: &str) -> HarnessResult<()> {
        self.state.lock().unwrap().filled = value.to_string();
        Ok(())
    }

    async fn click(&self, locator: Locator) -> HarnessResult<()> {
        if locator == Locator::SubmitButton {
            let mut state = self.state.lock().unwrap();
            if self.broken_submit.as_deref() == Some(state.filled.as_str()) {
                return Err(HarnessError::Driver("driver closed the pipe".to_string()));
            }
            state.submitted = true;
            if matches!(
                self.behavior,
                SiteBehavior::AcceptWith { .. }
                    | SiteBehavior::ReportMissingFields { .. }
                    | SiteBehavior::EmptyReport
            ) {
                state.url = STUB_REPORT_URL.to_string();
            }
        }
        Ok(())
    }

    async fn current_url(&self) -> HarnessResult<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn is_present(&self, locator: Locator) -> HarnessResult<bool> {
        Ok(locator == Locator::ErrorBanner
            && self.submitted()
            && matches!(
                self.behavior,
                SiteBehavior::RejectWith(_) | SiteBehavior::HiddenBannerThenReport { .. }
            ))
    }

    async fn is_visible(&self, locator: Locator) -> HarnessResult<bool> {
        Ok(locator == Locator::ErrorBanner
            && self.submitted()
            && matches!(self.behavior, SiteBehavior::RejectWith(_)))
    }

    async fn inner_text(&self, locator: Locator) -> HarnessResult<Option<String>> {
        match locator {
            Locator::ErrorBanner => match &self.behavior {
                SiteBehavior::RejectWith(message) if self.submitted() => Ok(Some(message.clone())),
                _ => Ok(None),
            },
            Locator::ReportMake if self.on_report() => Ok(self.report_fields().and_then(|f| f.1)),
            Locator::ReportModel if self.on_report() => Ok(self.report_fields().and_then(|f| f.2)),
            Locator::ReportYear if self.on_report() => Ok(self.report_fields().and_then(|f| f.3)),
            _ => Ok(None),
        }
    }

    async fn input_value(&self, locator: Locator) -> HarnessResult<Option<String>> {
        if locator == Locator::ReportRegistration && self.on_report() {
            Ok(self.report_fields().map(|f| f.0))
        } else {
            Ok(None)
        }
    }

    async fn close(&self) -> HarnessResult<()> {
        Ok(())
    }
}

fn test_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.verify.race_timeout_ms = 200;
    config.verify.poll_interval_ms = 10;
    config
}

fn candidate(reg: &str, status: CandidateStatus) -> Candidate {
    Candidate {
        reg: reg.to_string(),
        status,
    }
}

#[tokio::test]
async fn rejected_plate_gets_the_banner_message() {
    let session = StubSession::new(SiteBehavior::RejectWith(REJECTION_MESSAGE.to_string()));
    let verifier = Verifier::new(&test_config());

    let outcome = verifier
        .verify_candidate(&session, "INVALID123")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        VerifyOutcome::Rejected {
            reg: "INVALID123".to_string(),
            message: REJECTION_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn accepted_plate_records_the_report_fields() {
    let session = StubSession::new(SiteBehavior::AcceptWith {
        reg: "AB12 CDE".to_string(),
        make: "Ford".to_string(),
        model: "Fiesta".to_string(),
        year: "2019".to_string(),
    });
    let verifier = Verifier::new(&test_config());

    let outcome = verifier
        .verify_candidate(&session, "AB12 CDE")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        VerifyOutcome::Accepted {
            reg: "AB12 CDE".to_string(),
            make: "Ford".to_string(),
            model: "Fiesta".to_string(),
            year: "2019".to_string(),
        }
    );
}

#[tokio::test]
async fn the_report_pages_registration_wins_over_the_submitted_text() {
    let session = StubSession::new(SiteBehavior::AcceptWith {
        reg: "AB12CDE".to_string(),
        make: "Ford".to_string(),
        model: "Fiesta".to_string(),
        year: "2019".to_string(),
    });
    let verifier = Verifier::new(&test_config());

    let outcome = verifier
        .verify_candidate(&session, "AB12 CDE")
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        VerifyOutcome::Accepted { ref reg, .. } if reg == "AB12CDE"
    ));
}

#[tokio::test]
async fn unresponsive_site_yields_incomplete_and_no_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("car_output.txt"));
    store.init().unwrap();

    let session = StubSession::new(SiteBehavior::Unresponsive);
    let verifier = Verifier::new(&test_config());

    let summary = verifier
        .verify_all(
            &session,
            &[candidate("XK55 TUV", CandidateStatus::Valid)],
            &store,
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.incomplete, 1);
    assert_eq!(summary.accepted, 0);
    assert_eq!(summary.rejected, 0);
    assert_eq!(store.read_lines().unwrap(), vec![RECORD_HEADER.to_string()]);
}

#[tokio::test]
async fn hidden_banner_falls_through_to_the_report() {
    let session = StubSession::new(SiteBehavior::HiddenBannerThenReport {
        reg: "KT17 JWB".to_string(),
        make: "Mini".to_string(),
        model: "Cooper".to_string(),
        year: "2021".to_string(),
    });
    let verifier = Verifier::new(&test_config());

    let outcome = verifier
        .verify_candidate(&session, "KT17 JWB")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        VerifyOutcome::Accepted {
            reg: "KT17 JWB".to_string(),
            make: "Mini".to_string(),
            model: "Cooper".to_string(),
            year: "2021".to_string(),
        }
    );
}

#[tokio::test]
async fn an_unreadable_report_rejects_with_an_empty_registration() {
    let session = StubSession::new(SiteBehavior::EmptyReport);
    let verifier = Verifier::new(&test_config());

    let outcome = verifier
        .verify_candidate(&session, "XK55 TUV")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        VerifyOutcome::Rejected {
            reg: String::new(),
            message: REJECTION_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn missing_report_fields_reject_with_the_recovered_reg() {
    let session = StubSession::new(SiteBehavior::ReportMissingFields {
        reg: "NE14 AAA".to_string(),
    });
    let verifier = Verifier::new(&test_config());

    let outcome = verifier
        .verify_candidate(&session, "NE14 AAA")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        VerifyOutcome::Rejected {
            reg: "NE14 AAA".to_string(),
            message: REJECTION_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn verify_all_appends_records_in_candidate_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("car_output.txt"));
    store.init().unwrap();

    let session = StubSession::new(SiteBehavior::RejectWith(REJECTION_MESSAGE.to_string()));
    let verifier = Verifier::new(&test_config());

    let summary = verifier
        .verify_all(
            &session,
            &[
                candidate("JUNK1", CandidateStatus::Invalid),
                candidate("XYZ123", CandidateStatus::Invalid),
            ],
            &store,
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.rejected, 2);
    assert_eq!(summary.accepted, 0);
    assert_eq!(summary.incomplete, 0);
    assert_eq!(
        store.read_lines().unwrap(),
        vec![
            RECORD_HEADER.to_string(),
            format!("JUNK1,{}", REJECTION_MESSAGE),
            format!("XYZ123,{}", REJECTION_MESSAGE),
        ]
    );
}

#[tokio::test]
async fn a_driver_error_mid_candidate_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("car_output.txt"));
    store.init().unwrap();

    // The first candidate takes the driver down with it; the second
    // still gets its turn and its record.
    let session = StubSession::with_broken_submit(
        SiteBehavior::RejectWith(REJECTION_MESSAGE.to_string()),
        "BAD99",
    );
    let verifier = Verifier::new(&test_config());

    let summary = verifier
        .verify_all(
            &session,
            &[
                candidate("BAD99", CandidateStatus::Invalid),
                candidate("JUNK1", CandidateStatus::Invalid),
            ],
            &store,
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.incomplete, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.accepted, 0);
    assert_eq!(
        store.read_lines().unwrap(),
        vec![
            RECORD_HEADER.to_string(),
            format!("JUNK1,{}", REJECTION_MESSAGE),
        ]
    );
}
