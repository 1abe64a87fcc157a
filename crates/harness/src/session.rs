//! Browser session contract and lifecycle

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::BrowserConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::playwright::PlaywrightSession;

/// The fixed set of page elements the harness touches.
///
/// Keeping the set closed means every selector lives in one place and a
/// page change shows up as a single diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Registration text input on the entry form
    RegistrationInput,
    /// Submit button on the entry form
    SubmitButton,
    /// Error banner shown for unrecognised registrations
    ErrorBanner,
    /// Registration echo field on the report page
    ReportRegistration,
    /// Make cell on the report page
    ReportMake,
    /// Model cell on the report page
    ReportModel,
    /// Year of manufacture cell on the report page
    ReportYear,
}

impl Locator {
    pub fn name(&self) -> &'static str {
        match self {
            Locator::RegistrationInput => "registration-input",
            Locator::SubmitButton => "submit-button",
            Locator::ErrorBanner => "error-banner",
            Locator::ReportRegistration => "report-registration",
            Locator::ReportMake => "report-make",
            Locator::ReportModel => "report-model",
            Locator::ReportYear => "report-year",
        }
    }
}

/// Browser family driving a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Backend {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Chromium => "chromium",
            Backend::Firefox => "firefox",
            Backend::Webkit => "webkit",
        }
    }
}

impl FromStr for Backend {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Backend::Chromium),
            "firefox" => Ok(Backend::Firefox),
            "webkit" | "safari" => Ok(Backend::Webkit),
            other => Err(HarnessError::UnsupportedBackend(other.to_string())),
        }
    }
}

impl TryFrom<String> for Backend {
    type Error = HarnessError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Backend> for String {
    fn from(b: Backend) -> Self {
        b.as_str().to_string()
    }
}

/// Operations the verifier needs from a live browser.
///
/// Presence and visibility are separate questions so the verifier can
/// tell a live error banner from a stale hidden node.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to an absolute URL
    async fn navigate(&self, url: &str) -> HarnessResult<()>;

    /// Replace the contents of a text input
    async fn fill(&self, locator: Locator, value: &str) -> HarnessResult<()>;

    /// Click an element
    async fn click(&self, locator: Locator) -> HarnessResult<()>;

    /// Current page URL
    async fn current_url(&self) -> HarnessResult<String>;

    /// Whether the element exists in the DOM at all
    async fn is_present(&self, locator: Locator) -> HarnessResult<bool>;

    /// Whether the element exists and is rendered visible
    async fn is_visible(&self, locator: Locator) -> HarnessResult<bool>;

    /// Rendered text of the element, or None when it is absent
    async fn inner_text(&self, locator: Locator) -> HarnessResult<Option<String>>;

    /// Value attribute of an input, or None when it is absent
    async fn input_value(&self, locator: Locator) -> HarnessResult<Option<String>>;

    /// Shut the browser down
    async fn close(&self) -> HarnessResult<()>;
}

/// Owns at most one live browser session.
///
/// `acquire` is idempotent and `release` is safe to call without a
/// session, so callers can pair them unconditionally.
pub struct SessionManager {
    config: BrowserConfig,
    active: Option<PlaywrightSession>,
}

impl SessionManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Launch the browser unless one is already running.
    pub async fn acquire(&mut self) -> HarnessResult<()> {
        if self.active.is_some() {
            return Ok(());
        }
        info!("Launching {} session", self.config.backend.as_str());
        let session = PlaywrightSession::launch(&self.config).await?;
        self.active = Some(session);
        Ok(())
    }

    /// Borrow the live session.
    pub fn session(&self) -> HarnessResult<&dyn BrowserSession> {
        match self.active.as_ref() {
            Some(session) => Ok(session),
            None => Err(HarnessError::NoSession),
        }
    }

    /// Close the browser if one is running.
    pub async fn release(&mut self) -> HarnessResult<()> {
        if let Some(session) = self.active.take() {
            session.close().await?;
            info!("Browser session closed");
        }
        Ok(())
    }
}

/// Check that the lookup surface answers before committing to a full run.
pub async fn probe_surface(url: &str, timeout: Duration) -> HarnessResult<()> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| HarnessError::SurfaceUnreachable(format!("{}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(HarnessError::SurfaceUnreachable(format!(
            "{} returned {}",
            url,
            response.status()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parsing_accepts_family_aliases() {
        let cases = [
            ("chromium", Backend::Chromium),
            ("chrome", Backend::Chromium),
            ("Chrome", Backend::Chromium),
            ("firefox", Backend::Firefox),
            ("webkit", Backend::Webkit),
            ("safari", Backend::Webkit),
            ("SAFARI", Backend::Webkit),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<Backend>().unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn unknown_backend_is_fatal() {
        let err = "opera".parse::<Backend>().unwrap_err();
        assert!(matches!(err, HarnessError::UnsupportedBackend(ref s) if s == "opera"));
    }

    #[test]
    fn locator_names_are_distinct() {
        let locators = [
            Locator::RegistrationInput,
            Locator::SubmitButton,
            Locator::ErrorBanner,
            Locator::ReportRegistration,
            Locator::ReportMake,
            Locator::ReportModel,
            Locator::ReportYear,
        ];
        let names: std::collections::HashSet<_> = locators.iter().map(|l| l.name()).collect();
        assert_eq!(names.len(), locators.len());
    }
}
