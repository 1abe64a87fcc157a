//! Playwright-backed browser session
//!
//! Drives a real browser through a small Node sidecar. The sidecar reads
//! one JSON command per line on stdin and writes one JSON reply per line
//! on stdout, so every operation is a single round trip.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::config::BrowserConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::session::{BrowserSession, Locator};

const DRIVER_SCRIPT: &str = r##"const readline = require('readline');
const { chromium, firefox, webkit } = require('playwright');

const engines = { chromium, firefox, webkit };

async function main() {
  const engineName = process.argv[2];
  const headless = process.argv[3] === '1';
  const implicitTimeout = parseInt(process.argv[4], 10);

  const engine = engines[engineName];
  if (!engine) {
    console.log(JSON.stringify({ ok: false, error: `unknown engine: ${engineName}` }));
    process.exit(1);
  }

  let browser;
  try {
    const launchArgs = engineName === 'chromium' && !headless ? ['--start-maximized'] : [];
    browser = await engine.launch({ headless, args: launchArgs });
  } catch (err) {
    console.log(JSON.stringify({ ok: false, error: String(err) }));
    process.exit(1);
  }

  const context = await browser.newContext({ viewport: null });
  context.setDefaultTimeout(implicitTimeout);
  const page = await context.newPage();

  console.log(JSON.stringify({ ok: true, result: 'ready' }));

  const rl = readline.createInterface({ input: process.stdin });
  for await (const line of rl) {
    if (!line.trim()) continue;
    let reply;
    try {
      const cmd = JSON.parse(line);
      let result = null;
      switch (cmd.op) {
        case 'goto':
          await page.goto(cmd.value);
          break;
        case 'fill':
          await page.fill(cmd.selector, cmd.value);
          break;
        case 'click':
          await page.click(cmd.selector);
          break;
        case 'url':
          result = page.url();
          break;
        case 'present':
          result = (await page.locator(cmd.selector).count()) > 0;
          break;
        case 'visible': {
          const loc = page.locator(cmd.selector);
          result = (await loc.count()) > 0 && (await loc.first().isVisible());
          break;
        }
        case 'text': {
          const loc = page.locator(cmd.selector);
          result = (await loc.count()) > 0 ? await loc.first().innerText() : null;
          break;
        }
        case 'value': {
          const loc = page.locator(cmd.selector);
          result = (await loc.count()) > 0 ? await loc.first().inputValue() : null;
          break;
        }
        case 'close':
          console.log(JSON.stringify({ ok: true, result: null }));
          await browser.close();
          process.exit(0);
        default:
          throw new Error(`unknown op: ${cmd.op}`);
      }
      reply = { ok: true, result };
    } catch (err) {
      reply = { ok: false, error: String(err) };
    }
    console.log(JSON.stringify(reply));
  }
}

main();
"##;

#[derive(Serialize)]
struct DriverCommand<'a> {
    op: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    selector: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

#[derive(Deserialize)]
struct DriverResponse {
    ok: bool,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

struct DriverIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// A live browser driven over the sidecar protocol.
pub struct PlaywrightSession {
    io: Mutex<DriverIo>,
    child: Mutex<Child>,
    _script_dir: TempDir,
}

impl PlaywrightSession {
    /// Launch the sidecar and wait for its ready line.
    pub async fn launch(config: &BrowserConfig) -> HarnessResult<Self> {
        check_playwright_installed()?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;
        debug!("Driver script written to {}", script_path.display());

        let mut child = Command::new("node")
            .arg(&script_path)
            .arg(config.backend.as_str())
            .arg(if config.headless { "1" } else { "0" })
            .arg(config.implicit_timeout_ms.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HarnessError::Driver(format!("failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HarnessError::Driver("driver stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HarnessError::Driver("driver stdout not captured".to_string()))?;

        let session = Self {
            io: Mutex::new(DriverIo {
                stdin,
                stdout: BufReader::new(stdout),
            }),
            child: Mutex::new(child),
            _script_dir: script_dir,
        };
        session.read_ready().await?;
        Ok(session)
    }

    /// Consume the ready line the sidecar prints after launching.
    async fn read_ready(&self) -> HarnessResult<()> {
        let mut io = self.io.lock().await;
        let mut line = String::new();
        let n = io.stdout.read_line(&mut line).await?;
        if n == 0 {
            return Err(HarnessError::Driver(
                "driver exited before becoming ready".to_string(),
            ));
        }
        trace!("Driver greeting: {}", line.trim());

        let response: DriverResponse = serde_json::from_str(line.trim())
            .map_err(|e| HarnessError::Driver(format!("invalid ready line: {}", e)))?;
        if let Some(error) = response.error {
            return Err(HarnessError::Driver(error));
        }
        if !response.ok {
            return Err(HarnessError::Driver("driver failed to start".to_string()));
        }
        Ok(())
    }

    /// One command, one reply.
    async fn command(
        &self,
        op: &str,
        selector: Option<&str>,
        value: Option<&str>,
    ) -> HarnessResult<serde_json::Value> {
        let cmd = DriverCommand {
            op,
            selector,
            value,
        };
        let payload = serde_json::to_string(&cmd)?;
        trace!("Driver command: {}", payload);

        let mut io = self.io.lock().await;
        io.stdin.write_all(payload.as_bytes()).await?;
        io.stdin.write_all(b"\n").await?;
        io.stdin.flush().await?;

        let mut line = String::new();
        let n = io.stdout.read_line(&mut line).await?;
        if n == 0 {
            return Err(HarnessError::Driver("driver closed the pipe".to_string()));
        }
        trace!("Driver reply: {}", line.trim());

        let response: DriverResponse = serde_json::from_str(line.trim())
            .map_err(|e| HarnessError::Driver(format!("invalid response: {}", e)))?;
        if let Some(error) = response.error {
            return Err(HarnessError::Driver(error));
        }
        if !response.ok {
            return Err(HarnessError::Driver(format!("{} failed", op)));
        }
        Ok(response.result.unwrap_or(serde_json::Value::Null))
    }

    async fn bool_result(&self, op: &str, selector: &str) -> HarnessResult<bool> {
        let result = self.command(op, Some(selector), None).await?;
        result
            .as_bool()
            .ok_or_else(|| HarnessError::Driver(format!("{} returned a non-boolean result", op)))
    }

    async fn text_result(&self, op: &str, selector: &str) -> HarnessResult<Option<String>> {
        let result = self.command(op, Some(selector), None).await?;
        match result {
            serde_json::Value::String(s) => Ok(Some(s)),
            _ => Ok(None),
        }
    }
}

/// Selector for each element on the lookup surface.
fn selector(locator: Locator) -> &'static str {
    match locator {
        Locator::RegistrationInput => "input#subForm1",
        Locator::SubmitButton => "button[type='submit']",
        Locator::ErrorBanner => ".alert.alert-danger",
        Locator::ReportRegistration => "#subForm",
        Locator::ReportMake => "xpath=//td[text()='Make']/following-sibling::td",
        Locator::ReportModel => "xpath=//td[text()='Model']/following-sibling::td",
        Locator::ReportYear => "xpath=//td[text()='Year of manufacture']/following-sibling::td",
    }
}

#[async_trait]
impl BrowserSession for PlaywrightSession {
    async fn navigate(&self, url: &str) -> HarnessResult<()> {
        self.command("goto", None, Some(url)).await?;
        Ok(())
    }

    async fn fill(&self, locator: Locator, value: &str) -> HarnessResult<()> {
        self.command("fill", Some(selector(locator)), Some(value))
            .await?;
        Ok(())
    }

    async fn click(&self, locator: Locator) -> HarnessResult<()> {
        self.command("click", Some(selector(locator)), None).await?;
        Ok(())
    }

    async fn current_url(&self) -> HarnessResult<String> {
        let result = self.command("url", None, None).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| HarnessError::Driver("url returned a non-string result".to_string()))
    }

    async fn is_present(&self, locator: Locator) -> HarnessResult<bool> {
        self.bool_result("present", selector(locator)).await
    }

    async fn is_visible(&self, locator: Locator) -> HarnessResult<bool> {
        self.bool_result("visible", selector(locator)).await
    }

    async fn inner_text(&self, locator: Locator) -> HarnessResult<Option<String>> {
        self.text_result("text", selector(locator)).await
    }

    async fn input_value(&self, locator: Locator) -> HarnessResult<Option<String>> {
        self.text_result("value", selector(locator)).await
    }

    async fn close(&self) -> HarnessResult<()> {
        // Graceful shutdown; the child is killed on drop if this fails.
        let _ = self.command("close", None, None).await;
        let mut child = self.child.lock().await;
        let _ = child.wait().await;
        Ok(())
    }
}

/// Check that the Playwright CLI resolves before spawning anything.
fn check_playwright_installed() -> HarnessResult<()> {
    let status = std::process::Command::new("npx")
        .args(["playwright", "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(s) if s.success() => Ok(()),
        _ => Err(HarnessError::DriverNotFound),
    }
}
