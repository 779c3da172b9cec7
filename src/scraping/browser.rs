// Headless Chrome session for quote pages that render client-side.
//
// The session owns the Chrome process for one run. Dropping it terminates the
// browser, so every exit path of the financial collector releases it.

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::time::Duration;
use tracing::{info, warn};

/// Something that can load a URL and hand back the rendered markup once a
/// marker element shows up.
pub trait PageRenderer {
    fn render(&self, url: &str, marker: &str, timeout: Duration) -> Result<String>;
}

/// Run-scoped headless Chrome
pub struct BrowserSession {
    browser: Option<Browser>,
}

impl BrowserSession {
    /// Launch headless Chrome
    pub fn launch(user_agent: &str) -> Result<Self> {
        info!("Launching headless Chrome browser");

        let user_agent_arg = format!("--user-agent={}", user_agent);
        let options = LaunchOptions {
            headless: true,
            sandbox: false,
            idle_browser_timeout: Duration::from_secs(120),
            args: vec![
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--ignore-certificate-errors"),
                OsStr::new("--ignore-ssl-errors=yes"),
                OsStr::new(user_agent_arg.as_str()),
            ],
            ..Default::default()
        };

        let browser = Browser::new(options)
            .context("Failed to launch headless Chrome. Is Chrome/Chromium installed?")?;

        Ok(Self {
            browser: Some(browser),
        })
    }

    fn browser(&self) -> Result<&Browser> {
        self.browser
            .as_ref()
            .context("Browser session already closed")
    }
}

impl PageRenderer for BrowserSession {
    fn render(&self, url: &str, marker: &str, timeout: Duration) -> Result<String> {
        let tab = self
            .browser()?
            .new_tab()
            .context("Failed to create new browser tab")?;

        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?;

        tab.wait_for_element_with_custom_timeout(marker, timeout)
            .with_context(|| format!("Timed out waiting for {:?} on {}", marker, url))?;

        let html = tab.get_content().context("Failed to get page content")?;

        if let Err(e) = tab.close(true) {
            warn!("Failed to close tab for {}: {}", url, e);
        }

        Ok(html)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.browser.take().is_some() {
            info!("Headless Chrome session released");
        }
    }
}
