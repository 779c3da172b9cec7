//! Crawl settings
//!
//! The values live in `settings.toml` at the crate root and are compiled into
//! the binary, so a build always crawls with the same fetch parameters.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const EMBEDDED_SETTINGS: &str = include_str!("../settings.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub autothrottle: AutoThrottleSettings,
    pub browser: BrowserSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// HTTP fetch layer parameters for the news crawl
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    pub user_agent: String,
    pub concurrent_requests: usize,
    pub download_delay_secs: f64,
    pub download_timeout_secs: u64,
    pub retry_times: u32,
    pub retry_http_codes: Vec<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoThrottleSettings {
    pub enabled: bool,
    pub start_delay_secs: f64,
    pub max_delay_secs: f64,
    pub target_concurrency: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    pub wait_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub news_dir: PathBuf,
    pub financial_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Settings {
    /// Load the settings embedded at build time
    pub fn load() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_SETTINGS).context("Invalid embedded settings.toml")
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(raw).context("Failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.concurrent_requests == 0 {
            anyhow::bail!("fetch.concurrent_requests must be at least 1");
        }
        if self.fetch.download_delay_secs < 0.0 || self.autothrottle.max_delay_secs < 0.0 {
            anyhow::bail!("delays must not be negative");
        }
        if self.autothrottle.enabled && self.autothrottle.target_concurrency <= 0.0 {
            anyhow::bail!("autothrottle.target_concurrency must be positive");
        }
        Ok(())
    }
}

impl FetchSettings {
    pub fn download_delay(&self) -> Duration {
        Duration::from_secs_f64(self.download_delay_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_http_codes.contains(&status)
    }
}

impl AutoThrottleSettings {
    pub fn start_delay(&self) -> Duration {
        Duration::from_secs_f64(self.start_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs_f64(self.max_delay_secs)
    }
}

impl BrowserSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}
