//! Financial collector
//!
//! Resolves the company's ticker, renders the Yahoo Finance and Google Finance
//! quote pages in one headless Chrome session, and writes both records into a
//! single JSON file. Each page succeeds or fails on its own.

pub mod extract;
pub mod tickers;

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::error::CollectorError;
use crate::runner::CollectorReport;
use crate::scraping::{BrowserSession, PageRenderer};
use crate::utils::{financial_file_name, write_json_file};

pub use tickers::{resolve, Ticker};

/// Value stored for a Yahoo field whose selector matched nothing
pub const NO_DATA_FOUND: &str = "No data found";

const YAHOO_MARKER: &str = r#"fin-streamer[data-field="regularMarketPrice"]"#;
const GOOGLE_MARKER: &str = "div.gyFHrc > div.P6K39c";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    YahooFinance,
    GoogleFinance,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::YahooFinance => "Yahoo Finance",
            QuoteSource::GoogleFinance => "Google Finance",
        }
    }

    pub fn quote_url(&self, ticker: &Ticker) -> String {
        match self {
            QuoteSource::YahooFinance => {
                format!("https://finance.yahoo.com/quote/{}/", ticker.symbol())
            }
            QuoteSource::GoogleFinance => format!(
                "https://finance.google.com/finance/quote/{}?hl=en",
                ticker.qualified()
            ),
        }
    }

    /// Element whose presence means the quote has rendered
    pub fn marker(&self) -> &'static str {
        match self {
            QuoteSource::YahooFinance => YAHOO_MARKER,
            QuoteSource::GoogleFinance => GOOGLE_MARKER,
        }
    }

    fn extract(&self, html: &str) -> Result<FinancialRecord, CollectorError> {
        match self {
            QuoteSource::YahooFinance => extract::extract_yahoo(html),
            QuoteSource::GoogleFinance => extract::extract_google(html),
        }
    }
}

/// Flat quote snapshot for one source; serializes as `{"source": ..., field: value, ...}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialRecord {
    source: QuoteSource,
    fields: Vec<(String, String)>,
}

impl FinancialRecord {
    pub fn new(source: QuoteSource) -> Self {
        Self {
            source,
            fields: Vec::new(),
        }
    }

    pub fn source(&self) -> QuoteSource {
        self.source
    }

    /// Set a field, replacing an earlier value but keeping its position
    pub fn insert(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field.to_string(), value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FinancialRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("source", self.source.as_str())?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Resolve, launch the browser, scrape both sources, save.
///
/// An unknown company stops here before any browser is started.
pub fn collect(
    company: &str,
    settings: &Settings,
    out_dir: &Path,
) -> Result<CollectorReport, CollectorError> {
    let ticker = resolve(company).inspect_err(|e| error!("{}", e))?;
    info!("Using ticker symbol: {}", ticker.qualified());

    let session = BrowserSession::launch(&settings.fetch.user_agent).map_err(|e| {
        error!("Failed to start browser: {:#}", e);
        CollectorError::Browser(format!("{:#}", e))
    })?;

    scrape_and_save(
        company.trim(),
        &ticker,
        &session,
        settings.browser.wait_timeout(),
        out_dir,
    )
    // `session` drops here on every path, terminating Chrome
}

/// Visit both quote pages with `renderer` and write whatever succeeded
pub fn scrape_and_save<R: PageRenderer + ?Sized>(
    company: &str,
    ticker: &Ticker,
    renderer: &R,
    wait_timeout: Duration,
    out_dir: &Path,
) -> Result<CollectorReport, CollectorError> {
    let records: Vec<FinancialRecord> = [QuoteSource::YahooFinance, QuoteSource::GoogleFinance]
        .iter()
        .filter_map(|source| scrape_source(*source, ticker, renderer, wait_timeout))
        .collect();

    let file_name = financial_file_name(company);
    match write_json_file(out_dir, &file_name, &records) {
        Ok(path) => {
            info!("Results successfully saved to {}", path.display());
            Ok(CollectorReport {
                records: records.len(),
                path,
            })
        }
        Err(e) => {
            error!("Error while saving JSON file: {:#}", e);
            Err(CollectorError::Persist {
                path: out_dir.join(file_name),
                reason: format!("{:#}", e),
            })
        }
    }
}

fn scrape_source<R: PageRenderer + ?Sized>(
    source: QuoteSource,
    ticker: &Ticker,
    renderer: &R,
    wait_timeout: Duration,
) -> Option<FinancialRecord> {
    let url = source.quote_url(ticker);
    info!("Loading {} URL: {}", source.as_str(), url);

    let html = match renderer.render(&url, source.marker(), wait_timeout) {
        Ok(html) => html,
        Err(e) => {
            warn!("Failed to load {} page: {:#}", source.as_str(), e);
            return None;
        }
    };

    match source.extract(&html) {
        Ok(record) => {
            info!(
                "Extracted {} field(s) from {}",
                record.len(),
                source.as_str()
            );
            Some(record)
        }
        Err(e) => {
            warn!("Error extracting {} data: {}", source.as_str(), e);
            None
        }
    }
}
