use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::CollectorError;

/// Known companies and their exchange-qualified tickers
pub const COMPANY_TICKERS: &[(&str, &str)] = &[
    ("infosys", "INFY:NSE"),
    ("wipro", "WIPRO:NSE"),
    ("google", "GOOG:NASDAQ"),
    ("microsoft", "MSFT:NASDAQ"),
    ("apple", "AAPL:NASDAQ"),
    ("amazon", "AMZN:NASDAQ"),
    ("tesla", "TSLA:NASDAQ"),
    ("facebook", "META:NASDAQ"),
    ("adobe", "ADBE:NASDAQ"),
    ("ibm", "IBM:NYSE"),
    ("nvidia", "NVDA:NASDAQ"),
    ("netflix", "NFLX:NASDAQ"),
    ("snap", "SNAP:NYSE"),
    ("twitter", "TWTR:NYSE"),
    ("intel", "INTC:NASDAQ"),
    ("spotify", "SPOT:NYSE"),
    ("salesforce", "CRM:NYSE"),
    ("paypal", "PYPL:NASDAQ"),
    ("hcl", "HCLTECH:NSE"),
    ("shopify", "SHOP:NYSE"),
];

static TICKER_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COMPANY_TICKERS.iter().copied().collect());

/// Exchange-qualified ticker, e.g. `AAPL:NASDAQ`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    qualified: String,
}

impl Ticker {
    /// Full `SYMBOL:EXCHANGE` form, as Google Finance expects
    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// Bare symbol, as Yahoo Finance expects
    pub fn symbol(&self) -> &str {
        self.qualified
            .split(':')
            .next()
            .unwrap_or(&self.qualified)
    }
}

/// Look a company up by (case-insensitive) name
pub fn resolve(company: &str) -> Result<Ticker, CollectorError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(CollectorError::MissingCompanyName);
    }
    TICKER_INDEX
        .get(company.to_lowercase().as_str())
        .map(|qualified| Ticker {
            qualified: qualified.to_string(),
        })
        .ok_or_else(|| CollectorError::UnknownTicker(company.to_string()))
}

/// Company names with a known ticker, for prompt completion
pub fn known_companies() -> impl Iterator<Item = &'static str> {
    COMPANY_TICKERS.iter().map(|(name, _)| *name)
}
