//! Error handling for the collectors
//!
//! Collector boundaries report a `CollectorError`; the fetch, browser and
//! persistence glue underneath uses anyhow for context chaining.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a collector produced no (or partial) output
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("no company name provided")]
    MissingCompanyName,

    #[error("no ticker symbol found for company name: {0}")]
    UnknownTicker(String),

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("fetch layer error: {0}")]
    Fetch(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("failed to write {path}: {reason}")]
    Persist { path: PathBuf, reason: String },
}

/// Result type alias for glue code
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = CollectorError::UnknownTicker("Acme".to_string());
        assert_eq!(
            err.to_string(),
            "no ticker symbol found for company name: Acme"
        );
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> =
            Err(anyhow::anyhow!("connection reset")).context("failed to fetch page");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to fetch page"));
        assert!(format!("{:?}", err).contains("connection reset"));
    }

    #[test]
    fn test_collector_error_variants() {
        let sel = CollectorError::Selector {
            selector: "div[".to_string(),
            reason: "unexpected end".to_string(),
        };
        assert!(sel.to_string().starts_with("invalid selector"));

        let persist = CollectorError::Persist {
            path: PathBuf::from("data/acme.json"),
            reason: "read-only".to_string(),
        };
        assert!(persist.to_string().contains("data/acme.json"));

        assert_eq!(
            CollectorError::MissingCompanyName.to_string(),
            "no company name provided"
        );
    }
}
