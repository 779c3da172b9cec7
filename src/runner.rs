//! Run orchestration
//!
//! Starts the news and financial collectors together for one company and
//! waits for both. Neither collector's failure affects the other.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Settings;
use crate::error::CollectorError;
use crate::{financial, news};

/// What a collector wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorReport {
    pub records: usize,
    pub path: PathBuf,
}

pub type CollectorOutcome = Result<CollectorReport, CollectorError>;

/// Outcome of both collectors for one run
#[derive(Debug)]
pub struct RunSummary {
    pub company: String,
    pub news: CollectorOutcome,
    pub financial: CollectorOutcome,
}

/// Run both collectors for `company` using the configured output directories
pub async fn run(company: &str, settings: Arc<Settings>) -> RunSummary {
    let news_dir = settings.output.news_dir.clone();
    let financial_dir = settings.output.financial_dir.clone();
    run_into(company, settings, news_dir, financial_dir).await
}

/// Run both collectors, writing into explicit directories
pub async fn run_into(
    company: &str,
    settings: Arc<Settings>,
    news_dir: PathBuf,
    financial_dir: PathBuf,
) -> RunSummary {
    let company = company.trim().to_string();
    info!("Starting collection for {:?}", company);

    let news_job = news::collect(&company, &settings, &news_dir);

    let financial_settings = settings.clone();
    let financial_company = company.clone();
    let financial_job = tokio::task::spawn_blocking(move || {
        financial::collect(&financial_company, &financial_settings, &financial_dir)
    });

    let (news, financial) = tokio::join!(news_job, financial_job);

    let financial = financial.unwrap_or_else(|join_err| {
        error!("Financial collector task failed: {}", join_err);
        Err(CollectorError::Browser(join_err.to_string()))
    });

    RunSummary {
        company,
        news,
        financial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_company_stops_both_collectors() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Arc::new(Settings::load().unwrap());

        let summary = run_into(
            "  ",
            settings,
            tmp.path().join("data"),
            tmp.path().join("financial-data"),
        )
        .await;

        assert_eq!(summary.company, "");
        assert!(matches!(summary.news, Err(CollectorError::MissingCompanyName)));
        assert!(matches!(
            summary.financial,
            Err(CollectorError::MissingCompanyName)
        ));
        assert!(!tmp.path().join("data").exists());
        assert!(!tmp.path().join("financial-data").exists());
    }
}
