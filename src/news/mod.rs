//! News collector
//!
//! Crawls the fixed set of news search pages for a company, extracts article
//! candidates per site, keeps the relevant ones, and drops duplicates by
//! content fingerprint before writing a single JSON snapshot.

pub mod crawler;
pub mod sites;
pub mod throttle;

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::CollectorError;
use crate::runner::CollectorReport;
use crate::utils::{news_file_name, query_form, write_json_file};

pub use crawler::NewsCrawler;
pub use sites::{parse_page, ParsedPage, Site};

/// Paragraph placeholder for articles without a lead paragraph
pub const NO_ARTICLE_TEXT: &str = "No article text";

/// Stand-in paragraph used only when fingerprinting
const UNKNOWN_PARAGRAPH: &str = "unknown_paragraph";

/// Search pages crawled for every company; `{company}` is the query form of the name
pub const START_URL_TEMPLATES: &[&str] = &[
    "https://news.google.com/search?q={company}",
    "https://pressgazette.co.uk/?s={company}",
    "https://www.bbc.co.uk/search?q={company}",
    "https://economictimes.indiatimes.com/topic/{company}-news",
    "https://www.ndtvprofit.com/search?q={company}",
    "https://trak.in/stories/search/{company}",
];

/// Site an article was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NewsSource {
    #[serde(rename = "Press Gazette")]
    PressGazette,
    #[serde(rename = "BBC News")]
    Bbc,
    #[serde(rename = "Economic Times")]
    EconomicTimes,
    #[serde(rename = "NDTV Profit")]
    NdtvProfit,
    #[serde(rename = "Trak.in")]
    TrakIn,
    #[serde(rename = "Google News")]
    GoogleNews,
}

/// Raw fields pulled out of one article container, before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: NewsSource,
    pub title: Option<String>,
    pub url: Option<String>,
    pub article_para: Option<String>,
}

/// Accepted, deduplicated article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    pub source: NewsSource,
    pub article_para: String,
    pub unique_key: String,
}

/// What happened to a candidate offered to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Accepted,
    Rejected,
    Duplicate,
}

/// Per-page tally returned by [`RunContext::ingest`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

/// Fingerprint of an article: BLAKE3 over the lower-cased title and the paragraph
pub fn unique_key(title: &str, article_para: Option<&str>) -> String {
    let input = format!(
        "{}_{}",
        title.to_lowercase(),
        article_para.unwrap_or(UNKNOWN_PARAGRAPH)
    );
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

/// Build the start URLs for a company
pub fn start_urls(company: &str) -> Vec<String> {
    let query = query_form(company);
    START_URL_TEMPLATES
        .iter()
        .map(|template| template.replace("{company}", &query))
        .collect()
}

/// Run-scoped accumulation: ordered records plus the fingerprints already seen
#[derive(Debug)]
pub struct RunContext {
    company_lower: String,
    records: Vec<ArticleRecord>,
    seen_keys: HashSet<String>,
}

impl RunContext {
    pub fn new(company: &str) -> Self {
        Self {
            company_lower: company.to_lowercase(),
            records: Vec::new(),
            seen_keys: HashSet::new(),
        }
    }

    /// Filter, fingerprint and (maybe) keep one candidate
    pub fn offer(&mut self, candidate: Candidate) -> Offer {
        let (title, url) = match (candidate.title, candidate.url) {
            (Some(title), Some(url))
                if !title.is_empty()
                    && !url.is_empty()
                    && title.to_lowercase().contains(&self.company_lower) =>
            {
                (title, url)
            }
            (title, _) => {
                debug!("Skipped article: {}", title.as_deref().unwrap_or("No title"));
                return Offer::Rejected;
            }
        };

        let key = unique_key(&title, candidate.article_para.as_deref());
        if !self.seen_keys.insert(key.clone()) {
            debug!("Duplicate article: {}", title.trim());
            return Offer::Duplicate;
        }

        debug!("Saved article: {}", title.trim());
        self.records.push(ArticleRecord {
            title: title.trim().to_string(),
            url: url.trim().to_string(),
            source: candidate.source,
            article_para: candidate
                .article_para
                .unwrap_or_else(|| NO_ARTICLE_TEXT.to_string()),
            unique_key: key,
        });
        Offer::Accepted
    }

    /// Offer every candidate of one page, in document order
    pub fn ingest(&mut self, candidates: Vec<Candidate>) -> IngestStats {
        let mut stats = IngestStats::default();
        for candidate in candidates {
            match self.offer(candidate) {
                Offer::Accepted => stats.accepted += 1,
                Offer::Rejected => stats.rejected += 1,
                Offer::Duplicate => stats.duplicates += 1,
            }
        }
        stats
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ArticleRecord> {
        self.records
    }
}

/// Crawl every start page for `company` and write the snapshot into `out_dir`
pub async fn collect(
    company: &str,
    settings: &Settings,
    out_dir: &Path,
) -> Result<CollectorReport, CollectorError> {
    let company = company.trim();
    if company.is_empty() {
        warn!("No company name provided, skipping news collection");
        return Err(CollectorError::MissingCompanyName);
    }

    let crawler =
        NewsCrawler::new(settings).map_err(|e| CollectorError::Fetch(format!("{:#}", e)))?;
    let context = crawler.crawl(company, start_urls(company)).await;
    save(company, context.records(), out_dir)
}

/// Write the run's articles as one JSON array
pub fn save(
    company: &str,
    records: &[ArticleRecord],
    out_dir: &Path,
) -> Result<CollectorReport, CollectorError> {
    let file_name = news_file_name(company);
    match write_json_file(out_dir, &file_name, records) {
        Ok(path) => {
            info!(
                "Results saved to {} with {} articles.",
                path.display(),
                records.len()
            );
            Ok(CollectorReport {
                records: records.len(),
                path,
            })
        }
        Err(e) => {
            warn!("Error while saving news JSON file: {:#}", e);
            Err(CollectorError::Persist {
                path: out_dir.join(file_name),
                reason: format!("{:#}", e),
            })
        }
    }
}
