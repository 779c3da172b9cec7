// Fetch layer and crawl loop for the news collector.
//
// Page fetches run as tokio tasks bounded by a semaphore and paced per host by
// the throttle. Fetched pages come back to the crawl loop, which extracts them
// one at a time into the run context and schedules any "next" page.

use anyhow::Context;
use reqwest::{Client, Url};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::sites::parse_page;
use super::throttle::Throttle;
use super::RunContext;
use crate::config::{FetchSettings, Settings};
use crate::error::Result;

/// A successfully fetched page, keyed by its final (post-redirect) URL
#[derive(Debug)]
pub struct FetchedPage {
    pub url: Url,
    pub body: String,
}

/// Counters for one crawl, logged at the end of the run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub pages_unparsed: usize,
}

pub struct NewsCrawler {
    client: Client,
    fetch: Arc<FetchSettings>,
    throttle: Arc<Throttle>,
    semaphore: Arc<Semaphore>,
}

impl NewsCrawler {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.fetch.user_agent.as_str())
            .timeout(settings.fetch.download_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            fetch: Arc::new(settings.fetch.clone()),
            throttle: Arc::new(Throttle::new(&settings.fetch, &settings.autothrottle)),
            semaphore: Arc::new(Semaphore::new(settings.fetch.concurrent_requests)),
        })
    }

    /// Crawl `start_urls` and everything reachable through "next" links
    pub async fn crawl(&self, company: &str, start_urls: Vec<String>) -> RunContext {
        let (context, stats) = self.crawl_with_stats(company, start_urls).await;
        info!(
            "News crawl finished: {} page(s) fetched, {} failed, {} unparsed, {} article(s) kept",
            stats.pages_fetched,
            stats.pages_failed,
            stats.pages_unparsed,
            context.records().len()
        );
        context
    }

    pub async fn crawl_with_stats(
        &self,
        company: &str,
        start_urls: Vec<String>,
    ) -> (RunContext, CrawlStats) {
        let mut context = RunContext::new(company);
        let mut stats = CrawlStats::default();
        let mut requested: HashSet<String> = HashSet::new();
        let mut join_set = JoinSet::new();

        for raw in start_urls {
            match Url::parse(&raw) {
                Ok(url) => self.schedule(&mut join_set, &mut requested, url),
                Err(e) => warn!("Ignoring invalid start URL {}: {}", raw, e),
            }
        }

        while let Some(joined) = join_set.join_next().await {
            let page = match joined {
                Ok(Ok(page)) => page,
                Ok(Err(err)) => {
                    warn!("Page fetch failed: {:#}", err);
                    stats.pages_failed += 1;
                    continue;
                }
                Err(err) => {
                    warn!("Page fetch task failed: {}", err);
                    stats.pages_failed += 1;
                    continue;
                }
            };
            stats.pages_fetched += 1;
            info!("Scraping URL: {}", page.url);

            let parsed = match parse_page(&page.body, &page.url) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!("Failed to parse {}: {}", page.url, err);
                    stats.pages_unparsed += 1;
                    continue;
                }
            };

            let ingest = context.ingest(parsed.candidates);
            debug!(
                "{}: {} accepted, {} skipped, {} duplicate(s)",
                page.url, ingest.accepted, ingest.rejected, ingest.duplicates
            );

            if let Some(next) = parsed.next_page {
                info!("Following next page: {}", next);
                self.schedule(&mut join_set, &mut requested, next);
            }
        }

        (context, stats)
    }

    fn schedule(
        &self,
        join_set: &mut JoinSet<Result<FetchedPage>>,
        requested: &mut HashSet<String>,
        url: Url,
    ) {
        if !requested.insert(url.as_str().to_string()) {
            debug!("Already requested {}, not fetching again", url);
            return;
        }

        let client = self.client.clone();
        let fetch = self.fetch.clone();
        let throttle = self.throttle.clone();
        let semaphore = self.semaphore.clone();
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .context("Fetch semaphore closed")?;
            fetch_page(&client, &fetch, &throttle, url).await
        });
    }
}

/// GET a page, retrying network errors and retryable statuses.
///
/// Non-success statuses that are not retryable are errors; the page is dropped.
pub async fn fetch_page(
    client: &Client,
    fetch: &FetchSettings,
    throttle: &Throttle,
    url: Url,
) -> Result<FetchedPage> {
    let host = url.host_str().unwrap_or_default().to_string();
    let max_attempts = fetch.retry_times + 1;

    let mut attempt = 0;
    loop {
        attempt += 1;
        throttle.acquire(&host).await;
        let started = Instant::now();
        let resp = client.get(url.clone()).send().await;

        match resp {
            Ok(resp) => {
                let status = resp.status();
                throttle
                    .record(&host, started.elapsed(), status.as_u16())
                    .await;
                if status.is_success() {
                    let final_url = resp.url().clone();
                    let body = resp
                        .text()
                        .await
                        .with_context(|| format!("failed reading response for {}", url))?;
                    return Ok(FetchedPage {
                        url: final_url,
                        body,
                    });
                }
                if !fetch.is_retryable_status(status.as_u16()) {
                    anyhow::bail!("request to {} returned {}", url, status);
                }
                if attempt >= max_attempts {
                    anyhow::bail!(
                        "request to {} still failing after {} attempts ({})",
                        url,
                        attempt,
                        status
                    );
                }
                debug!("Retrying {} ({}), attempt {}", url, status, attempt + 1);
            }
            Err(err) => {
                if attempt >= max_attempts {
                    return Err(err).with_context(|| format!("request failed for {}", url));
                }
                debug!("Retrying {} ({}), attempt {}", url, err, attempt + 1);
            }
        }
    }
}
