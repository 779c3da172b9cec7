//! Per-site extraction rules for news search pages
//!
//! Each supported site gets a container selector plus sub-selectors for the
//! title, link and lead paragraph. Pages from unknown hosts fall back to the
//! Google News rule, which treats every anchor as a candidate.

use reqwest::Url;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::{Candidate, NewsSource, NO_ARTICLE_TEXT};
use crate::error::CollectorError;
use crate::scraping::{all_text, first_attr, first_text, own_text, selector};

/// Site classification of a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    PressGazette,
    Bbc,
    EconomicTimes,
    NdtvProfit,
    TrakIn,
    GoogleNewsFallback,
}

/// Host substrings in matching priority order
const HOST_RULES: &[(&str, Site)] = &[
    ("pressgazette.co.uk", Site::PressGazette),
    ("bbc.co.uk", Site::Bbc),
    ("economictimes.indiatimes.com", Site::EconomicTimes),
    ("ndtvprofit.com", Site::NdtvProfit),
    ("trak.in", Site::TrakIn),
];

const NEXT_PAGE: &str = "a.next";

impl Site {
    /// Classify a page by its URL; first matching host wins
    pub fn classify(url: &str) -> Site {
        HOST_RULES
            .iter()
            .find(|(host, _)| url.contains(host))
            .map(|(_, site)| *site)
            .unwrap_or(Site::GoogleNewsFallback)
    }
}

/// Candidates and pagination found on one page
#[derive(Debug)]
pub struct ParsedPage {
    pub site: Site,
    pub candidates: Vec<Candidate>,
    pub next_page: Option<Url>,
}

/// Classify, extract and look for a "next" link in one fetched page
pub fn parse_page(html: &str, page_url: &Url) -> Result<ParsedPage, CollectorError> {
    let site = Site::classify(page_url.as_str());
    let document = Html::parse_document(html);
    let root = document.root_element();

    let candidates = extract(site, root, page_url)?;
    debug!(
        "{:?} page {} yielded {} candidate(s)",
        site,
        page_url,
        candidates.len()
    );

    let next_page = first_attr(root, &selector(NEXT_PAGE)?, "href")
        .and_then(|href| page_url.join(href.trim()).ok());

    Ok(ParsedPage {
        site,
        candidates,
        next_page,
    })
}

/// Run the extraction rule for `site` over a parsed document
pub fn extract(
    site: Site,
    root: ElementRef<'_>,
    page_url: &Url,
) -> Result<Vec<Candidate>, CollectorError> {
    match site {
        Site::PressGazette => press_gazette(root),
        Site::Bbc => bbc(root, page_url),
        Site::EconomicTimes => economic_times(root, page_url),
        Site::NdtvProfit => ndtv_profit(root, page_url),
        Site::TrakIn => trak_in(root),
        Site::GoogleNewsFallback => google_news(root, page_url),
    }
}

fn press_gazette(root: ElementRef<'_>) -> Result<Vec<Candidate>, CollectorError> {
    let container = selector("h3.post-title.c-story__header__headline--catalogue")?;
    let link = selector("a")?;
    let subtitle = selector("p.c-story__header__subtitle")?;

    Ok(root
        .select(&container)
        .map(|article| Candidate {
            source: NewsSource::PressGazette,
            title: first_text(article, &link),
            url: first_attr(article, &link, "href"),
            article_para: first_text(article, &subtitle),
        })
        .collect())
}

fn bbc(root: ElementRef<'_>, page_url: &Url) -> Result<Vec<Candidate>, CollectorError> {
    let container = selector("div.ssrcss-1f3bvyz-Stack.e1y4nx260")?;
    let title = selector("a.ssrcss-its5xf-PromoLink span")?;
    let link = selector("a.ssrcss-its5xf-PromoLink")?;
    let para = selector("p.ssrcss-1q0x1qg-Paragraph.e1jhz7w10")?;

    Ok(root
        .select(&container)
        .map(|promo| Candidate {
            source: NewsSource::Bbc,
            title: first_text(promo, &title),
            url: first_attr(promo, &link, "href").map(|href| resolve_relative(page_url, href)),
            article_para: Some(
                first_text(promo, &para).unwrap_or_else(|| NO_ARTICLE_TEXT.to_string()),
            ),
        })
        .collect())
}

fn economic_times(root: ElementRef<'_>, page_url: &Url) -> Result<Vec<Candidate>, CollectorError> {
    let container = selector("div.clr.flt.topicstry.story_list")?;
    let link = selector("a.wrapLines.l2")?;
    let para = selector("div.contentD p")?;

    Ok(root
        .select(&container)
        .map(|article| {
            let joined = all_text(article, &para).join(" ");
            let joined = joined.trim();
            Candidate {
                source: NewsSource::EconomicTimes,
                title: first_attr(article, &link, "title"),
                url: first_attr(article, &link, "href")
                    .map(|href| resolve_relative(page_url, href)),
                article_para: Some(if joined.is_empty() {
                    NO_ARTICLE_TEXT.to_string()
                } else {
                    joined.to_string()
                }),
            }
        })
        .collect())
}

// The card's headline doubles as the paragraph; search results carry no snippet.
fn ndtv_profit(root: ElementRef<'_>, page_url: &Url) -> Result<Vec<Candidate>, CollectorError> {
    let container =
        selector("a.card-with-author-date-time-headline-m__search-single-result__VzvTc")?;
    let headline =
        selector("span.card-with-author-date-time-headline-m__story-details-headline__5nTSC")?;

    Ok(root
        .select(&container)
        .map(|card| {
            let title = first_text(card, &headline);
            Candidate {
                source: NewsSource::NdtvProfit,
                url: card
                    .value()
                    .attr("href")
                    .and_then(|href| page_url.join(href.trim()).ok())
                    .map(String::from),
                article_para: title.clone(),
                title,
            }
        })
        .collect())
}

fn trak_in(root: ElementRef<'_>) -> Result<Vec<Candidate>, CollectorError> {
    let container = selector("div.blog-card-simple")?;
    let link = selector("h3.blog-title a")?;
    let para = selector("div.content p")?;

    Ok(root
        .select(&container)
        .map(|article| Candidate {
            source: NewsSource::TrakIn,
            title: first_text(article, &link),
            url: first_attr(article, &link, "href"),
            article_para: Some(
                first_text(article, &para).unwrap_or_else(|| NO_ARTICLE_TEXT.to_string()),
            ),
        })
        .collect())
}

fn google_news(root: ElementRef<'_>, page_url: &Url) -> Result<Vec<Candidate>, CollectorError> {
    let anchor = selector("a")?;

    Ok(root
        .select(&anchor)
        .map(|link| {
            let text = own_text(link);
            Candidate {
                source: NewsSource::GoogleNews,
                url: link
                    .value()
                    .attr("href")
                    .map(|href| resolve_relative(page_url, href.to_string())),
                article_para: text.clone(),
                title: text,
            }
        })
        .collect())
}

/// Join `href` onto the page URL unless it already carries an http(s) scheme
fn resolve_relative(page_url: &Url, href: String) -> String {
    if href.starts_with("http") {
        return href;
    }
    match page_url.join(href.trim()) {
        Ok(url) => url.to_string(),
        Err(_) => href,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_classify_priority_and_fallback() {
        assert_eq!(
            Site::classify("https://pressgazette.co.uk/?s=apple"),
            Site::PressGazette
        );
        assert_eq!(Site::classify("https://www.bbc.co.uk/search?q=apple"), Site::Bbc);
        assert_eq!(
            Site::classify("https://economictimes.indiatimes.com/topic/apple-news"),
            Site::EconomicTimes
        );
        assert_eq!(
            Site::classify("https://www.ndtvprofit.com/search?q=apple"),
            Site::NdtvProfit
        );
        assert_eq!(
            Site::classify("https://trak.in/stories/search/apple"),
            Site::TrakIn
        );
        assert_eq!(
            Site::classify("https://news.google.com/search?q=apple"),
            Site::GoogleNewsFallback
        );
        // Press Gazette is checked before BBC
        assert_eq!(
            Site::classify("https://pressgazette.co.uk/bbc.co.uk-story"),
            Site::PressGazette
        );
    }

    #[test]
    fn test_press_gazette_keeps_href_and_missing_subtitle() {
        let html = r#"
            <h3 class="post-title c-story__header__headline--catalogue">
                <a href="/news/acme-layoffs/">Acme cuts jobs</a>
                <p class="c-story__header__subtitle">Newsroom shrinks</p>
            </h3>
            <h3 class="post-title c-story__header__headline--catalogue">
                <a href="https://pressgazette.co.uk/acme-2/">Acme again</a>
            </h3>"#;
        let page = parse_page(html, &url("https://pressgazette.co.uk/?s=acme")).unwrap();
        assert_eq!(page.site, Site::PressGazette);
        assert_eq!(page.candidates.len(), 2);
        assert_eq!(page.candidates[0].title.as_deref(), Some("Acme cuts jobs"));
        assert_eq!(page.candidates[0].url.as_deref(), Some("/news/acme-layoffs/"));
        assert_eq!(
            page.candidates[0].article_para.as_deref(),
            Some("Newsroom shrinks")
        );
        assert_eq!(page.candidates[1].article_para, None);
    }

    #[test]
    fn test_bbc_resolves_relative_links_and_defaults_paragraph() {
        let html = r#"
            <div class="ssrcss-1f3bvyz-Stack e1y4nx260">
                <a class="ssrcss-its5xf-PromoLink" href="/news/business-1"><span>Acme profits soar</span></a>
                <p class="ssrcss-1q0x1qg-Paragraph e1jhz7w10">Quarterly results beat forecasts.</p>
            </div>
            <div class="ssrcss-1f3bvyz-Stack e1y4nx260">
                <a class="ssrcss-its5xf-PromoLink" href="https://www.bbc.com/news/2"><span>Acme recall</span></a>
            </div>"#;
        let page = parse_page(html, &url("https://www.bbc.co.uk/search?q=acme")).unwrap();
        let c = &page.candidates;
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].url.as_deref(), Some("https://www.bbc.co.uk/news/business-1"));
        assert_eq!(
            c[0].article_para.as_deref(),
            Some("Quarterly results beat forecasts.")
        );
        assert_eq!(c[1].url.as_deref(), Some("https://www.bbc.com/news/2"));
        assert_eq!(c[1].article_para.as_deref(), Some(NO_ARTICLE_TEXT));
    }

    #[test]
    fn test_economic_times_uses_title_attribute_and_joins_paragraphs() {
        let html = r#"
            <div class="clr flt topicstry story_list">
                <a class="wrapLines l2" title="Acme shares jump" href="/markets/acme.cms">Acme...</a>
                <div class="contentD"><p>First part.</p><p>Second part.</p></div>
            </div>
            <div class="clr flt topicstry story_list">
                <a class="wrapLines l2" title="Acme IPO" href="/ipo/acme.cms"></a>
            </div>"#;
        let page = parse_page(
            html,
            &url("https://economictimes.indiatimes.com/topic/acme-news"),
        )
        .unwrap();
        let c = &page.candidates;
        assert_eq!(c[0].title.as_deref(), Some("Acme shares jump"));
        assert_eq!(
            c[0].url.as_deref(),
            Some("https://economictimes.indiatimes.com/markets/acme.cms")
        );
        assert_eq!(c[0].article_para.as_deref(), Some("First part. Second part."));
        assert_eq!(c[1].article_para.as_deref(), Some(NO_ARTICLE_TEXT));
    }

    #[test]
    fn test_ndtv_profit_uses_headline_as_paragraph() {
        let html = r#"
            <a class="card-with-author-date-time-headline-m__search-single-result__VzvTc" href="/business/acme-deal">
                <span class="card-with-author-date-time-headline-m__story-details-headline__5nTSC">Acme signs deal</span>
            </a>
            <a class="card-with-author-date-time-headline-m__search-single-result__VzvTc" href="/business/untitled"></a>"#;
        let page = parse_page(html, &url("https://www.ndtvprofit.com/search?q=acme")).unwrap();
        let c = &page.candidates;
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].title.as_deref(), Some("Acme signs deal"));
        assert_eq!(c[0].article_para, c[0].title);
        assert_eq!(
            c[0].url.as_deref(),
            Some("https://www.ndtvprofit.com/business/acme-deal")
        );
        assert_eq!(c[1].title, None);
        assert_eq!(c[1].article_para, None);
    }

    #[test]
    fn test_trak_in_rule() {
        let html = r#"
            <div class="blog-card-simple">
                <h3 class="blog-title"><a href="https://trak.in/stories/acme">Acme funding round</a></h3>
                <div class="content"><p>Startup raises money.</p></div>
            </div>
            <div class="blog-card-simple">
                <h3 class="blog-title"><a href="/stories/acme-2">Acme expands</a></h3>
            </div>"#;
        let page = parse_page(html, &url("https://trak.in/stories/search/acme")).unwrap();
        let c = &page.candidates;
        assert_eq!(c[0].article_para.as_deref(), Some("Startup raises money."));
        assert_eq!(c[1].url.as_deref(), Some("/stories/acme-2"));
        assert_eq!(c[1].article_para.as_deref(), Some(NO_ARTICLE_TEXT));
    }

    #[test]
    fn test_google_fallback_takes_every_anchor() {
        let html = r#"
            <a href="./articles/abc">Acme launches product</a>
            <a href="https://example.com/x">Weather today</a>
            <a href="/no-text"><img src="x.png"></a>"#;
        let page = parse_page(html, &url("https://news.google.com/search?q=acme")).unwrap();
        let c = &page.candidates;
        assert_eq!(page.site, Site::GoogleNewsFallback);
        assert_eq!(c.len(), 3);
        assert_eq!(c[0].url.as_deref(), Some("https://news.google.com/articles/abc"));
        assert_eq!(c[0].article_para, c[0].title);
        assert_eq!(c[2].title, None);
        assert!(c.iter().all(|cand| cand.source == NewsSource::GoogleNews));
    }

    #[test]
    fn test_next_page_is_resolved_against_page_url() {
        let html = r#"<div></div><a class="next" href="?s=acme&paged=2">Next</a>"#;
        let page = parse_page(html, &url("https://pressgazette.co.uk/?s=acme")).unwrap();
        assert_eq!(
            page.next_page.map(|u| u.to_string()).as_deref(),
            Some("https://pressgazette.co.uk/?s=acme&paged=2")
        );

        let page = parse_page("<a href=\"/x\">x</a>", &url("https://trak.in/")).unwrap();
        assert!(page.next_page.is_none());
    }
}
