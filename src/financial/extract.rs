//! Field extraction for the two quote pages
//!
//! Yahoo fields come from a fixed field → locator table and always produce a
//! value (`"No data found"` when nothing matches). Google fields come from the
//! key-stats rows, whose human-readable label is mapped back to a field name;
//! rows with unknown labels are ignored.

use scraper::{ElementRef, Html};

use super::{FinancialRecord, QuoteSource, NO_DATA_FOUND};
use crate::error::CollectorError;
use crate::scraping::{element_text, selector};

/// Where a Yahoo field lives on the quote page
#[derive(Debug, Clone, Copy)]
enum YahooLocator {
    /// `fin-streamer[data-field="..."]`
    Streamer(&'static str),
    /// The `span` right after a `span` whose text contains the label
    Labelled(&'static str),
}

const YAHOO_FIELDS: &[(&str, YahooLocator)] = &[
    ("stock_price", YahooLocator::Streamer("regularMarketPrice")),
    ("market_cap", YahooLocator::Streamer("marketCap")),
    ("pe_ratio", YahooLocator::Streamer("trailingPE")),
    ("fifty_two_week_range", YahooLocator::Streamer("fiftyTwoWeekRange")),
    ("dividend_yield", YahooLocator::Labelled("Forward Dividend & Yield")),
    ("earnings_date", YahooLocator::Labelled("Earnings Date")),
    ("ex_dividend_date", YahooLocator::Labelled("Ex-Dividend Date")),
    ("target_price", YahooLocator::Streamer("targetMeanPrice")),
    ("avg_volume", YahooLocator::Streamer("averageVolume")),
];

const GOOGLE_LABELS: &[(&str, &str)] = &[
    ("Market cap", "market_cap"),
    ("Avg Volume", "avg_volume"),
    ("P/E ratio", "pe_ratio"),
    ("Dividend yield", "dividend_yield"),
    ("Primary exchange", "primary_exchange"),
    ("Previous close", "previous_close"),
    ("Day range", "day_range"),
    ("Year range", "year_range"),
];

pub fn extract_yahoo(html: &str) -> Result<FinancialRecord, CollectorError> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut record = FinancialRecord::new(QuoteSource::YahooFinance);

    for (field, locator) in YAHOO_FIELDS {
        let value = match locator {
            YahooLocator::Streamer(data_field) => {
                let css = format!("fin-streamer[data-field=\"{}\"]", data_field);
                root.select(&selector(&css)?).next().map(element_text)
            }
            YahooLocator::Labelled(label) => labelled_value(root, label)?,
        };
        record.insert(field, value.unwrap_or_else(|| NO_DATA_FOUND.to_string()));
    }

    Ok(record)
}

// First span (document order) whose previous element sibling is a span
// containing `label`.
fn labelled_value(root: ElementRef<'_>, label: &str) -> Result<Option<String>, CollectorError> {
    let span = selector("span")?;
    Ok(root
        .select(&span)
        .find(|candidate| {
            candidate
                .prev_siblings()
                .find_map(ElementRef::wrap)
                .is_some_and(|prev| {
                    prev.value().name() == "span" && element_text(prev).contains(label)
                })
        })
        .map(element_text))
}

pub fn extract_google(html: &str) -> Result<FinancialRecord, CollectorError> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut record = FinancialRecord::new(QuoteSource::GoogleFinance);

    let price = selector("div[jsname=\"ip75Cb\"] > div.YMlKec.fxKbKc")?;
    if let Some(el) = root.select(&price).next() {
        record.insert("stock_price", element_text(el));
    }

    let row_sel = selector("div.gyFHrc")?;
    let label_sel = selector("div.mfs7Fc")?;
    let value_sel = selector("div.P6K39c")?;

    for row in root.select(&row_sel) {
        let (Some(label), Some(value)) = (
            row.select(&label_sel).next(),
            row.select(&value_sel).next(),
        ) else {
            continue;
        };
        let label = element_text(label);
        if let Some((_, field)) = GOOGLE_LABELS.iter().find(|(l, _)| *l == label) {
            record.insert(field, element_text(value));
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAHOO_PAGE: &str = r#"
        <html><body>
          <fin-streamer data-field="regularMarketPrice"> 227.48 </fin-streamer>
          <fin-streamer data-field="marketCap">3.45T</fin-streamer>
          <fin-streamer data-field="fiftyTwoWeekRange">164.08 - 237.49</fin-streamer>
          <ul>
            <li><span class="label">Earnings Date</span><span class="value">Oct 31, 2024</span></li>
            <li><span class="label">Forward Dividend &amp; Yield</span><span class="value">1.00 (0.44%)</span></li>
          </ul>
        </body></html>"#;

    const GOOGLE_PAGE: &str = r#"
        <html><body>
          <div jsname="ip75Cb"><div class="YMlKec fxKbKc">$227.48</div></div>
          <div class="gyFHrc"><div class="mfs7Fc">Previous close</div><div class="P6K39c">$226.80</div></div>
          <div class="gyFHrc"><div class="mfs7Fc">Market cap</div><div class="P6K39c">3.45T USD</div></div>
          <div class="gyFHrc"><div class="mfs7Fc">CDP Climate Change Score</div><div class="P6K39c">A-</div></div>
          <div class="gyFHrc"><div class="mfs7Fc">Year range</div></div>
        </body></html>"#;

    #[test]
    fn test_yahoo_fills_every_field_with_sentinel_fallback() {
        let record = extract_yahoo(YAHOO_PAGE).unwrap();
        assert_eq!(record.source(), QuoteSource::YahooFinance);
        assert_eq!(record.get("stock_price"), Some("227.48"));
        assert_eq!(record.get("market_cap"), Some("3.45T"));
        assert_eq!(record.get("fifty_two_week_range"), Some("164.08 - 237.49"));
        assert_eq!(record.get("earnings_date"), Some("Oct 31, 2024"));
        assert_eq!(record.get("dividend_yield"), Some("1.00 (0.44%)"));
        assert_eq!(record.get("pe_ratio"), Some(NO_DATA_FOUND));
        assert_eq!(record.get("ex_dividend_date"), Some(NO_DATA_FOUND));
        assert_eq!(record.get("target_price"), Some(NO_DATA_FOUND));
        assert_eq!(record.len(), YAHOO_FIELDS.len());
    }

    #[test]
    fn test_yahoo_empty_page_is_all_sentinels() {
        let record = extract_yahoo("<html></html>").unwrap();
        assert!(record.values().all(|v| v == NO_DATA_FOUND));
    }

    #[test]
    fn test_google_maps_known_labels_and_drops_the_rest() {
        let record = extract_google(GOOGLE_PAGE).unwrap();
        assert_eq!(record.source(), QuoteSource::GoogleFinance);
        assert_eq!(record.get("stock_price"), Some("$227.48"));
        assert_eq!(record.get("previous_close"), Some("$226.80"));
        assert_eq!(record.get("market_cap"), Some("3.45T USD"));
        assert_eq!(record.get("year_range"), None);
        assert_eq!(record.get("pe_ratio"), None);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_google_without_price_omits_field() {
        let record = extract_google("<div class=\"gyFHrc\"></div>").unwrap();
        assert!(record.is_empty());
    }
}
