//! Tidings - company news and quote collector
//!
//! Crawls a fixed set of news sites for articles about a company and scrapes
//! two finance quote pages for its ticker, writing both as JSON snapshots.

pub mod config;
pub mod error;
pub mod financial;
pub mod news;
pub mod runner;
pub mod scraping;
pub mod ui;
pub mod utils;
