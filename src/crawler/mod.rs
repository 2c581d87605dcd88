//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML link extraction behind the [`LinkExtractor`] trait
//! - Per-host politeness pacing
//! - The concurrent crawl engine and its quiescence tracking

mod engine;
mod fetcher;
mod parser;
mod pacer;
mod tracker;

pub use engine::{CrawlOutcome, Engine};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use pacer::Pacer;
pub use parser::{ExtractError, HtmlLinkExtractor, LinkExtractor};
pub use tracker::{WorkGuard, WorkTracker};

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It builds the HTTP
/// client from the config, crawls from the seed until no work remains, and
/// returns the collected site together with the final crawl state.
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed, was cancelled, or timed out
/// * `Err(CrawlError)` - Crawl could not start
pub async fn crawl(config: Config) -> Result<CrawlOutcome, CrawlError> {
    Engine::from_config(config)?.run().await
}
