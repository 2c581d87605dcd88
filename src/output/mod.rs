//! Output module for the crawled site model and its reports
//!
//! This module handles:
//! - Accumulating crawled pages into a `Site`
//! - Rendering the flat sitemap and the adjacency-list sitegraph
//! - Writing both reports to disk
//! - Summarising crawl statistics

mod report;
mod site;
pub mod stats;
mod traits;

pub use report::{render_sitegraph, render_sitemap, write_reports, TextReport};
pub use site::{Site, Webpage};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReportWriter};
