//! Crawl statistics
//!
//! Summarises the crawl state and the site model once a crawl has finished.

use crate::output::Site;
use crate::state::{CrawlState, PageState};
use crate::url::extract_host;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Number of URLs discovered, whatever their fate
    pub total_urls: usize,

    /// Count of URLs by state
    pub pages_by_state: HashMap<PageState, usize>,

    /// Number of pages in the site model
    pub pages_crawled: usize,

    /// Number of outbound references across crawled pages
    pub total_links: usize,

    /// Number of distinct hosts referenced from crawled pages
    pub unique_hosts: usize,
}

impl CrawlStatistics {
    /// Gathers statistics from a finished crawl
    pub fn collect(state: &CrawlState, site: &Site) -> Self {
        let unique_hosts = site
            .webpages()
            .iter()
            .flat_map(|page| page.references.iter())
            .filter_map(|reference| Url::parse(reference).ok())
            .filter_map(|url| extract_host(&url))
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_urls: state.len(),
            pages_by_state: state.count_by_state(),
            pages_crawled: site.len(),
            total_links: site.total_references(),
            unique_hosts,
        }
    }

    pub fn count(&self, state: PageState) -> usize {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Non-zero state counts in lifecycle order
    pub fn state_breakdown(&self) -> Vec<(PageState, usize)> {
        PageState::all_states()
            .into_iter()
            .map(|state| (state, self.count(state)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs discovered: {}", stats.total_urls);
    println!("  Pages crawled: {}", stats.pages_crawled);
    println!("  Links found: {}", stats.total_links);
    println!("  Hosts referenced: {}", stats.unique_hosts);
    println!();

    println!("URLs by State:");
    for (state, count) in stats.state_breakdown() {
        let percentage = if stats.total_urls > 0 {
            (count as f64 / stats.total_urls as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    let failed = stats.count(PageState::Failed);
    if failed > 0 {
        println!("{} URLs could not be fetched (see warnings above)", failed);
    }
}
