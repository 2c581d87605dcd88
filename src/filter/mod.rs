//! Link filter chain
//!
//! A discovered URL is only scheduled for fetching when every registered
//! filter accepts it. Filters are pure predicates over the candidate URL and
//! the crawl configuration; they never touch crawl state.

mod rules;

pub use rules::{PathFilter, ScopeFilter, SubdomainFilter};

use crate::config::Config;
use url::Url;

/// Name reported when a candidate cannot be parsed as a URL
pub const UNPARSEABLE: &str = "unparseable";

/// A single predicate in the filter chain
pub trait UrlFilter: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Returns true if the URL may proceed to fetching
    fn accepts(&self, url: &Url, config: &Config) -> bool;
}

/// Ordered conjunction of filters
///
/// Evaluation stops at the first filter that rejects. Since every filter is
/// a pure boolean predicate, the order only affects how much work is done,
/// never the outcome.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn UrlFilter>>,
}

impl FilterChain {
    /// Creates an empty chain, which accepts every parseable URL
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: scope, excluded paths, excluded subdomains
    ///
    /// The scope is taken from the configured seed.
    pub fn default_chain(config: &Config) -> Self {
        Self::new()
            .with_filter(ScopeFilter::from_config(config))
            .with_filter(PathFilter)
            .with_filter(SubdomainFilter)
    }

    /// Appends a filter to the chain
    pub fn with_filter(mut self, filter: impl UrlFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the registered filters, in evaluation order
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns true iff the URL parses and every filter accepts it
    pub fn passes(&self, url: &str, config: &Config) -> bool {
        self.first_rejection(url, config).is_none()
    }

    /// Returns the name of the first filter rejecting the URL, if any
    ///
    /// Malformed URLs are reported as [`UNPARSEABLE`] rather than treated as
    /// errors.
    pub fn first_rejection(&self, url: &str, config: &Config) -> Option<&str> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return Some(UNPARSEABLE),
        };

        self.filters
            .iter()
            .find(|filter| !filter.accepts(&parsed, config))
            .map(|filter| filter.name())
    }
}
