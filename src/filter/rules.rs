//! The three standard filters

use super::UrlFilter;
use crate::config::Config;
use crate::url::{extract_host, is_same_or_subdomain};
use url::Url;

/// Keeps the crawl on the seed's host and its subdomains
///
/// The seed host is resolved once; a seed without a host rejects everything.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    seed_host: Option<String>,
}

impl ScopeFilter {
    pub fn new(seed_url: &str) -> Self {
        let seed_host = Url::parse(seed_url).ok().as_ref().and_then(extract_host);
        Self { seed_host }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.crawler.seed_url)
    }
}

impl UrlFilter for ScopeFilter {
    fn name(&self) -> &str {
        "scope"
    }

    fn accepts(&self, url: &Url, _config: &Config) -> bool {
        match (&self.seed_host, extract_host(url)) {
            (Some(seed_host), Some(host)) => is_same_or_subdomain(seed_host, &host),
            _ => false,
        }
    }
}

/// Rejects URLs whose path starts with an excluded prefix
pub struct PathFilter;

impl UrlFilter for PathFilter {
    fn name(&self) -> &str {
        "path"
    }

    fn accepts(&self, url: &Url, config: &Config) -> bool {
        let path = url.path();
        !config
            .filters
            .excluded_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Rejects URLs whose host contains a denylisted subdomain
pub struct SubdomainFilter;

impl UrlFilter for SubdomainFilter {
    fn name(&self) -> &str {
        "subdomain"
    }

    fn accepts(&self, url: &Url, config: &Config) -> bool {
        let host = url.host_str().unwrap_or_default();
        !config
            .filters
            .excluded_subdomains
            .iter()
            .any(|denied| host.contains(denied.as_str()))
    }
}
