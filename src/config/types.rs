use serde::Deserialize;

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the compiled-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub filters: FilterConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// The URL the crawl starts from; its host bounds the crawl scope
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum link distance from the seed that is still fetched
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Minimum time between two fetches launched against the same host (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Size of the fetch worker pool
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Capacity of the filtered-URL queue feeding the dispatcher
    #[serde(rename = "dispatch-queue-capacity")]
    pub dispatch_queue_capacity: usize,

    /// Upper bound on a single fetch (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// How often crawl progress is logged (milliseconds)
    #[serde(rename = "status-interval-ms")]
    pub status_interval_ms: u64,

    /// Upper bound on the whole crawl (seconds, 0 = unlimited)
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: u64,

    /// Whether crawled pages are accumulated into the site model
    #[serde(rename = "collect-pages")]
    pub collect_pages: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: "https://monzo.com/".to_string(),
            max_depth: 2,
            politeness_delay_ms: 2000,
            max_concurrent_fetches: 8,
            dispatch_queue_capacity: 64,
            fetch_timeout_secs: 30,
            status_interval_ms: 2000,
            crawl_timeout_secs: 0,
            collect_pages: true,
        }
    }
}

/// Link filter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Path prefixes that are never crawled
    #[serde(rename = "excluded-paths")]
    pub excluded_paths: Vec<String>,

    /// Host fragments that are never crawled
    #[serde(rename = "excluded-subdomains")]
    pub excluded_subdomains: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_paths: ["/cdn-cgi", "/legal", "/static", "/blog"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_subdomains: ["www.monzo.com", "community.monzo.com", "status.monzo.com"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitegraph".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the flat sitemap file
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: String,

    /// Path of the adjacency-list sitegraph file
    #[serde(rename = "sitegraph-path")]
    pub sitegraph_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: "sitemap.txt".to_string(),
            sitegraph_path: "sitegraph.txt".to_string(),
        }
    }
}
