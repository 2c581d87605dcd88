//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from seed to written reports.

use sitegraph::config::{Config, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig};
use sitegraph::crawler::{crawl, Engine, FetchError, Fetcher};
use sitegraph::output::{render_sitegraph, render_sitemap, ReportWriter, TextReport};
use sitegraph::state::PageState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from the given seed
fn create_test_config(seed: &str, output_dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed.to_string(),
            max_depth: 2,
            politeness_delay_ms: 0,
            max_concurrent_fetches: 4,
            dispatch_queue_capacity: 8,
            fetch_timeout_secs: 5,
            status_interval_ms: 100,
            crawl_timeout_secs: 30,
            collect_pages: true,
        },
        filters: FilterConfig {
            excluded_paths: vec!["/blog".to_string(), "/static".to_string()],
            excluded_subdomains: vec![],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.test/contact".to_string(),
        },
        output: OutputConfig {
            sitemap_path: output_dir
                .path()
                .join("sitemap.txt")
                .display()
                .to_string(),
            sitegraph_path: output_dir
                .path()
                .join("sitegraph.txt")
                .display()
                .to_string(),
        },
    }
}

fn html_page(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            anchors
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(links))
        .mount(server)
        .await;
}

/// Number of GET requests the server received for a path
async fn request_count(server: &MockServer, page_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == page_path)
        .count()
}

/// In-memory transport for scenarios that need hosts a mock server can't be
#[derive(Default)]
struct MapFetcher {
    pages: HashMap<String, String>,
    fetches: Mutex<Vec<String>>,
}

impl MapFetcher {
    fn page(mut self, url: &str, links: &[&str]) -> Self {
        let anchors: String = links
            .iter()
            .map(|href| format!(r#"<a href="{}">x</a>"#, href))
            .collect();
        self.pages
            .insert(url.to_string(), format!("<body>{}</body>", anchors));
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for MapFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.fetches.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

#[tokio::test]
async fn test_end_to_end_scope_scenario() {
    let output_dir = TempDir::new().unwrap();
    let config = create_test_config("https://example.test/", &output_dir);
    let fetcher = Arc::new(
        MapFetcher::default()
            .page("https://example.test/", &["/a", "https://other.test/b"])
            .page("https://example.test/a", &[]),
    );

    let outcome = Engine::new(config.clone(), fetcher.clone())
        .run()
        .await
        .unwrap();

    let mut fetched = fetcher.fetched();
    fetched.sort();
    assert_eq!(
        fetched,
        vec!["https://example.test/", "https://example.test/a"]
    );

    let report = TextReport::from_config(&config.output);
    report.write_report(&outcome.site).unwrap();

    let sitemap = std::fs::read_to_string(report.sitemap_path()).unwrap();
    let mut nodes: Vec<&str> = sitemap.lines().collect();
    nodes.sort();
    assert_eq!(nodes, vec!["https://example.test/", "https://example.test/a"]);

    let sitegraph = std::fs::read_to_string(report.sitegraph_path()).unwrap();
    assert!(sitegraph.contains("https://example.test/\n-> https://example.test/a\n"));
    assert!(!sitegraph
        .lines()
        .any(|line| line == "https://other.test/b"));
    assert_eq!(
        outcome.state.state("https://other.test/b"),
        Some(PageState::Rejected)
    );
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    let absolute_page1 = format!("{}/page1", base_url);
    mount_page(
        &mock_server,
        "/",
        &[
            absolute_page1.as_str(),
            "/page2",
            "/blog/post",
            "#top",
        ],
    )
    .await;
    mount_page(&mock_server, "/page1", &["/page3", "/"]).await;
    mount_page(&mock_server, "/page2", &["page1"]).await;
    mount_page(&mock_server, "/page3", &["/page4"]).await;
    mount_page(&mock_server, "/page4", &[]).await;

    let config = create_test_config(&format!("{}/", base_url), &output_dir);
    let outcome = crawl(config).await.expect("crawl should succeed");

    assert!(outcome.quiesced);

    let mut crawled: Vec<String> = outcome
        .site
        .webpages()
        .iter()
        .map(|page| page.url.clone())
        .collect();
    crawled.sort();
    assert_eq!(
        crawled,
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            format!("{}/page3", base_url),
        ]
    );

    // Depth 3 is discovered but never fetched; excluded paths never leave
    // the filter stage
    assert_eq!(request_count(&mock_server, "/page4").await, 0);
    assert_eq!(request_count(&mock_server, "/blog/post").await, 0);
    assert_eq!(
        outcome.state.state(&format!("{}/page4", base_url)),
        Some(PageState::DepthExceeded)
    );
    assert_eq!(
        outcome.state.state(&format!("{}/blog/post", base_url)),
        Some(PageState::Rejected)
    );

    // Each page is fetched exactly once even though several link to it
    for page in ["/", "/page1", "/page2", "/page3"] {
        assert_eq!(request_count(&mock_server, page).await, 1, "{}", page);
    }
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.test/contact)",
        ))
        .respond_with(html_page(&[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), &output_dir);
    let outcome = crawl(config).await.unwrap();

    assert_eq!(outcome.site.len(), 1);
}

#[tokio::test]
async fn test_server_errors_are_abandoned() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", &["/broken", "/gone", "/ok"]).await;
    mount_page(&mock_server, "/ok", &[]).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), &output_dir);
    let outcome = crawl(config).await.unwrap();

    assert!(outcome.quiesced);
    assert_eq!(outcome.site.len(), 2);
    assert!(outcome.site.page(&format!("{}/ok", base_url)).is_some());
    assert_eq!(
        outcome.state.state(&format!("{}/broken", base_url)),
        Some(PageState::Failed)
    );
    // Unmatched paths get wiremock's 404
    assert_eq!(
        outcome.state.state(&format!("{}/gone", base_url)),
        Some(PageState::Failed)
    );

    let stats = outcome.statistics();
    assert_eq!(stats.count(PageState::Failed), 2);
    assert_eq!(stats.pages_crawled, 2);
}

#[tokio::test]
async fn test_slow_page_times_out_without_stalling_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", &["/slow", "/fast"]).await;
    mount_page(&mock_server, "/fast", &[]).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page(&[]).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), &output_dir);
    config.crawler.fetch_timeout_secs = 1;

    let outcome = tokio::time::timeout(Duration::from_secs(8), crawl(config))
        .await
        .expect("a hung fetch must not stall the crawl")
        .unwrap();

    assert!(outcome.quiesced);
    assert_eq!(outcome.site.len(), 2);
    assert_eq!(
        outcome.state.state(&format!("{}/slow", base_url)),
        Some(PageState::Failed)
    );
}

#[tokio::test]
async fn test_closed_graph_quiesces() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    // Every page links to every other page
    let pages: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    let links: Vec<&str> = pages.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/", &links).await;
    for page in &pages {
        mount_page(&mock_server, page, &links).await;
    }

    let mut config = create_test_config(&format!("{}/", mock_server.uri()), &output_dir);
    config.crawler.max_concurrent_fetches = 8;
    config.crawler.dispatch_queue_capacity = 1;

    let outcome = tokio::time::timeout(Duration::from_secs(10), crawl(config))
        .await
        .expect("closed graph must quiesce")
        .unwrap();

    assert!(outcome.quiesced);
    assert_eq!(outcome.site.len(), 11);
    assert_eq!(
        mock_server.received_requests().await.unwrap_or_default().len(),
        11
    );
}

#[tokio::test]
async fn test_collect_pages_disabled_writes_empty_reports() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", &["/a"]).await;
    mount_page(&mock_server, "/a", &[]).await;

    let mut config = create_test_config(&format!("{}/", mock_server.uri()), &output_dir);
    config.crawler.collect_pages = false;

    let outcome = crawl(config.clone()).await.unwrap();
    assert_eq!(request_count(&mock_server, "/a").await, 1);
    assert!(outcome.site.is_empty());

    let report = TextReport::from_config(&config.output);
    report.write_report(&outcome.site).unwrap();
    assert_eq!(std::fs::read_to_string(report.sitemap_path()).unwrap(), "");
    assert_eq!(std::fs::read_to_string(report.sitegraph_path()).unwrap(), "");
}

#[tokio::test]
async fn test_sitemap_and_sitegraph_are_consistent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        &["/a", "/b", "http://localhost:1/elsewhere"],
    )
    .await;
    mount_page(&mock_server, "/a", &["/b", "/"]).await;
    mount_page(&mock_server, "/b", &[]).await;

    let config = create_test_config(&format!("{}/", base_url), &output_dir);
    let outcome = crawl(config).await.unwrap();

    let sitemap = render_sitemap(&outcome.site);
    let sitegraph = render_sitegraph(&outcome.site);

    let nodes: Vec<&str> = sitemap.lines().collect();
    let graph_nodes: Vec<&str> = sitegraph
        .lines()
        .filter(|line| !line.starts_with("-> "))
        .collect();
    assert_eq!(nodes, graph_nodes);

    // Every crawled edge target is itself a node
    for target in sitegraph
        .lines()
        .filter_map(|line| line.strip_prefix("-> "))
    {
        if outcome.state.is_visited(target) {
            assert!(nodes.contains(&target), "{} missing from sitemap", target);
        }
    }

    assert_eq!(
        outcome.state.state("http://localhost:1/elsewhere"),
        Some(PageState::Rejected)
    );
}

#[tokio::test]
async fn test_shutdown_token_keeps_partial_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", &["/stuck"]).await;
    Mock::given(method("GET"))
        .and(path("/stuck"))
        .respond_with(html_page(&[]).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), &output_dir);
    config.crawler.fetch_timeout_secs = 60;
    let engine = Engine::from_config(config).unwrap();
    let shutdown = engine.shutdown_token();

    let handle = tokio::spawn(engine.run());
    tokio::time::sleep(Duration::from_millis(500)).await;
    shutdown.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("cancelled crawl should stop promptly")
        .unwrap()
        .unwrap();

    assert!(!outcome.quiesced);
    assert_eq!(outcome.site.len(), 1);
    assert!(outcome.site.page(&format!("{}/", base_url)).is_some());
}

#[tokio::test]
async fn test_crawl_timeout_stops_crawl() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[]).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", mock_server.uri()), &output_dir);
    config.crawler.fetch_timeout_secs = 60;
    config.crawler.crawl_timeout_secs = 1;

    let outcome = tokio::time::timeout(Duration::from_secs(5), crawl(config))
        .await
        .expect("crawl timeout should end the run")
        .unwrap();

    assert!(!outcome.quiesced);
    assert!(outcome.site.is_empty());
}

#[tokio::test]
async fn test_invalid_seed_is_an_error() {
    let output_dir = TempDir::new().unwrap();
    let config = create_test_config("ftp://example.test/", &output_dir);

    let result = Engine::new(config, Arc::new(MapFetcher::default()))
        .run()
        .await;
    assert!(result.is_err());
}
