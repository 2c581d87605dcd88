//! Crawl engine - orchestration of the intake, dispatch and collection loops
//!
//! A URL flows through the engine like this:
//!
//! 1. `submit` puts it on the unbounded intake queue
//! 2. the intake loop spawns one filter task per URL
//! 3. URLs passing the filter chain go onto the bounded dispatch queue
//! 4. the dispatch loop paces launches per host and hands each URL to a
//!    fetch worker holding a permit from the worker pool
//! 5. the worker fetches, extracts links, submits newly discovered ones back
//!    to intake, and publishes the page to the collection loop
//!
//! Every queued or running item holds a [`WorkGuard`]; the supervisor waits
//! for the tracker to reach zero and then cancels the three loops.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::pacer::Pacer;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::tracker::{WorkGuard, WorkTracker};
use crate::filter::FilterChain;
use crate::output::{CrawlStatistics, Site, Webpage};
use crate::state::{CrawlState, FetchClaim};
use crate::url::{extract_host, parse_http_url, resolve_reference};
use crate::CrawlError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use url::Url;

/// A URL travelling through the engine together with its unit of work
#[derive(Debug)]
struct Submission {
    url: String,
    _work: WorkGuard,
}

/// State shared by every task spawned during one crawl
struct Shared {
    config: Arc<Config>,
    filters: Arc<FilterChain>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    state: Arc<CrawlState>,
    tracker: WorkTracker,
    shutdown: CancellationToken,
    intake_tx: mpsc::UnboundedSender<Submission>,
    dispatch_tx: mpsc::Sender<Submission>,
    pages_tx: Option<mpsc::UnboundedSender<Webpage>>,
}

impl Shared {
    /// Enters a URL into the engine; safe to call from any task
    fn submit(&self, url: String) {
        let submission = Submission {
            url,
            _work: self.tracker.start(),
        };
        if let Err(mpsc::error::SendError(rejected)) = self.intake_tx.send(submission) {
            tracing::debug!("Intake closed, dropping {}", rejected.url);
        }
    }

    fn max_depth(&self) -> u32 {
        self.config.crawler.max_depth
    }
}

/// Result of a finished crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Crawled pages in completion order (empty when collection is disabled)
    pub site: Site,

    /// Final depth/state of every URL seen
    pub state: Arc<CrawlState>,

    /// True if the crawl ended because all work was done, false if it was
    /// cancelled or hit the crawl timeout
    pub quiesced: bool,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlOutcome {
    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics::collect(&self.state, &self.site)
    }
}

/// The crawl engine
///
/// Owns the collaborators and the crawl-scoped state. An engine runs one
/// crawl; [`run`](Self::run) consumes it.
pub struct Engine {
    config: Arc<Config>,
    filters: Arc<FilterChain>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    state: Arc<CrawlState>,
    tracker: WorkTracker,
    shutdown: CancellationToken,
}

impl Engine {
    /// Creates an engine with the standard filter chain and HTML extractor
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        let filters = FilterChain::default_chain(&config);
        Self {
            config: Arc::new(config),
            filters: Arc::new(filters),
            fetcher,
            extractor: Arc::new(HtmlLinkExtractor::new()),
            state: Arc::new(CrawlState::new()),
            tracker: WorkTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates an engine fetching over HTTP
    pub fn from_config(config: Config) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn with_filters(mut self, filters: FilterChain) -> Self {
        self.filters = Arc::new(filters);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn LinkExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> Arc<CrawlState> {
        self.state.clone()
    }

    /// Handle onto the in-flight counter
    pub fn tracker(&self) -> WorkTracker {
        self.tracker.clone()
    }

    /// Cancelling this token stops the crawl early; collected pages are kept
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs the crawl to quiescence, cancellation or timeout
    pub async fn run(self) -> Result<CrawlOutcome, CrawlError> {
        validate(&self.config)?;
        let seed = parse_http_url(&self.config.crawler.seed_url)?.to_string();
        let crawler = &self.config.crawler;
        let started = Instant::now();

        tracing::info!(
            "Starting crawl of {} (max depth {}, politeness delay {}ms, {} workers, filters: {})",
            seed,
            crawler.max_depth,
            crawler.politeness_delay_ms,
            crawler.max_concurrent_fetches,
            self.filters.names().join(", ")
        );

        let (intake_tx, intake_rx) = mpsc::unbounded_channel();
        let (dispatch_tx, dispatch_rx) = mpsc::channel(crawler.dispatch_queue_capacity);
        let (pages_tx, pages_rx) = if crawler.collect_pages {
            let (tx, rx) = mpsc::unbounded_channel();
            (Some(tx), Some(rx))
        } else {
            tracing::info!("Page collection disabled, reports will be empty");
            (None, None)
        };

        let shared = Arc::new(Shared {
            config: self.config.clone(),
            filters: self.filters.clone(),
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
            state: self.state.clone(),
            tracker: self.tracker.clone(),
            shutdown: self.shutdown.clone(),
            intake_tx,
            dispatch_tx,
            pages_tx,
        });

        let intake = tokio::spawn(intake_loop(shared.clone(), intake_rx));
        let dispatch = tokio::spawn(dispatch_loop(shared.clone(), dispatch_rx));
        let collector = tokio::spawn(collect_loop(
            pages_rx,
            Site::new(seed.clone()),
            self.shutdown.clone(),
        ));

        shared.state.discover(&seed, 0);
        shared.submit(seed);

        let quiesced = supervise(&shared).await;
        self.shutdown.cancel();

        intake.await?;
        dispatch.await?;
        let site = collector.await?;
        let elapsed = started.elapsed();

        tracing::info!(
            "Crawl finished: {} pages crawled, {} URLs seen in {:?}",
            site.len(),
            self.state.len(),
            elapsed
        );

        Ok(CrawlOutcome {
            site,
            state: self.state,
            quiesced,
            elapsed,
        })
    }
}

/// Waits for quiescence, logging progress on a fixed interval
///
/// Returns false if the crawl was cancelled or timed out first.
async fn supervise(shared: &Shared) -> bool {
    let crawler = &shared.config.crawler;
    let mut ticker = tokio::time::interval(Duration::from_millis(crawler.status_interval_ms));
    ticker.tick().await;

    let limit = (crawler.crawl_timeout_secs > 0)
        .then(|| Duration::from_secs(crawler.crawl_timeout_secs));
    let deadline = async move {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let idle = shared.tracker.wait_idle();
    tokio::pin!(idle);

    loop {
        tokio::select! {
            _ = &mut idle => {
                tracing::info!("No work queued and no worker active, stopping");
                return true;
            }
            _ = &mut deadline => {
                tracing::warn!("Crawl timeout reached, stopping with partial results");
                return false;
            }
            _ = shared.shutdown.cancelled() => {
                tracing::warn!("Crawl cancelled, stopping with partial results");
                return false;
            }
            _ = ticker.tick() => {
                let dispatch_queued =
                    shared.dispatch_tx.max_capacity() - shared.dispatch_tx.capacity();
                tracing::info!(
                    "Status: {} URLs seen; dispatch queue: {}; in flight: {}",
                    shared.state.len(),
                    dispatch_queued,
                    shared.tracker.in_flight()
                );
            }
        }
    }
}

/// Consumes submitted URLs and runs the filter chain on each in its own task
async fn intake_loop(shared: Arc<Shared>, mut intake_rx: mpsc::UnboundedReceiver<Submission>) {
    loop {
        tokio::select! {
            _ = shared.shutdown.cancelled() => {
                tracing::debug!("Closing intake queue");
                return;
            }
            received = intake_rx.recv() => match received {
                Some(submission) => {
                    tokio::spawn(filter_submission(shared.clone(), submission));
                }
                None => return,
            },
        }
    }
}

/// Applies the filter chain and forwards passing URLs to the dispatcher
async fn filter_submission(shared: Arc<Shared>, submission: Submission) {
    if let Some(filter) = shared
        .filters
        .first_rejection(&submission.url, &shared.config)
    {
        if shared.state.depth(&submission.url) == Some(0) {
            tracing::warn!("Seed {} rejected by the {} filter", submission.url, filter);
        } else {
            tracing::debug!("Filtered out {} ({})", submission.url, filter);
        }
        shared.state.mark_rejected(&submission.url);
        return;
    }

    shared.state.mark_queued(&submission.url);

    // A full dispatch queue parks this task until the dispatcher catches up
    tokio::select! {
        sent = shared.dispatch_tx.send(submission) => {
            if let Err(mpsc::error::SendError(dropped)) = sent {
                tracing::debug!("Dispatch closed, dropping {}", dropped.url);
            }
        }
        _ = shared.shutdown.cancelled() => {}
    }
}

/// Paces and launches fetch workers for filtered URLs
async fn dispatch_loop(shared: Arc<Shared>, mut dispatch_rx: mpsc::Receiver<Submission>) {
    let crawler = &shared.config.crawler;
    let mut pacer = Pacer::new(Duration::from_millis(crawler.politeness_delay_ms));
    let pool = Arc::new(Semaphore::new(crawler.max_concurrent_fetches));

    loop {
        let submission = tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            received = dispatch_rx.recv() => match received {
                Some(submission) => submission,
                None => break,
            },
        };

        match shared.state.depth(&submission.url) {
            Some(depth) if depth > shared.max_depth() => {
                tracing::debug!(
                    "Skipping {}: depth {} exceeds {}",
                    submission.url,
                    depth,
                    shared.max_depth()
                );
                shared.state.mark_depth_exceeded(&submission.url);
                continue;
            }
            None => {
                tracing::debug!("Skipping {}: never discovered", submission.url);
                continue;
            }
            Some(_) => {}
        }

        let host = Url::parse(&submission.url)
            .ok()
            .as_ref()
            .and_then(extract_host)
            .unwrap_or_default();

        // The slot is reserved only once a worker is free, so the delay is
        // measured between actual launches
        let permit = tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            permit = pool.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            _ = pacer.wait(&host) => {}
        }

        tracing::debug!("Dispatching {}", submission.url);
        let worker_shared = shared.clone();
        tokio::spawn(async move {
            fetch_worker(&worker_shared, submission).await;
            drop(permit);
        });
    }

    tracing::debug!("Closing dispatch queue");
}

/// Fetches one URL, records its links and publishes the page
async fn fetch_worker(shared: &Arc<Shared>, submission: Submission) {
    let url = submission.url.as_str();

    let depth = match shared.state.begin_fetch(url, shared.max_depth()) {
        FetchClaim::Claimed { depth } => depth,
        FetchClaim::DepthExceeded { depth } => {
            tracing::debug!("Not fetching {}: depth {} exceeds limit", url, depth);
            return;
        }
        FetchClaim::AlreadyVisited => {
            tracing::debug!("Not fetching {}: already visited", url);
            return;
        }
        FetchClaim::InFlight => {
            tracing::debug!("Not fetching {}: another worker has it", url);
            return;
        }
        FetchClaim::Unknown => {
            tracing::debug!("Not fetching {}: never discovered", url);
            return;
        }
        FetchClaim::NotClaimable(state) => {
            tracing::debug!("Not fetching {}: state is {}", url, state);
            return;
        }
    };

    let page_url = match Url::parse(url) {
        Ok(page_url) => page_url,
        Err(e) => {
            tracing::debug!("Not fetching {}: {}", url, e);
            shared.state.finish_fetch(url, false);
            return;
        }
    };

    let timeout = Duration::from_secs(shared.config.crawler.fetch_timeout_secs);
    let fetched = tokio::select! {
        _ = shared.shutdown.cancelled() => {
            tracing::debug!("Abandoning fetch of {}: crawl stopped", url);
            shared.state.finish_fetch(url, false);
            return;
        }
        fetched = tokio::time::timeout(timeout, shared.fetcher.fetch(&page_url)) => fetched,
    };

    let body = match fetched {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            shared.state.finish_fetch(url, false);
            return;
        }
        Err(_) => {
            tracing::warn!("Failed to fetch {}: timed out after {:?}", url, timeout);
            shared.state.finish_fetch(url, false);
            return;
        }
    };

    let hrefs = shared
        .extractor
        .extract(&body, &page_url)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", url, e);
            Vec::new()
        });

    let references = record_links(shared, &page_url, depth, hrefs);
    tracing::debug!("References for {}: {}", url, references.len());

    shared.state.finish_fetch(url, true);

    if let Some(pages_tx) = &shared.pages_tx {
        if pages_tx.send(Webpage::new(url, references)).is_err() {
            tracing::debug!("Collection closed, dropping page {}", url);
        }
    }
}

/// Resolves extracted hrefs and submits every URL not seen before
///
/// Returns the page's references in extraction order. Fragment-only and
/// blank hrefs are not links and are left out; duplicates, self references
/// and out-of-scope links stay in.
fn record_links(shared: &Shared, page_url: &Url, depth: u32, hrefs: Vec<String>) -> Vec<String> {
    let mut references = Vec::with_capacity(hrefs.len());

    for href in hrefs {
        let Some(resolved) = resolve_reference(&href, page_url) else {
            continue;
        };

        if shared.state.discover(&resolved, depth + 1) {
            shared.submit(resolved.clone());
        }
        references.push(resolved);
    }

    references
}

/// Appends published pages to the site until the crawl stops
async fn collect_loop(
    pages_rx: Option<mpsc::UnboundedReceiver<Webpage>>,
    mut site: Site,
    shutdown: CancellationToken,
) -> Site {
    let Some(mut pages_rx) = pages_rx else {
        return site;
    };

    loop {
        tokio::select! {
            received = pages_rx.recv() => match received {
                Some(page) => {
                    tracing::info!("Added {}", page.url);
                    site.add_webpage(page);
                }
                None => break,
            },
            _ = shutdown.cancelled() => {
                // Pages published just before quiescence may still be queued
                while let Ok(page) = pages_rx.try_recv() {
                    tracing::info!("Added {}", page.url);
                    site.add_webpage(page);
                }
                break;
            }
        }
    }

    site
}
