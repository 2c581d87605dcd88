//! Concurrent crawl state shared by all workers
//!
//! Every URL the crawler has seen maps to its first-discovery depth and its
//! current [`PageState`]. All check-then-act sequences (discover-if-absent,
//! claim-for-fetch) happen under the per-shard lock dashmap takes for its
//! entry API, so callers never need external locking.

use crate::state::PageState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;

/// Depth and lifecycle state of one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlRecord {
    /// Link distance from the seed at first discovery
    pub depth: u32,

    /// Current lifecycle state
    pub state: PageState,
}

impl UrlRecord {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            state: PageState::Discovered,
        }
    }

    pub fn is_visited(&self) -> bool {
        self.state.is_success()
    }
}

/// Outcome of trying to claim a URL for fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchClaim {
    /// The caller now owns the fetch; the URL is in `Fetching`
    Claimed { depth: u32 },

    /// The URL was never discovered
    Unknown,

    /// The URL lies beyond the maximum depth
    DepthExceeded { depth: u32 },

    /// Another worker already fetched the URL
    AlreadyVisited,

    /// Another worker is fetching the URL right now
    InFlight,

    /// The URL is in a state that cannot be fetched (e.g. rejected)
    NotClaimable(PageState),
}

/// Thread-safe URL -> [`UrlRecord`] store
#[derive(Debug, Default)]
pub struct CrawlState {
    entries: DashMap<String, UrlRecord>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for a URL, if it has been seen
    pub fn get(&self, url: &str) -> Option<UrlRecord> {
        self.entries.get(url).map(|entry| *entry.value())
    }

    /// Unconditionally stores a record
    pub fn set(&self, url: impl Into<String>, record: UrlRecord) {
        self.entries.insert(url.into(), record);
    }

    /// Records a URL at `depth` if it has never been seen
    ///
    /// Returns true only for the single caller that inserted the entry, so
    /// concurrent discoveries of the same URL submit it exactly once. Later
    /// rediscoveries never update the depth.
    pub fn discover(&self, url: &str, depth: u32) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }

        match self.entries.entry(url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(UrlRecord::new(depth));
                true
            }
        }
    }

    pub fn depth(&self, url: &str) -> Option<u32> {
        self.get(url).map(|record| record.depth)
    }

    pub fn state(&self, url: &str) -> Option<PageState> {
        self.get(url).map(|record| record.state)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.get(url).is_some_and(|record| record.is_visited())
    }

    /// Marks a URL that passed the filter chain as waiting for a worker
    pub fn mark_queued(&self, url: &str) {
        self.transition(url, PageState::Queued, |state| {
            matches!(state, PageState::Discovered | PageState::Failed)
        });
    }

    /// Marks a URL that failed the filter chain
    pub fn mark_rejected(&self, url: &str) {
        self.transition(url, PageState::Rejected, |state| {
            matches!(state, PageState::Discovered | PageState::Failed)
        });
    }

    /// Marks a URL that will never be fetched because it is too deep
    pub fn mark_depth_exceeded(&self, url: &str) {
        self.transition(url, PageState::DepthExceeded, |state| {
            state.is_claimable()
        });
    }

    /// Atomically claims a URL for fetching
    ///
    /// Succeeds only if the URL is known, within `max_depth`, and neither
    /// visited nor currently being fetched by another worker.
    pub fn begin_fetch(&self, url: &str, max_depth: u32) -> FetchClaim {
        let mut entry = match self.entries.get_mut(url) {
            Some(entry) => entry,
            None => return FetchClaim::Unknown,
        };
        let record = entry.value_mut();

        if record.depth > max_depth {
            if record.state.is_claimable() {
                record.state = PageState::DepthExceeded;
            }
            return FetchClaim::DepthExceeded {
                depth: record.depth,
            };
        }

        match record.state {
            PageState::Visited => FetchClaim::AlreadyVisited,
            PageState::Fetching => FetchClaim::InFlight,
            state if state.is_claimable() => {
                record.state = PageState::Fetching;
                FetchClaim::Claimed {
                    depth: record.depth,
                }
            }
            state => FetchClaim::NotClaimable(state),
        }
    }

    /// Releases a claim taken with [`begin_fetch`](Self::begin_fetch)
    ///
    /// A failed URL stays unvisited; it is only fetched again if it is
    /// submitted again.
    pub fn finish_fetch(&self, url: &str, success: bool) {
        let next = if success {
            PageState::Visited
        } else {
            PageState::Failed
        };
        self.transition(url, next, |state| state == PageState::Fetching);
    }

    /// Number of URLs ever discovered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts URLs per state
    pub fn count_by_state(&self) -> HashMap<PageState, usize> {
        let mut counts = HashMap::new();
        for entry in self.entries.iter() {
            *counts.entry(entry.value().state).or_insert(0) += 1;
        }
        counts
    }

    fn transition(&self, url: &str, to: PageState, allowed: impl Fn(PageState) -> bool) -> bool {
        match self.entries.get_mut(url) {
            Some(mut entry) if allowed(entry.state) => {
                entry.state = to;
                true
            }
            _ => false,
        }
    }
}
