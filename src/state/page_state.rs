/// Page state definitions for tracking crawl progress
///
/// Every URL the crawler has heard of is in exactly one of these states.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL was found on a page (or is the seed) and submitted to intake
    Discovered,

    /// URL passed the filter chain and is waiting for a fetch worker
    Queued,

    /// A worker has claimed the URL and is fetching it
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched and its links extracted
    Visited,

    /// URL was rejected by the filter chain
    Rejected,

    /// Fetch failed; the URL may be claimed again if it is resubmitted
    Failed,

    /// URL lies beyond the maximum crawl depth
    DepthExceeded,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state (URL may still be processed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Discovered | Self::Queued | Self::Fetching)
    }

    /// Returns true if a fetch worker may claim a URL in this state
    pub fn is_claimable(&self) -> bool {
        matches!(self, Self::Discovered | Self::Queued | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Visited)
    }

    /// Stable lowercase name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::Visited => "visited",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
            Self::DepthExceeded => "depth_exceeded",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Discovered,
            Self::Queued,
            Self::Fetching,
            Self::Visited,
            Self::Rejected,
            Self::Failed,
            Self::DepthExceeded,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
