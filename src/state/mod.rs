//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the lifecycle of a single URL (discovered, queued, fetching, visited, ...)
//! - `CrawlState`: the concurrent URL -> (depth, state) store shared by every worker

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::{CrawlState, FetchClaim, UrlRecord};
pub use page_state::PageState;
