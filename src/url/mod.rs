//! URL handling module
//!
//! This module provides host extraction, subdomain matching, and resolution of
//! raw hrefs against the page they were found on.

mod domain;
mod matcher;
mod resolve;

pub use domain::{extract_host, parse_http_url};
pub use matcher::is_same_or_subdomain;
pub use resolve::resolve_reference;
