//! HTML link extraction collaborator
//!
//! Pulls raw `href` values out of anchors in the document body. Resolution,
//! fragment handling and scoping are left to the engine.

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Errors returned by a [`LinkExtractor`]
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Extracts raw link targets from a fetched document
pub trait LinkExtractor: Send + Sync {
    /// Returns raw href strings in document order
    ///
    /// `base` is the URL the document was fetched from; implementations may
    /// use it, but must not resolve the returned hrefs.
    fn extract(&self, document: &str, base: &Url) -> Result<Vec<String>, ExtractError>;
}

/// [`LinkExtractor`] selecting `<a href>` elements inside `<body>`
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    selector: String,
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self {
            selector: "body a[href]".to_string(),
        }
    }
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom CSS selector; matched elements must carry `href`
    pub fn with_selector(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, document: &str, _base: &Url) -> Result<Vec<String>, ExtractError> {
        let selector = Selector::parse(&self.selector).map_err(|e| ExtractError::Selector {
            selector: self.selector.clone(),
            message: format!("{:?}", e),
        })?;

        let html = Html::parse_document(document);
        Ok(html
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect())
    }
}
