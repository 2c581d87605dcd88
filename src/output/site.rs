//! In-memory model of a crawled site

/// One crawled page and its outbound links
///
/// References are kept exactly as extracted: DOM order, duplicates, self
/// references and out-of-scope links included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webpage {
    pub url: String,
    pub references: Vec<String>,
}

impl Webpage {
    pub fn new(url: impl Into<String>, references: Vec<String>) -> Self {
        Self {
            url: url.into(),
            references,
        }
    }
}

/// Append-only log of successfully crawled pages, in completion order
#[derive(Debug, Clone, Default)]
pub struct Site {
    name: String,
    webpages: Vec<Webpage>,
}

impl Site {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            webpages: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_webpage(&mut self, page: Webpage) {
        self.webpages.push(page);
    }

    pub fn webpages(&self) -> &[Webpage] {
        &self.webpages
    }

    pub fn len(&self) -> usize {
        self.webpages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.webpages.is_empty()
    }

    /// Returns the crawled page for a URL, if any
    pub fn page(&self, url: &str) -> Option<&Webpage> {
        self.webpages.iter().find(|page| page.url == url)
    }

    /// Total number of edges across all pages
    pub fn total_references(&self) -> usize {
        self.webpages.iter().map(|page| page.references.len()).sum()
    }
}
