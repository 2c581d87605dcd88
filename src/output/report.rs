//! Sitemap and sitegraph rendering
//!
//! `sitemap.txt` holds one crawled URL per line. `sitegraph.txt` holds each
//! crawled URL followed by one `-> reference` line per outbound link.

use crate::config::OutputConfig;
use crate::output::traits::{OutputError, OutputResult, ReportWriter};
use crate::output::Site;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Renders the flat sitemap, one URL per line in completion order
pub fn render_sitemap(site: &Site) -> String {
    let mut out = String::new();
    for page in site.webpages() {
        out.push_str(&page.url);
        out.push('\n');
    }
    out
}

/// Renders the adjacency listing, edges in extraction order
pub fn render_sitegraph(site: &Site) -> String {
    let mut out = String::new();
    for page in site.webpages() {
        out.push_str(&page.url);
        out.push('\n');
        for reference in &page.references {
            out.push_str("-> ");
            out.push_str(reference);
            out.push('\n');
        }
    }
    out
}

/// Writes both reports as plain text files
#[derive(Debug, Clone)]
pub struct TextReport {
    sitemap_path: PathBuf,
    sitegraph_path: PathBuf,
}

impl TextReport {
    pub fn new(sitemap_path: impl Into<PathBuf>, sitegraph_path: impl Into<PathBuf>) -> Self {
        Self {
            sitemap_path: sitemap_path.into(),
            sitegraph_path: sitegraph_path.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.sitemap_path, &config.sitegraph_path)
    }

    pub fn sitemap_path(&self) -> &Path {
        &self.sitemap_path
    }

    pub fn sitegraph_path(&self) -> &Path {
        &self.sitegraph_path
    }

    pub fn write_sitemap(&self, site: &Site) -> OutputResult<()> {
        tracing::info!(
            "Writing sitemap with {} pages to {}",
            site.len(),
            self.sitemap_path.display()
        );
        write_file(&self.sitemap_path, &render_sitemap(site))
    }

    pub fn write_sitegraph(&self, site: &Site) -> OutputResult<()> {
        tracing::info!(
            "Writing sitegraph with {} edges to {}",
            site.total_references(),
            self.sitegraph_path.display()
        );
        write_file(&self.sitegraph_path, &render_sitegraph(site))
    }
}

impl ReportWriter for TextReport {
    fn write_report(&self, site: &Site) -> OutputResult<()> {
        self.write_sitemap(site)?;
        self.write_sitegraph(site)
    }
}

/// Writes both reports to the paths named in the output configuration
pub fn write_reports(config: &OutputConfig, site: &Site) -> OutputResult<()> {
    TextReport::from_config(config).write_report(site)
}

fn write_file(path: &Path, contents: &str) -> OutputResult<()> {
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.display().to_string(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|source| OutputError::Write {
            path: path.display().to_string(),
            source,
        })
}
