use crate::UrlError;
use url::Url;

/// Extracts the host from a URL
///
/// The `url` crate already lowercases hosts of special schemes, so the
/// returned string can be compared directly against configured hosts.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegraph::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.test/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.test".to_string()));
///
/// let url = Url::parse("mailto:someone@example.test").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Parses an absolute http(s) URL that carries a host
///
/// Used for the seed; discovered links go through the filter chain instead,
/// which rejects rather than errors.
pub fn parse_http_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if extract_host(&url).is_none() {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    Ok(url)
}
