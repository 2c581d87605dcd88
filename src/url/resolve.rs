use url::Url;

/// Resolves a raw href against the URL of the page it was found on
///
/// Returns `None` for hrefs that are not links at all: blank values and
/// same-page fragments (`#section`). Unparseable hrefs are also dropped.
/// Everything else, including external and non-http links, is returned as an
/// absolute URL string; scoping is the filter chain's job.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegraph::url::resolve_reference;
///
/// let base = Url::parse("https://example.test/docs/page").unwrap();
/// assert_eq!(
///     resolve_reference("/a", &base),
///     Some("https://example.test/a".to_string())
/// );
/// assert_eq!(resolve_reference("#top", &base), None);
/// ```
pub fn resolve_reference(raw_href: &str, base: &Url) -> Option<String> {
    let href = raw_href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            tracing::debug!("Skipping unresolvable href '{}' on {}: {}", href, base, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.test/docs/page").unwrap()
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            resolve_reference("/a", &base_url()),
            Some("https://example.test/a".to_string())
        );
    }

    #[test]
    fn test_path_relative() {
        assert_eq!(
            resolve_reference("other", &base_url()),
            Some("https://example.test/docs/other".to_string())
        );
        assert_eq!(
            resolve_reference("../up", &base_url()),
            Some("https://example.test/up".to_string())
        );
    }

    #[test]
    fn test_absolute_kept() {
        assert_eq!(
            resolve_reference("https://other.test/b", &base_url()),
            Some("https://other.test/b".to_string())
        );
    }

    #[test]
    fn test_fragment_only_ignored() {
        assert_eq!(resolve_reference("#section", &base_url()), None);
        assert_eq!(resolve_reference("  #section", &base_url()), None);
    }

    #[test]
    fn test_fragment_on_path_kept_verbatim() {
        assert_eq!(
            resolve_reference("/a#part", &base_url()),
            Some("https://example.test/a#part".to_string())
        );
    }

    #[test]
    fn test_blank_ignored() {
        assert_eq!(resolve_reference("", &base_url()), None);
        assert_eq!(resolve_reference("   ", &base_url()), None);
    }

    #[test]
    fn test_unparseable_dropped() {
        assert_eq!(resolve_reference("http://[::1", &base_url()), None);
    }

    #[test]
    fn test_mailto_resolves_but_has_no_host() {
        let resolved = resolve_reference("mailto:someone@example.test", &base_url()).unwrap();
        assert_eq!(resolved, "mailto:someone@example.test");
    }
}
