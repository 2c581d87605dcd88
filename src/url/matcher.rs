/// Checks whether `candidate` is `base` itself or one of its subdomains
///
/// Matching is aligned on label boundaries, so `notexample.test` is not a
/// subdomain of `example.test` even though it ends with the same characters.
///
/// # Examples
///
/// ```
/// use sitegraph::url::is_same_or_subdomain;
///
/// assert!(is_same_or_subdomain("example.test", "example.test"));
/// assert!(is_same_or_subdomain("example.test", "api.v2.example.test"));
/// assert!(!is_same_or_subdomain("example.test", "notexample.test"));
/// assert!(!is_same_or_subdomain("example.test", "example.test.evil"));
/// ```
pub fn is_same_or_subdomain(base: &str, candidate: &str) -> bool {
    if base.is_empty() || candidate.is_empty() {
        return false;
    }

    candidate == base
        || candidate
            .strip_suffix(base)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
