use url::Url;

/// Normalizes a hyperlink target found on a page
///
/// # Normalization Rules
///
/// 1. Trim surrounding whitespace; empty targets are dropped
/// 2. Scheme-relative targets (`//host/path`) are promoted to `https://host/path`
/// 3. Root-relative targets (`/path`) are resolved against `base_url`
/// 4. Everything else passes through unchanged and is left for the
///    article pattern to accept or reject
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `base_url` - The URL of the page the link was found on
///
/// # Returns
///
/// * `Some(String)` - The normalized target
/// * `None` - The target was empty or could not be resolved
///
/// # Examples
///
/// ```
/// use news_harvest::url::normalize_href;
/// use url::Url;
///
/// let base = Url::parse("https://news.naver.com/section/100").unwrap();
/// assert_eq!(
///     normalize_href("/main/list", &base).as_deref(),
///     Some("https://news.naver.com/main/list")
/// );
/// assert_eq!(
///     normalize_href("//n.news.naver.com/article/001/1", &base).as_deref(),
///     Some("https://n.news.naver.com/article/001/1")
/// );
/// ```
pub fn normalize_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("//") {
        return Some(format!("https:{}", href));
    }

    if href.starts_with('/') {
        return base_url.join(href).ok().map(|url| url.to_string());
    }

    Some(href.to_string())
}
