use crate::UrlError;
use url::Url;

/// Schemes accepted as already present on a raw site identifier
const KNOWN_SCHEMES: &[&str] = &["http://", "https://"];

/// Normalizes a raw site identifier into a crawlable root URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject if nothing is left
/// 2. Prefix `https://` when no `http://`/`https://` scheme is present
/// 3. Parse the result; reject if malformed or hostless
///
/// The returned string is otherwise left exactly as supplied, so a caller
/// can match results back to its input.
///
/// # Examples
///
/// ```
/// use contact_trawler::url::normalize_site_url;
///
/// assert_eq!(normalize_site_url("example.com").unwrap(), "https://example.com");
/// assert_eq!(normalize_site_url("http://x.com").unwrap(), "http://x.com");
/// ```
pub fn normalize_site_url(raw: &str) -> Result<String, UrlError> {
    // Step 1: Trim
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    // Step 2: Add a scheme if missing
    let lowered = trimmed.to_ascii_lowercase();
    let normalized = if KNOWN_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    // Step 3: Must parse to an http(s) URL with a host
    let parsed = Url::parse(&normalized).map_err(|e| UrlError::Parse(e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(normalized)
}

/// Returns `scheme://host[:port]` for a URL, the base that sitemap and
/// fallback page paths are appended to
pub fn site_base(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_domain_gets_https() {
        assert_eq!(
            normalize_site_url("example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_http_scheme_unchanged() {
        assert_eq!(normalize_site_url("http://x.com").unwrap(), "http://x.com");
    }

    #[test]
    fn test_https_scheme_unchanged() {
        assert_eq!(
            normalize_site_url("https://example.com/about").unwrap(),
            "https://example.com/about"
        );
    }

    #[test]
    fn test_uppercase_scheme_recognized() {
        assert_eq!(
            normalize_site_url("HTTPS://Example.com").unwrap(),
            "HTTPS://Example.com"
        );
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(
            normalize_site_url("  example.org \n").unwrap(),
            "https://example.org"
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(normalize_site_url("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(normalize_site_url("exa mple.com").is_err());
    }

    #[test]
    fn test_site_base_keeps_port() {
        let url = Url::parse("http://127.0.0.1:8080/contact").unwrap();
        assert_eq!(site_base(&url).unwrap(), "http://127.0.0.1:8080");

        let url = Url::parse("https://example.com/a/b").unwrap();
        assert_eq!(site_base(&url).unwrap(), "https://example.com");
    }
}
