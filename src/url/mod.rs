//! URL handling module for Contact-Trawler
//!
//! This module provides site-root normalization, domain extraction, and the
//! path heuristics used to decide which discovered pages are worth scraping.

mod contact_page;
mod domain;
mod normalize;

// Re-export main functions
pub use contact_page::{is_homepage, is_valid_contact_page};
pub use domain::{domain_of, extract_domain};
pub use normalize::{normalize_site_url, site_base};

use url::Url;

/// Returns true if `candidate` points at the same site as `root`
///
/// Sites are compared by their `host[:port]` key, so `www.` variants and
/// subdomains count as different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use contact_trawler::url::same_site;
///
/// let root = Url::parse("https://example.com/").unwrap();
/// assert!(same_site(&root, &Url::parse("https://example.com/contact").unwrap()));
/// assert!(!same_site(&root, &Url::parse("https://other.com/contact").unwrap()));
/// ```
pub fn same_site(root: &Url, candidate: &Url) -> bool {
    match (extract_domain(root), extract_domain(candidate)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Splits free-form input into site identifiers
///
/// Identifiers are separated by newlines or commas; surrounding whitespace
/// is trimmed and empty entries are dropped.
pub fn split_site_list(input: &str) -> Vec<String> {
    input
        .split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_site_list() {
        let input = "acme.com, https://beta.io\n\n  gamma.org  ,\r\n,delta.net";
        assert_eq!(
            split_site_list(input),
            vec!["acme.com", "https://beta.io", "gamma.org", "delta.net"]
        );
        assert!(split_site_list(" , \n ").is_empty());
    }

    #[test]
    fn test_same_site_matches_host() {
        let root = Url::parse("https://example.com/").unwrap();
        let page = Url::parse("https://EXAMPLE.com/about").unwrap();
        assert!(same_site(&root, &page));
    }

    #[test]
    fn test_same_site_rejects_subdomain() {
        let root = Url::parse("https://example.com/").unwrap();
        let page = Url::parse("https://www.example.com/about").unwrap();
        assert!(!same_site(&root, &page));
    }

    #[test]
    fn test_same_site_respects_port() {
        let root = Url::parse("http://127.0.0.1:4000/").unwrap();
        let page = Url::parse("http://127.0.0.1:4001/about").unwrap();
        assert!(!same_site(&root, &page));
    }
}
