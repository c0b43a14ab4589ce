//! Sitemap lookup for priority pages

use crate::crawler::fetcher::Fetcher;
use crate::{Result, TrawlerError};
use std::time::Duration;
use url::Url;

/// Sitemap locations tried in order, relative to the site base
pub const SITEMAP_PATHS: [&str; 2] = ["page-sitemap.xml", "sitemap.xml"];

/// Path keywords that mark a sitemap entry as worth crawling
pub const PRIORITY_KEYWORDS: [&str; 4] = ["contact", "about", "services", "company"];

/// Maximum number of priority URLs taken from one sitemap
pub const MAX_SITEMAP_URLS: usize = 12;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Parses a sitemap or sitemap index into its `<loc>` entries
///
/// Entries under `<url>` are collected first, then entries under `<sitemap>`.
/// Elements in the sitemap namespace are preferred; for each of the two
/// element kinds, unqualified elements are only used when the namespaced
/// lookup found nothing.
///
/// # Example
///
/// ```
/// use contact_trawler::crawler::parse_sitemap;
///
/// let xml = r#"<urlset><url><loc> https://example.com/contact </loc></url></urlset>"#;
/// assert_eq!(parse_sitemap(xml).unwrap(), vec!["https://example.com/contact"]);
/// ```
pub fn parse_sitemap(xml: &str) -> std::result::Result<Vec<String>, roxmltree::Error> {
    let document = roxmltree::Document::parse(xml.trim_start_matches('\u{feff}').trim_start())?;

    let mut urls = locs(&document, "url", Some(SITEMAP_NS));
    if urls.is_empty() {
        urls = locs(&document, "url", None);
    }

    urls.extend(locs(&document, "sitemap", Some(SITEMAP_NS)));
    if urls.is_empty() {
        urls = locs(&document, "sitemap", None);
    }

    Ok(urls)
}

/// Trimmed `<loc>` texts whose parent is `parent`, optionally namespace-qualified
fn locs(document: &roxmltree::Document<'_>, parent: &str, namespace: Option<&str>) -> Vec<String> {
    let in_namespace = |node: &roxmltree::Node<'_, '_>| {
        namespace.map_or(true, |ns| node.tag_name().namespace() == Some(ns))
    };

    document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "loc" && in_namespace(node))
        .filter(|node| {
            node.parent_element()
                .is_some_and(|p| p.tag_name().name() == parent && in_namespace(&p))
        })
        .filter_map(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns true if a sitemap entry looks like a contact-related page
///
/// The lowercased path must have at most two segments, and one of them must
/// contain a [`PRIORITY_KEYWORDS`] entry.
///
/// # Examples
///
/// ```
/// use contact_trawler::crawler::is_priority_url;
///
/// assert!(is_priority_url("https://example.com/contact-us/"));
/// assert!(is_priority_url("https://example.com/company/team"));
/// assert!(!is_priority_url("https://example.com/blog/2020/about-our-year"));
/// assert!(!is_priority_url("https://example.com/pricing"));
/// ```
pub fn is_priority_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    let Ok(parsed) = Url::parse(&lowered) else {
        return false;
    };

    let path = parsed.path().trim_matches('/');
    if path.is_empty() {
        return false;
    }

    let segments: Vec<&str> = path.split('/').collect();
    segments.len() <= 2
        && segments
            .iter()
            .any(|segment| PRIORITY_KEYWORDS.iter().any(|kw| segment.contains(kw)))
}

/// Fetches and parses one sitemap
///
/// A non-200 response yields no entries rather than an error.
pub async fn load_sitemap(fetcher: &Fetcher, url: &str, timeout: Duration) -> Result<Vec<String>> {
    let response = fetcher
        .fetch(url, timeout)
        .await
        .map_err(|source| TrawlerError::Fetch {
            url: url.to_string(),
            source,
        })?;

    if response.status != 200 {
        return Ok(Vec::new());
    }

    parse_sitemap(&response.body).map_err(|e| TrawlerError::SitemapParse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Returns up to [`MAX_SITEMAP_URLS`] priority pages from the first sitemap that has any
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for the sitemap requests
/// * `base` - `scheme://host[:port]` of the site
/// * `timeout` - Per-request timeout
pub async fn find_priority_urls(fetcher: &Fetcher, base: &str, timeout: Duration) -> Vec<String> {
    for path in SITEMAP_PATHS {
        let sitemap_url = format!("{}/{}", base, path);

        match load_sitemap(fetcher, &sitemap_url, timeout).await {
            Ok(entries) => {
                let priority: Vec<String> = entries
                    .into_iter()
                    .filter(|url| is_priority_url(url))
                    .take(MAX_SITEMAP_URLS)
                    .collect();

                if !priority.is_empty() {
                    tracing::debug!(
                        sitemap = %sitemap_url,
                        count = priority.len(),
                        "Found priority pages in sitemap"
                    );
                    return priority;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Sitemap unavailable");
            }
        }
    }

    Vec::new()
}
