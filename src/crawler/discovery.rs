//! Candidate page discovery
//!
//! Builds the ordered list of pages to scrape for one site from three
//! sources: the site's sitemaps, contact-looking links on the homepage, and
//! a fixed list of common contact page paths.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::crawler::sitemap::find_priority_urls;
use crate::url::{same_site, site_base};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Keywords that mark a homepage link as a likely contact page, matched
/// against the lowercased href and link text
pub const LINK_KEYWORDS: [&str; 8] = [
    "contact", "about", "team", "support", "help", "reach", "location", "office",
];

/// Page stems tried when no sitemap yields anything
pub const FALLBACK_PAGES: [&str; 38] = [
    "contact",
    "contact-us",
    "contactus",
    "contact_us",
    "contactus.html",
    "contact.html",
    "about",
    "about-us",
    "aboutus",
    "about_us",
    "about.html",
    "aboutus.html",
    "team",
    "staff",
    "people",
    "leadership",
    "team.html",
    "our-team",
    "support",
    "help",
    "info",
    "information",
    "support.html",
    "reach-us",
    "get-in-touch",
    "connect",
    "services",
    "service",
    "location",
    "locations",
    "office",
    "offices",
    "address",
    "phone",
    "tel",
    "call",
    "reach",
    "find-us",
];

/// Returns the four URL variants tried for a fallback stem
fn fallback_variants(base: &str, stem: &str) -> [String; 4] {
    [
        format!("{}/{}/", base, stem),
        format!("{}/{}", base, stem),
        format!("{}/{}.html", base, stem),
        format!("{}/{}.php", base, stem),
    ]
}

/// Discovers the pages to scrape for a site
///
/// # Discovery Order
///
/// 1. The root URL itself
/// 2. Priority pages from the first useful sitemap
/// 3. Same-site homepage links whose href or text contains a [`LINK_KEYWORDS`] entry
/// 4. If no sitemap was useful, every [`FALLBACK_PAGES`] variant
///
/// The list is deduplicated in order and truncated to `max_pages`. Failures
/// along the way only shrink the list; the root URL is always first.
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for sitemap and homepage requests
/// * `root` - Normalized root URL of the site
/// * `timeout` - Per-request timeout
/// * `max_pages` - Maximum number of pages returned
pub async fn discover_pages(
    fetcher: &Fetcher,
    root: &str,
    timeout: Duration,
    max_pages: usize,
) -> Vec<String> {
    let Ok(root_url) = Url::parse(root) else {
        return vec![root.to_string()];
    };
    let Some(base) = site_base(&root_url) else {
        return vec![root.to_string()];
    };

    let mut pages = vec![root.to_string()];

    // Step 1: Sitemaps
    let sitemap_pages = find_priority_urls(fetcher, &base, timeout).await;
    pages.extend(sitemap_pages.iter().cloned());

    // Step 2: Homepage links
    for link in homepage_contact_links(fetcher, &root_url, timeout).await {
        if !pages.contains(&link) {
            tracing::debug!(url = %link, "Discovered contact page from homepage");
            pages.push(link);
        }
    }

    // Step 3: Common paths
    if sitemap_pages.is_empty() {
        for stem in FALLBACK_PAGES {
            pages.extend(fallback_variants(&base, stem));
        }
    }

    let pages = dedup_pages(pages, max_pages);
    tracing::debug!(site = root, count = pages.len(), "Discovered candidate pages");
    pages
}

/// Same-site links on the homepage that look like contact pages
async fn homepage_contact_links(fetcher: &Fetcher, root: &Url, timeout: Duration) -> Vec<String> {
    let response = match fetcher.fetch(root.as_str(), timeout).await {
        Ok(response) if response.status == 200 => response,
        Ok(response) => {
            tracing::debug!(
                url = %root,
                status = response.status,
                "Homepage unavailable for link discovery"
            );
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!(url = %root, error = %e, "Could not discover links from homepage");
            return Vec::new();
        }
    };

    // Relative links resolve against where the homepage actually lives
    let base = Url::parse(&response.final_url).unwrap_or_else(|_| root.clone());

    extract_links(&response.body, &base)
        .into_iter()
        .filter(|link| same_site(root, &link.url))
        .filter(|link| {
            let href = link.href.to_lowercase();
            let text = link.text.to_lowercase();
            LINK_KEYWORDS
                .iter()
                .any(|kw| href.contains(kw) || text.contains(kw))
        })
        .map(|link| link.url.to_string())
        .collect()
}

/// Drops later duplicates and truncates to `max_pages`
///
/// URLs are compared in parsed form so `https://a.com` and `https://a.com/`
/// count as one page.
fn dedup_pages(pages: Vec<String>, max_pages: usize) -> Vec<String> {
    let mut seen = HashSet::new();

    pages
        .into_iter()
        .filter(|page| {
            let key = Url::parse(page)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| page.clone());
            seen.insert(key)
        })
        .take(max_pages)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::RetryPolicy;
    use crate::crawler::rate_limiter::RateLimiter;
    use crate::crawler::testing::FakeTransport;
    use std::sync::Arc;

    fn fetcher(transport: &Arc<FakeTransport>) -> Fetcher {
        Fetcher::new(
            transport.clone(),
            Arc::new(RateLimiter::with_jitter(Duration::ZERO, Duration::ZERO)),
            RetryPolicy::immediate(0),
        )
    }

    async fn discover(transport: &Arc<FakeTransport>, root: &str, max_pages: usize) -> Vec<String> {
        discover_pages(&fetcher(transport), root, Duration::from_secs(1), max_pages).await
    }

    const SITEMAP: &str = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
        <url><loc>https://acme.com/</loc></url>
        <url><loc>https://acme.com/about</loc></url>
        <url><loc>https://acme.com/contact</loc></url>
        <url><loc>https://acme.com/products/anvils</loc></url>
    </urlset>"#;

    #[test]
    fn test_fallback_variants() {
        assert_eq!(
            fallback_variants("https://acme.com", "team"),
            [
                "https://acme.com/team/",
                "https://acme.com/team",
                "https://acme.com/team.html",
                "https://acme.com/team.php",
            ]
        );
    }

    #[test]
    fn test_fallback_stem_count() {
        assert_eq!(FALLBACK_PAGES.len(), 38);
        assert_eq!(FALLBACK_PAGES[0], "contact");
        assert_eq!(FALLBACK_PAGES[37], "find-us");
    }

    #[test]
    fn test_dedup_preserves_order() {
        let pages = vec![
            "https://acme.com".to_string(),
            "https://acme.com/contact".to_string(),
            "https://acme.com/".to_string(),
            "https://acme.com/contact".to_string(),
            "https://acme.com/about".to_string(),
        ];
        assert_eq!(
            dedup_pages(pages, 15),
            vec!["https://acme.com", "https://acme.com/contact", "https://acme.com/about"]
        );
    }

    #[tokio::test]
    async fn test_sitemap_pages_follow_root() {
        let transport = Arc::new(FakeTransport::new());
        transport.page("https://acme.com/page-sitemap.xml", 200, SITEMAP);

        let pages = discover(&transport, "https://acme.com", 15).await;
        assert_eq!(
            pages,
            vec!["https://acme.com", "https://acme.com/about", "https://acme.com/contact"]
        );
    }

    #[tokio::test]
    async fn test_homepage_links_added() {
        let transport = Arc::new(FakeTransport::new());
        transport.page("https://acme.com/page-sitemap.xml", 200, SITEMAP);
        transport.page(
            "https://acme.com/",
            200,
            r#"<a href="/reach-out">Get in touch</a>
               <a href="/pricing">Help center</a>
               <a href="/products">Products</a>
               <a href="https://other.com/contact">Partner</a>"#,
        );

        let pages = discover(&transport, "https://acme.com", 15).await;
        assert_eq!(
            pages,
            vec![
                "https://acme.com",
                "https://acme.com/about",
                "https://acme.com/contact",
                "https://acme.com/reach-out",
                "https://acme.com/pricing",
            ]
        );
    }

    #[tokio::test]
    async fn test_homepage_links_resolved_after_redirect() {
        let transport = Arc::new(FakeTransport::new());
        transport.page("https://acme.com/page-sitemap.xml", 200, SITEMAP);
        transport.redirect("https://acme.com/", "https://acme.com/en/");
        transport.page(
            "https://acme.com/en/",
            200,
            r#"<a href="contact-form">Contact</a>"#,
        );

        let pages = discover(&transport, "https://acme.com", 15).await;
        assert_eq!(
            pages.last().map(String::as_str),
            Some("https://acme.com/en/contact-form")
        );
        assert!(!pages.contains(&"https://acme.com/contact-form".to_string()));
    }

    #[tokio::test]
    async fn test_fallback_paths_without_sitemap() {
        let transport = Arc::new(FakeTransport::new());

        let pages = discover(&transport, "https://acme.com", 15).await;
        assert_eq!(pages.len(), 15);
        assert_eq!(pages[0], "https://acme.com");
        assert_eq!(pages[1], "https://acme.com/contact/");
        assert_eq!(pages[2], "https://acme.com/contact");
        assert_eq!(pages[3], "https://acme.com/contact.html");
        assert_eq!(pages[4], "https://acme.com/contact.php");
    }

    #[tokio::test]
    async fn test_max_pages_respected() {
        let transport = Arc::new(FakeTransport::new());
        let pages = discover(&transport, "https://acme.com", 3).await;
        assert_eq!(pages.len(), 3);
    }

    #[tokio::test]
    async fn test_port_kept_in_fallback_paths() {
        let transport = Arc::new(FakeTransport::new());
        let pages = discover(&transport, "http://127.0.0.1:8080", 2).await;
        assert_eq!(pages, vec!["http://127.0.0.1:8080", "http://127.0.0.1:8080/contact/"]);
    }
}
