//! Path heuristics deciding whether a discovered URL is worth scraping
//!
//! Long or deeply nested paths are skipped outright. Blog sections and
//! date-stamped paths are skipped unless they mention a contact keyword.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Paths longer than this are assumed to be articles, not contact pages
const MAX_PATH_LEN: usize = 100;

/// Paths with more separators than this are assumed to be articles
const MAX_PATH_SEPARATORS: usize = 5;

/// Path fragments that mark blog or news content
const BLOG_PATTERNS: &[&str] = &["/posts/", "/articles/", "/news/", "/stories/", "/archive/"];

/// Keywords that rescue a blog-style path
const BLOG_RESCUE_KEYWORDS: &[&str] = &["contact", "about", "team", "support"];

/// Keywords that rescue a date-stamped path
const DATE_RESCUE_KEYWORDS: &[&str] = &["contact", "about", "team"];

static DATE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d{4}/\d{1,2}/\d{1,2}").unwrap());

/// Returns true if the URL is the site's homepage
///
/// The homepage is always scraped regardless of the contact-page heuristics.
pub fn is_homepage(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.path(), "" | "/" | "/index.html"),
        Err(_) => false,
    }
}

/// Checks whether a URL looks like a contact/about page rather than a post
///
/// # Rules
///
/// | Condition | Result |
/// |-----------|--------|
/// | Path empty, `index.html` or `index.php` | valid |
/// | Path longer than 100 chars or more than 5 `/` | invalid |
/// | Blog section (`/posts/`, `/news/`, ...) without contact/about/team/support | invalid |
/// | Date-stamped (`/2024/01/31`) without contact/about/team | invalid |
/// | Anything else | valid |
///
/// Matching is done on the lowercased path with its leading and trailing
/// slashes removed.
pub fn is_valid_contact_page(url: &str) -> bool {
    let lowered = url.to_lowercase();
    let raw_path = match Url::parse(&lowered) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => return false,
    };
    let path = raw_path.trim_matches('/');

    if path.is_empty() || path == "index.html" || path == "index.php" {
        return true;
    }

    if path.len() > MAX_PATH_LEN || path.matches('/').count() > MAX_PATH_SEPARATORS {
        return false;
    }

    if BLOG_PATTERNS.iter().any(|p| path.contains(p))
        && !BLOG_RESCUE_KEYWORDS.iter().any(|k| path.contains(k))
    {
        return false;
    }

    if DATE_PATH.is_match(path) && !DATE_RESCUE_KEYWORDS.iter().any(|k| path.contains(k)) {
        return false;
    }

    true
}
