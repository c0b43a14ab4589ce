//! HTML analysis for contact discovery
//!
//! This module handles parsing page content to extract:
//! - Email addresses from every place a site tends to hide them
//! - Whether the page carries a contact form
//! - Links with their visible text, for finding contact pages

use crate::extract::{extract_emails, has_contact_form};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static QUOTED_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']*@[^"']*\.[^"']*)["']"#).unwrap());

static JSON_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["']email["']\s*:\s*["']([^"']*@[^"']*\.[^"']*)["']"#).unwrap()
});

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
static DATA_EMAIL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[data-email]").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta[content]").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static ANY_ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static FIELD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("input, textarea").unwrap());
static HIDDEN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script, style").unwrap());

/// What a page yielded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAnalysis {
    pub emails: BTreeSet<String>,
    pub has_contact_form: bool,
}

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Absolute URL with any fragment removed
    pub url: Url,

    /// The raw `href` attribute
    pub href: String,

    /// Visible link text, trimmed
    pub text: String,
}

/// Extracts emails and contact-form presence from an HTML page
///
/// # Sources
///
/// Every source is run through [`extract_emails`] and the results are unioned:
///
/// 1. The raw HTML
/// 2. HTML comments
/// 3. Quoted strings containing `@`, as found in inline JavaScript
/// 4. `"email": "..."` pairs, as found in embedded JSON
/// 5. Text of `<script>` elements
/// 6. `data-email` attributes
/// 7. `<meta content>` attributes
/// 8. Link targets and link text
/// 9. `value` and `placeholder` of form fields
/// 10. Visible text and markup with `<script>`/`<style>` removed
/// 11. `mailto:` targets, without query parameters
///
/// Contact-form detection runs on the untouched document.
pub fn analyze_html(html: &str) -> PageAnalysis {
    let mut emails = extract_emails(html);

    for comment in HTML_COMMENT.find_iter(html) {
        emails.extend(extract_emails(comment.as_str()));
    }

    for regex in [&*QUOTED_EMAIL, &*JSON_EMAIL] {
        for caps in regex.captures_iter(html) {
            emails.extend(extract_emails(&caps[1]));
        }
    }

    let document = Html::parse_document(html);
    let has_contact_form = has_contact_form(&document);

    for script in document.select(&SCRIPT) {
        let text: String = script.text().collect();
        emails.extend(extract_emails(&text));
    }

    for element in document.select(&DATA_EMAIL) {
        if let Some(value) = element.value().attr("data-email") {
            emails.extend(extract_emails(value));
        }
    }

    for meta in document.select(&META) {
        if let Some(content) = meta.value().attr("content") {
            emails.extend(extract_emails(content));
        }
    }

    for link in document.select(&ANY_ANCHOR) {
        if let Some(href) = link.value().attr("href") {
            emails.extend(extract_emails(href));
        }
        let text: String = link.text().collect();
        if !text.trim().is_empty() {
            emails.extend(extract_emails(&text));
        }
    }

    for field in document.select(&FIELD) {
        for attr in ["value", "placeholder"] {
            if let Some(value) = field.value().attr(attr) {
                emails.extend(extract_emails(value));
            }
        }
    }

    let visible = strip_hidden(html);
    let text = visible.root_element().text().collect::<Vec<_>>().join(" ");
    emails.extend(extract_emails(&text));
    emails.extend(extract_emails(&visible.html()));

    for target in mailto_targets(&document) {
        emails.extend(extract_emails(&target));
    }

    PageAnalysis {
        emails,
        has_contact_form,
    }
}

/// Parses `html` and detaches every `<script>` and `<style>` element
fn strip_hidden(html: &str) -> Html {
    let mut document = Html::parse_document(html);
    let hidden: Vec<_> = document.select(&HIDDEN).map(|element| element.id()).collect();

    for id in hidden {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document
}

/// Addresses named by `mailto:` links, split on `&` and stripped of query strings
fn mailto_targets(document: &Html) -> Vec<String> {
    let mut targets = Vec::new();

    for link in document.select(&ANCHOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !href.to_ascii_lowercase().starts_with("mailto:") {
            continue;
        }

        // "mailto:" is ASCII, so byte 7 is a char boundary
        let recipients = href[7..].split('?').next().unwrap_or_default();
        targets.extend(
            recipients
                .split('&')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }

    targets
}

/// Extracts links from a page, resolved against `base_url`
///
/// # Exclusions
///
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Links with the `download` attribute
/// - Non-HTTP(S) URLs after resolution
///
/// # Example
///
/// ```
/// use contact_trawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/contact-us">Get in touch</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links[0].url.as_str(), "https://example.com/contact-us");
/// assert_eq!(links[0].text, "Get in touch");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<PageLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for element in document.select(&ANCHOR) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_link(href, base_url) {
            links.push(PageLink {
                url,
                href: href.to_string(),
                text: element.text().collect::<String>().trim().to_string(),
            });
        }
    }

    links
}

/// Resolves a link href to an absolute URL, or None if it should be excluded
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut url = base_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}
