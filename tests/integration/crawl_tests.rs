//! Integration tests for the extractor
//!
//! These tests use wiremock to stand up mock sites and run full batches
//! through the real HTTP transport.

use contact_trawler::config::Config;
use contact_trawler::crawler::BatchCoordinator;
use contact_trawler::storage::{open_history, HistoryStore, InputMethod};
use contact_trawler::{BatchResult, PageStatus};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration: no rate limit spacing, no retries
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.extractor.max_workers = 4;
    config.extractor.page_timeout_ms = 2_000;
    config.extractor.site_timeout_ms = 20_000;
    config.extractor.rate_limit_ms = 0;
    config.extractor.max_retries = 0;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn run(config: &Config, urls: Vec<String>) -> BatchResult {
    let coordinator = BatchCoordinator::from_config(config).expect("Failed to build coordinator");
    coordinator.run(&urls, None).await
}

#[tokio::test]
async fn test_every_input_yields_one_result() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_page(&first, "/", "<p>sales@acme-widgets.com</p>").await;
    mount_page(&second, "/", "<p>Nothing here</p>").await;

    let urls = vec![
        first.uri(),
        second.uri(),
        "not a url".to_string(),
        first.uri(),
    ];
    let batch = run(&create_test_config(), urls).await;

    assert_eq!(batch.sites.len(), 4);

    let invalid = batch.find("not a url").expect("invalid input should have a result");
    assert!(invalid.status.is_error());
    assert!(invalid.pages_crawled.is_empty());

    let found: Vec<_> = batch
        .sites
        .iter()
        .filter(|s| s.url == first.uri())
        .collect();
    assert_eq!(found.len(), 2);
    for site in found {
        assert_eq!(site.emails, vec!["sales@acme-widgets.com"]);
        assert!(site.status.is_success());
    }

    let empty = batch.find(&second.uri()).expect("second site should have a result");
    assert!(empty.emails.is_empty());
    assert!(empty.status.is_success());
}

#[tokio::test]
async fn test_homepage_link_leads_to_obfuscated_email_and_form() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<nav><a href="/contact">Get in touch</a></nav>"#).await;
    mount_page(
        &server,
        "/contact",
        r#"<p>Write to hello [at] globex-corp [dot] com</p>
        <form action="/send">
            <input type="text" name="full_name">
            <input type="email" name="email">
            <textarea name="message"></textarea>
        </form>"#,
    )
    .await;

    let batch = run(&create_test_config(), vec![base.clone()]).await;
    let site = &batch.sites[0];

    assert_eq!(site.emails, vec!["hello@globex-corp.com"]);
    assert!(site.has_contact_form);
    assert_eq!(site.email_sources, vec![format!("{}/contact", base)]);

    // The homepage link comes right after the root, ahead of the common paths
    assert_eq!(site.pages_crawled[1].url, format!("{}/contact", base));
    assert!(site.pages_crawled[1].status.is_success());
    assert!(site.pages_crawled.len() <= 15);
}

#[tokio::test]
async fn test_sitemap_pages_replace_common_paths() {
    let server = MockServer::start().await;
    let base = server.uri();

    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>{base}/</loc></url>
            <url><loc>{base}/contact-us</loc></url>
            <url><loc>{base}/blog</loc></url>
            <url><loc>{base}/products/widgets/contact-sales</loc></url>
        </urlset>"#
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&server)
        .await;

    mount_page(&server, "/", "<p>Welcome</p>").await;
    mount_page(&server, "/contact-us", "<a href=\"mailto:team@initech-labs.com\">Email</a>").await;

    let batch = run(&create_test_config(), vec![base.clone()]).await;
    let site = &batch.sites[0];

    assert_eq!(site.emails, vec!["team@initech-labs.com"]);
    assert_eq!(site.email_sources, vec![format!("{}/contact-us", base)]);

    let crawled: Vec<&str> = site.pages_crawled.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(crawled, vec![base.as_str(), &format!("{}/contact-us", base)]);

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.iter().all(|r| r.url.path() != "/team.php"));
    assert!(requests
        .iter()
        .all(|r| r.url.path() != "/products/widgets/contact-sales"));
}

#[tokio::test]
async fn test_emails_capped_per_site() {
    let server = MockServer::start().await;
    let emails: Vec<String> = ('a'..='g')
        .map(|c| format!("<li>{}@umbrella-co.com</li>", c))
        .collect();
    mount_page(&server, "/", &format!("<ul>{}</ul>", emails.concat())).await;

    let batch = run(&create_test_config(), vec![server.uri()]).await;
    let site = &batch.sites[0];

    assert_eq!(
        site.emails,
        vec![
            "a@umbrella-co.com",
            "b@umbrella-co.com",
            "c@umbrella-co.com",
            "d@umbrella-co.com",
            "e@umbrella-co.com",
        ]
    );
    assert!(site
        .status
        .to_string()
        .starts_with("Success - Found 7 emails (showing 5)"));
}

#[tokio::test]
async fn test_missing_pages_are_recorded_as_http_errors() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Home</p>").await;

    let batch = run(&create_test_config(), vec![server.uri()]).await;
    let site = &batch.sites[0];

    assert_eq!(site.pages_crawled.len(), 15);
    assert_eq!(site.successful_pages, 1);
    assert!(site.pages_crawled[1..]
        .iter()
        .all(|p| p.status == PageStatus::HttpError(404)));
}

#[tokio::test]
async fn test_slow_site_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>late@hooli-media.com</p>").set_delay(Duration::from_millis(1_500)))
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.extractor.page_timeout_ms = 1_000;
    config.extractor.site_timeout_ms = 1_000;

    let batch = run(&config, vec![server.uri()]).await;
    let site = &batch.sites[0];

    assert!(site.status.is_timeout());
    assert!(site.emails.is_empty());
    assert!(site
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("Site processing timeout after")));
}

#[tokio::test]
async fn test_saved_batch_appears_in_history() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>office@stark-ind.com</p>").await;

    let urls = vec![server.uri()];
    let batch = run(&create_test_config(), urls.clone()).await;

    let dir = TempDir::new().unwrap();
    let mut history = open_history(&dir.path().join("history.db"), 15).unwrap();
    let id = history
        .save_extraction(&urls, &batch, InputMethod::Text, Some("Smoke run"), "hash")
        .unwrap();

    let entries = history.load_history().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].name, "Smoke run");
    assert_eq!(entries[0].total_emails_found, 1);
    assert_eq!(entries[0].results[0].emails, vec!["office@stark-ind.com"]);

    let matches = history.search("stark-ind").unwrap();
    assert_eq!(matches.len(), 1);
}
