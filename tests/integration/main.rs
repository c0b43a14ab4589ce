//! End-to-end tests against mock HTTP sites

mod crawl_tests;
