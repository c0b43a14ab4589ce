//! Scripted transport for unit tests

use crate::crawler::transport::{FetchError, FetchResponse, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

type Scripted = Result<(u16, String), FetchError>;

/// A [`Transport`] that serves canned responses
///
/// Each URL has a queue of outcomes. Outcomes are served in order and the
/// last one repeats forever. Unknown URLs answer 404. A redirected URL is
/// served from its target and reports the target as its final URL.
#[derive(Default)]
pub struct FakeTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    redirects: Mutex<HashMap<String, String>>,
    log: Mutex<Vec<String>>,
    latency: Duration,
}

fn key(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response by `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn page(&self, url: &str, status: u16, body: &str) {
        self.sequence(url, vec![Ok((status, body.to_string()))]);
    }

    pub fn failure(&self, url: &str, err: FetchError) {
        self.sequence(url, vec![Err(err)]);
    }

    pub fn sequence(&self, url: &str, outcomes: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(key(url), outcomes.into_iter().collect());
    }

    pub fn redirect(&self, from: &str, to: &str) {
        self.redirects.lock().unwrap().insert(key(from), key(to));
    }

    /// Every requested URL, in request order
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        let url = key(url);
        self.log.lock().unwrap().iter().filter(|u| **u == url).count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<FetchResponse, FetchError> {
        let url = key(url);
        self.log.lock().unwrap().push(url.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let target = self
            .redirects
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .unwrap_or(url);

        let outcome = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&target) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        let (status, body) = outcome.unwrap_or_else(|| Ok((404, String::new())))?;
        Ok(FetchResponse {
            final_url: target,
            status,
            body,
        })
    }
}
