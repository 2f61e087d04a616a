//! Scripted adapter for offline controller and orchestrator tests.

use crate::models::{Article, TimeWindow};
use crate::sources::SourceAdapter;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fresh article published `minutes_ago` before now.
pub fn fresh_article(title: &str, link: &str, minutes_ago: i64) -> Article {
    Article::new(
        title,
        "",
        "stub",
        link,
        Utc::now() - ChronoDuration::minutes(minutes_ago),
    )
    .unwrap()
}

/// Returns `per_window[i]` on the i-th window it is asked about.
///
/// Windows past the end of the script return nothing.
pub struct StubAdapter {
    name: String,
    per_window: Vec<Vec<Article>>,
    delay: Option<Duration>,
    timeout: Duration,
    calls: AtomicUsize,
    windows_seen: Mutex<Vec<TimeWindow>>,
}

impl StubAdapter {
    pub fn new(name: &str, per_window: Vec<Vec<Article>>) -> Self {
        Self {
            name: name.to_string(),
            per_window,
            delay: None,
            timeout: Duration::from_secs(5),
            calls: AtomicUsize::new(0),
            windows_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn empty(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    /// Sleep for `delay` before answering, with a hard budget of `timeout`.
    pub fn slow(mut self, delay: Duration, timeout: Duration) -> Self {
        self.delay = Some(delay);
        self.timeout = timeout;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn windows_seen(&self) -> Vec<TimeWindow> {
        self.windows_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceAdapter for StubAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, _topic: &str, window: &TimeWindow, max_candidates: usize) -> Vec<Article> {
        self.fetch_topics(&[], window, max_candidates).await
    }

    /// One scripted batch per window, regardless of how many topics there are.
    async fn fetch_topics(
        &self,
        _topics: &[String],
        window: &TimeWindow,
        max_candidates: usize,
    ) -> Vec<Article> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows_seen.lock().unwrap().push(*window);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.per_window
            .get(call)
            .map(|batch| batch.iter().take(max_candidates).cloned().collect())
            .unwrap_or_default()
    }
}
