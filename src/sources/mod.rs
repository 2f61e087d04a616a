//! News source adapters.
//!
//! Every adapter normalizes a provider's response into [`Article`]s and obeys
//! the same contract: it never fails. Network, parse and timeout problems are
//! logged and the call contributes an empty list, so one broken provider only
//! means fewer candidates for that window.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Google News | [`google_news`] | RSS search | One request per topic and window |
//! | NewsAPI | [`newsapi`] | JSON `/v2/everything` | Requires API key; one OR-combined request |
//! | GDELT | [`gdelt`] | JSON DOC 2.0 API | One request per topic; checks content-type |
//!
//! The tolerant syndication parser lives in [`feed`] so it can be swapped for
//! a real XML parser without touching any adapter or the controller.

use crate::dedup::dedup_by_link;
use crate::error::ConfigError;
use crate::models::{Article, TimeWindow};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;

pub mod feed;
pub mod gdelt;
pub mod google_news;
pub mod newsapi;
#[cfg(test)]
pub(crate) mod stub;

pub use gdelt::GdeltAdapter;
pub use google_news::GoogleNewsAdapter;
pub use newsapi::NewsApiAdapter;

/// A source that can search by topic within a recency window.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short, stable name used in logs.
    fn name(&self) -> &str;

    /// Hard budget for a single [`fetch_topics`](Self::fetch_topics) call.
    fn timeout(&self) -> Duration;

    /// Fetch up to `max_candidates` articles for one topic.
    ///
    /// Never fails: any error is logged and yields an empty list. The result
    /// holds no repeated links.
    async fn fetch(&self, topic: &str, window: &TimeWindow, max_candidates: usize) -> Vec<Article>;

    /// Fetch for every topic of a request.
    ///
    /// The default issues one [`fetch`](Self::fetch) per topic concurrently and
    /// merges the lists by link. Adapters whose provider accepts boolean
    /// queries override this with a single combined request.
    async fn fetch_topics(
        &self,
        topics: &[String],
        window: &TimeWindow,
        max_candidates: usize,
    ) -> Vec<Article> {
        let per_topic = join_all(
            topics
                .iter()
                .map(|topic| self.fetch(topic, window, max_candidates)),
        )
        .await;
        dedup_by_link(per_topic.into_iter().flatten().collect())
    }
}

/// Build the HTTP client an adapter uses for its calls.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, ConfigError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?)
}

/// Quote multi-word topics so providers treat them as phrases.
pub(crate) fn quote_phrase(topic: &str) -> String {
    let topic = topic.replace('"', "");
    if topic.contains(char::is_whitespace) {
        format!("\"{topic}\"")
    } else {
        topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    struct EchoAdapter {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SourceAdapter for EchoAdapter {
        fn name(&self) -> &str {
            "echo"
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        async fn fetch(&self, topic: &str, _window: &TimeWindow, _max: usize) -> Vec<Article> {
            self.calls.lock().unwrap().push(topic.to_string());
            let shared = Article::new("Shared", "", "echo", "https://example.com/shared", Utc::now());
            let own = Article::new(
                topic,
                "",
                "echo",
                &format!("https://example.com/{}", topic.replace(' ', "-")),
                Utc::now(),
            );
            shared.into_iter().chain(own).collect()
        }
    }

    #[tokio::test]
    async fn test_default_fetch_topics_fans_out_and_dedups_links() {
        let adapter = EchoAdapter {
            calls: Mutex::new(Vec::new()),
        };
        let topics = vec!["solar".to_string(), "wind power".to_string()];
        let out = adapter.fetch_topics(&topics, &TimeWindow::hours(1), 10).await;

        let mut calls = adapter.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, vec!["solar", "wind power"]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_quote_phrase() {
        assert_eq!(quote_phrase("solar"), "solar");
        assert_eq!(quote_phrase("renewable energy"), "\"renewable energy\"");
        assert_eq!(quote_phrase("say \"hi\" now"), "\"say hi now\"");
    }
}
