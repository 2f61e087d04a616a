//! Google News RSS search adapter.
//!
//! Queries `https://news.google.com/rss/search` once per topic and window. The
//! window is expressed with Google's `when:` operator (`when:1h`, `when:1d`);
//! the unbounded window simply omits it.

use crate::config::GoogleNewsConfig;
use crate::dedup::dedup_by_link;
use crate::error::{AdapterError, ConfigError};
use crate::models::{Article, TimeWindow};
use crate::sources::{SourceAdapter, build_client, feed, quote_phrase};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Clone)]
pub struct GoogleNewsAdapter {
    client: Client,
    base_url: String,
    language: String,
    country: String,
    timeout: Duration,
}

impl GoogleNewsAdapter {
    pub fn new(config: &GoogleNewsConfig, user_agent: &str) -> Result<Self, ConfigError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(Self {
            client: build_client(timeout, user_agent)?,
            base_url: GOOGLE_NEWS_SEARCH_URL.to_string(),
            language: config.language.clone(),
            country: config.country.clone(),
            timeout,
        })
    }

    /// Build the search URL for one topic and window.
    pub fn search_url(&self, topic: &str, window: &TimeWindow) -> String {
        let mut query = quote_phrase(topic);
        if let Some(when) = when_operator(window) {
            query.push(' ');
            query.push_str(&when);
        }
        let lang = self.language.split('-').next().unwrap_or("en");
        format!(
            "{}?q={}&hl={}&gl={}&ceid={}:{}",
            self.base_url,
            urlencoding::encode(&query),
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.country),
            urlencoding::encode(&self.country),
            urlencoding::encode(lang),
        )
    }

    async fn try_fetch(
        &self,
        topic: &str,
        window: &TimeWindow,
        max_candidates: usize,
    ) -> Result<Vec<Article>, AdapterError> {
        let url = self.search_url(topic, window);
        debug!(%url, "Requesting Google News feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status(status));
        }
        let body = response.text().await?;

        let now = Utc::now();
        let items = feed::parse_items(&body);
        if items.is_empty() {
            debug!(preview = %truncate_for_log(&body, 200), "Feed contained no usable items");
        }
        let articles = items
            .into_iter()
            .filter_map(|raw| Article::from_raw(raw, topic, now))
            .collect();

        Ok(dedup_by_link(articles)
            .into_iter()
            .take(max_candidates)
            .collect())
    }
}

/// Google's `when:` operator only understands whole hours and days.
fn when_operator(window: &TimeWindow) -> Option<String> {
    let duration = window.duration()?;
    let hours = duration.num_hours().max(1);
    if hours % 24 == 0 {
        Some(format!("when:{}d", hours / 24))
    } else {
        Some(format!("when:{hours}h"))
    }
}

#[async_trait]
impl SourceAdapter for GoogleNewsAdapter {
    fn name(&self) -> &str {
        "google_news"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    #[instrument(level = "info", skip(self, window), fields(adapter = "google_news", window = %window))]
    async fn fetch(&self, topic: &str, window: &TimeWindow, max_candidates: usize) -> Vec<Article> {
        match self.try_fetch(topic, window, max_candidates).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched Google News candidates");
                articles
            }
            Err(e) => {
                warn!(error = %e, "Google News fetch failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> GoogleNewsAdapter {
        GoogleNewsAdapter::new(&GoogleNewsConfig::default(), "test-agent").unwrap()
    }

    #[test]
    fn test_when_operator() {
        assert_eq!(when_operator(&TimeWindow::hours(1)).as_deref(), Some("when:1h"));
        assert_eq!(when_operator(&TimeWindow::hours(6)).as_deref(), Some("when:6h"));
        assert_eq!(when_operator(&TimeWindow::hours(24)).as_deref(), Some("when:1d"));
        assert_eq!(when_operator(&TimeWindow::hours(72)).as_deref(), Some("when:3d"));
        assert_eq!(when_operator(&TimeWindow::Unbounded), None);
    }

    #[test]
    fn test_search_url_includes_window_and_locale() {
        let url = adapter().search_url("renewable energy", &TimeWindow::hours(6));
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=%22renewable%20energy%22%20when%3A6h&hl=en-US&gl=US&ceid=US:en"
        );
    }

    #[test]
    fn test_search_url_unbounded_has_no_when() {
        let url = adapter().search_url("solar", &TimeWindow::Unbounded);
        assert!(url.contains("q=solar&"));
        assert!(!url.contains("when"));
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty() {
        let mut adapter = adapter();
        adapter.base_url = "http://127.0.0.1:9/rss/search".to_string();
        let out = adapter.fetch("solar", &TimeWindow::hours(1), 10).await;
        assert!(out.is_empty());
    }
}
