//! NewsAPI (`/v2/everything`) adapter.
//!
//! Key-gated: without an API key the adapter is inert. It contributes no
//! candidates, never errors, and says so once in the logs. With a key it sends
//! ONE request per call, OR-ing every topic together, and filters out the
//! `[Removed]` placeholders NewsAPI returns for retracted articles.

use crate::config::NewsApiConfig;
use crate::dedup::dedup_by_link;
use crate::error::{AdapterError, ConfigError};
use crate::models::{Article, RawArticle, TimeWindow};
use crate::sources::{SourceAdapter, build_client, quote_phrase};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const NEWSAPI_EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";
/// NewsAPI refuses page sizes above this.
const MAX_PAGE_SIZE: usize = 100;
const REMOVED_TITLE: &str = "[Removed]";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

impl NewsApiArticle {
    fn is_removed(&self) -> bool {
        let removed_title = self.title.as_deref().map(str::trim) == Some(REMOVED_TITLE);
        let removed_url = self
            .url
            .as_deref()
            .is_some_and(|u| u.contains("removed.com"));
        removed_title || removed_url
    }

    fn into_raw(self) -> RawArticle {
        RawArticle {
            title: self.title,
            link: self.url,
            source: self.source.and_then(|s| s.name),
            summary: self.description,
            published_at: self
                .published_at
                .as_deref()
                .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug)]
pub struct NewsApiAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
    timeout: Duration,
    announced_disabled: AtomicBool,
}

impl NewsApiAdapter {
    pub fn new(config: &NewsApiConfig, user_agent: &str) -> Result<Self, ConfigError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(Self {
            client: build_client(timeout, user_agent)?,
            base_url: NEWSAPI_EVERYTHING_URL.to_string(),
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            language: config.language.clone(),
            timeout,
            announced_disabled: AtomicBool::new(false),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Query parameters for one combined request.
    fn query_params(
        &self,
        topics: &[String],
        window: &TimeWindow,
        max_candidates: usize,
        now: DateTime<Utc>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", combined_query(topics)),
            ("language", self.language.clone()),
            ("sortBy", "publishedAt".to_string()),
            ("pageSize", max_candidates.clamp(1, MAX_PAGE_SIZE).to_string()),
        ];
        if let Some(since) = window.since(now) {
            params.push(("from", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        params
    }

    async fn try_fetch(
        &self,
        topics: &[String],
        window: &TimeWindow,
        max_candidates: usize,
    ) -> Result<Vec<Article>, AdapterError> {
        let api_key = self.api_key.as_deref().ok_or(AdapterError::MissingCredential)?;
        let now = Utc::now();
        let params = self.query_params(topics, window, max_candidates, now);
        debug!(?params, "Requesting NewsAPI");

        let response = self
            .client
            .get(&self.base_url)
            .header("X-Api-Key", api_key)
            .query(&params)
            .send()
            .await?;
        // NewsAPI reports errors with a JSON body, so parse before checking status.
        let status = response.status();
        let body = response.text().await?;
        let articles = match parse_response(&body, topics, now) {
            Ok(articles) => articles,
            Err(e) if !status.is_success() => {
                debug!(error = %e, "Unparseable NewsAPI error body");
                return Err(AdapterError::Status(status));
            }
            Err(e) => return Err(e),
        };

        Ok(articles.into_iter().take(max_candidates).collect())
    }

    fn announce_disabled_once(&self) {
        if !self.announced_disabled.swap(true, Ordering::Relaxed) {
            info!("NewsAPI key not configured; skipping NewsAPI source");
        }
    }
}

/// `"renewable energy" OR solar`
fn combined_query(topics: &[String]) -> String {
    topics
        .iter()
        .map(|t| quote_phrase(t))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Parse a NewsAPI body into deduplicated articles, dropping removed items.
///
/// The first topic is used when a summary has to be synthesized; a combined
/// query cannot say which topic matched.
fn parse_response(body: &str, topics: &[String], now: DateTime<Utc>) -> Result<Vec<Article>, AdapterError> {
    let response: NewsApiResponse = serde_json::from_str(body)?;
    if response.status != "ok" {
        return Err(AdapterError::Provider(format!(
            "{}: {}",
            response.code.unwrap_or_else(|| "unknown".to_string()),
            response.message.unwrap_or_else(|| "no message".to_string())
        )));
    }

    let topic = topics.first().map(String::as_str).unwrap_or("the news");
    let total = response.articles.len();
    let articles: Vec<Article> = response
        .articles
        .into_iter()
        .filter(|a| !a.is_removed())
        .filter_map(|a| Article::from_raw(a.into_raw(), topic, now))
        .collect();
    debug!(total, kept = articles.len(), "Parsed NewsAPI response");

    Ok(dedup_by_link(articles))
}

#[async_trait]
impl SourceAdapter for NewsApiAdapter {
    fn name(&self) -> &str {
        "newsapi"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, topic: &str, window: &TimeWindow, max_candidates: usize) -> Vec<Article> {
        self.fetch_topics(&[topic.to_string()], window, max_candidates)
            .await
    }

    #[instrument(level = "info", skip_all, fields(adapter = "newsapi", topics = topics.len(), window = %window))]
    async fn fetch_topics(
        &self,
        topics: &[String],
        window: &TimeWindow,
        max_candidates: usize,
    ) -> Vec<Article> {
        if !self.is_enabled() {
            self.announce_disabled_once();
            return Vec::new();
        }
        if topics.is_empty() {
            return Vec::new();
        }
        match self.try_fetch(topics, window, max_candidates).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched NewsAPI candidates");
                articles
            }
            Err(e) => {
                warn!(error = %e, "NewsAPI fetch failed");
                Vec::new()
            }
        }
    }
}
