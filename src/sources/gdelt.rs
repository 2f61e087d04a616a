//! GDELT DOC 2.0 API adapter.
//!
//! One request per topic in `ArtList` mode. Windows are sent as
//! `startdatetime`/`enddatetime` in GDELT's compact `YYYYMMDDHHMMSS` UTC form.
//! GDELT answers query errors with `text/html` or `text/plain` bodies even on
//! HTTP 200, so the content-type is checked before any JSON parsing.

use crate::config::GdeltConfig;
use crate::dedup::dedup_by_link;
use crate::error::{AdapterError, ConfigError};
use crate::models::{Article, RawArticle, TimeWindow};
use crate::sources::{SourceAdapter, build_client, quote_phrase};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const GDELT_DOC_URL: &str = "https://api.gdeltproject.org/api/v2/doc/doc";
/// GDELT caps `maxrecords` at 250.
const MAX_RECORDS: usize = 250;
const COMPACT_FORMAT: &str = "%Y%m%d%H%M%S";
const SEENDATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Deserialize)]
struct GdeltResponse {
    #[serde(default)]
    articles: Vec<GdeltArticle>,
}

#[derive(Debug, Deserialize)]
struct GdeltArticle {
    url: Option<String>,
    title: Option<String>,
    seendate: Option<String>,
    domain: Option<String>,
    sourcecountry: Option<String>,
}

impl GdeltArticle {
    fn into_raw(self, topic: &str) -> RawArticle {
        // GDELT carries no synopsis; describe where the story came from instead.
        let summary = self.domain.as_deref().map(|domain| {
            match self.sourcecountry.as_deref().filter(|c| !c.is_empty()) {
                Some(country) => format!("Coverage of {topic} from {domain} ({country})."),
                None => format!("Coverage of {topic} from {domain}."),
            }
        });
        RawArticle {
            published_at: self.seendate.as_deref().and_then(parse_seendate),
            title: self.title,
            link: self.url,
            source: self.domain,
            summary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GdeltAdapter {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GdeltAdapter {
    pub fn new(config: &GdeltConfig, user_agent: &str) -> Result<Self, ConfigError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(Self {
            client: build_client(timeout, user_agent)?,
            base_url: GDELT_DOC_URL.to_string(),
            timeout,
        })
    }

    fn query_params(
        &self,
        topic: &str,
        window: &TimeWindow,
        max_candidates: usize,
        now: DateTime<Utc>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", quote_phrase(topic)),
            ("mode", "ArtList".to_string()),
            ("format", "json".to_string()),
            ("sort", "DateDesc".to_string()),
            ("maxrecords", max_candidates.clamp(1, MAX_RECORDS).to_string()),
        ];
        if let Some(since) = window.since(now) {
            params.push(("startdatetime", compact_timestamp(since)));
            params.push(("enddatetime", compact_timestamp(now)));
        }
        params
    }

    async fn try_fetch(
        &self,
        topic: &str,
        window: &TimeWindow,
        max_candidates: usize,
    ) -> Result<Vec<Article>, AdapterError> {
        let now = Utc::now();
        let params = self.query_params(topic, window, max_candidates, now);
        debug!(?params, "Requesting GDELT");

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status(status));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        let articles = parse_body(&content_type, &body, topic, now)?;
        Ok(articles.into_iter().take(max_candidates).collect())
    }
}

/// `2025-05-06T12:00:00Z` becomes `20250506120000`.
pub fn compact_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(COMPACT_FORMAT).to_string()
}

/// Parse GDELT's `seendate` (`20250506T114500Z`).
fn parse_seendate(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), SEENDATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// Turn a GDELT response into articles.
///
/// Non-JSON content types are reported as [`AdapterError::UnexpectedContentType`]
/// without attempting to parse. An empty JSON body (`{}`) is a valid "no results".
fn parse_body(
    content_type: &str,
    body: &str,
    topic: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Article>, AdapterError> {
    if !is_json_content_type(content_type) {
        return Err(AdapterError::UnexpectedContentType {
            content_type: content_type.to_string(),
            preview: truncate_for_log(body.trim(), 120),
        });
    }
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let response: GdeltResponse = serde_json::from_str(body)?;
    let articles = response
        .articles
        .into_iter()
        .filter_map(|a| Article::from_raw(a.into_raw(topic), topic, now))
        .collect();
    Ok(dedup_by_link(articles))
}

#[async_trait]
impl SourceAdapter for GdeltAdapter {
    fn name(&self) -> &str {
        "gdelt"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    #[instrument(level = "info", skip(self, window), fields(adapter = "gdelt", window = %window))]
    async fn fetch(&self, topic: &str, window: &TimeWindow, max_candidates: usize) -> Vec<Article> {
        match self.try_fetch(topic, window, max_candidates).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched GDELT candidates");
                articles
            }
            Err(e) => {
                warn!(error = %e, "GDELT fetch failed");
                Vec::new()
            }
        }
    }
}
