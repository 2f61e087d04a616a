//! Data models for aggregated articles and aggregation requests.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`Article`]: A normalized, immutable article record shared by every source
//! - [`RawArticle`]: Loosely-typed fields pulled out of a provider response
//! - [`TopicQuery`]: A validated aggregation request
//! - [`TimeWindow`] and [`WindowSchedule`]: The recency cutoffs the widening
//!   controller walks through
//!
//! [`Article`] serializes with camelCase field names (`publishedAt`) because
//! that is the shape the generation layer and UI consume.

use crate::error::AggregateError;
use crate::utils::{collapse_whitespace, domain_of, parse_http_url, strip_html, truncate_chars};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Maximum characters kept from a headline.
pub const MAX_TITLE_CHARS: usize = 200;
/// Maximum characters kept from a synopsis.
pub const MAX_SUMMARY_CHARS: usize = 300;

/// A normalized news article.
///
/// Instances only come out of [`Article::new`] or [`Article::from_raw`], so every
/// article has a non-empty bounded title, a bounded plain-text summary, a
/// publisher label and an absolute `http`/`https` link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    title: String,
    summary: String,
    source: String,
    link: String,
    published_at: DateTime<Utc>,
}

impl Article {
    /// Build an article from already-clean fields.
    ///
    /// Returns `None` when the title is blank or the link is not an absolute
    /// `http`/`https` URL. Title and summary are truncated to their bounds.
    pub fn new(
        title: &str,
        summary: &str,
        source: &str,
        link: &str,
        published_at: DateTime<Utc>,
    ) -> Option<Self> {
        let title = collapse_whitespace(title);
        if title.is_empty() {
            return None;
        }
        let link = parse_http_url(link)?.to_string();
        let source = match collapse_whitespace(source) {
            s if s.is_empty() => domain_of(&link)?,
            s => s,
        };
        Some(Self {
            title: truncate_chars(&title, MAX_TITLE_CHARS),
            summary: truncate_chars(&collapse_whitespace(summary), MAX_SUMMARY_CHARS),
            source,
            link,
            published_at,
        })
    }

    /// Normalize a provider item, filling the gaps sources commonly leave.
    ///
    /// * `source` falls back to the link's domain.
    /// * `summary` is HTML-stripped, and synthesized from the topic and
    ///   publisher when the provider gave none.
    /// * `published_at` falls back to `now`.
    ///
    /// # Arguments
    ///
    /// * `raw` - Fields as extracted from the provider response
    /// * `topic` - The topic searched for, used in a synthesized summary
    /// * `now` - Publish time for items that carry none
    ///
    /// # Returns
    ///
    /// `None` when the item has no usable title or `http`/`https` link.
    pub fn from_raw(raw: RawArticle, topic: &str, now: DateTime<Utc>) -> Option<Self> {
        let link = raw.link.as_deref().map(str::trim).filter(|l| !l.is_empty())?;
        let title = raw.title.as_deref().map(strip_html).unwrap_or_default();
        let source = raw
            .source
            .as_deref()
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty())
            .or_else(|| domain_of(link))?;
        let summary = raw
            .summary
            .as_deref()
            .map(strip_html)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("Recent coverage of {topic} from {source}."));

        Self::new(
            &title,
            &summary,
            &source,
            link,
            raw.published_at.unwrap_or(now),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// Fields extracted from a single provider item before normalization.
///
/// Every field is optional because the feeds we read are loose about what they
/// include; [`Article::from_raw`] decides what is fatal and what gets a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub title: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Bounds applied to incoming requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    /// Topics beyond this count are ignored.
    pub max_topics: usize,
    /// Upper clamp for the requested article count.
    pub max_articles: usize,
    /// Used when the requested article count is zero or negative.
    pub default_articles: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_topics: 10,
            max_articles: 20,
            default_articles: 5,
        }
    }
}

/// A validated aggregation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicQuery {
    topics: Vec<String>,
    min_articles: usize,
}

impl TopicQuery {
    /// Validate with the default [`QueryLimits`].
    pub fn new<S: AsRef<str>>(topics: &[S], min_articles: i64) -> Result<Self, AggregateError> {
        Self::with_limits(topics, min_articles, &QueryLimits::default())
    }

    /// Trim and deduplicate topics, cap their count, and clamp `min_articles`.
    ///
    /// # Errors
    ///
    /// [`AggregateError::InvalidRequest`] when no non-blank topic remains.
    pub fn with_limits<S: AsRef<str>>(
        topics: &[S],
        min_articles: i64,
        limits: &QueryLimits,
    ) -> Result<Self, AggregateError> {
        let mut seen = HashSet::new();
        let mut cleaned: Vec<String> = topics
            .iter()
            .map(|t| collapse_whitespace(t.as_ref()))
            .filter(|t| !t.is_empty())
            .filter(|t| seen.insert(t.to_lowercase()))
            .collect();

        if cleaned.is_empty() {
            return Err(AggregateError::InvalidRequest(
                "at least one non-empty topic is required".to_string(),
            ));
        }
        let max_topics = limits.max_topics.max(1);
        if cleaned.len() > max_topics {
            warn!(
                requested = cleaned.len(),
                max = max_topics,
                "Too many topics; ignoring the excess"
            );
            cleaned.truncate(max_topics);
        }

        let max_articles = limits.max_articles.max(1);
        let min_articles = if min_articles <= 0 {
            limits.default_articles.clamp(1, max_articles)
        } else {
            usize::try_from(min_articles)
                .unwrap_or(max_articles)
                .min(max_articles)
        };

        Ok(Self {
            topics: cleaned,
            min_articles,
        })
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn min_articles(&self) -> usize {
        self.min_articles
    }
}

/// A recency cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Only articles at most this old qualify.
    Bounded(Duration),
    /// No cutoff at all.
    Unbounded,
}

impl TimeWindow {
    pub fn hours(h: i64) -> Self {
        TimeWindow::Bounded(Duration::hours(h))
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            TimeWindow::Bounded(d) => Some(*d),
            TimeWindow::Unbounded => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, TimeWindow::Bounded(_))
    }

    /// The earliest qualifying publish time relative to `now`.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|d| now - d)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::Bounded(d) if d.num_seconds() % 3600 == 0 => {
                write!(f, "{}h", d.num_hours())
            }
            TimeWindow::Bounded(d) => write!(f, "{}s", d.num_seconds()),
            TimeWindow::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Ascending bounded windows followed by exactly one unbounded window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSchedule {
    windows: Vec<TimeWindow>,
}

impl WindowSchedule {
    /// Sort and deduplicate the bounded durations, drop non-positive ones,
    /// and append the unbounded terminator.
    pub fn new(mut bounded: Vec<Duration>) -> Self {
        bounded.retain(|d| *d > Duration::zero());
        bounded.sort();
        bounded.dedup();
        let mut windows: Vec<TimeWindow> = bounded.into_iter().map(TimeWindow::Bounded).collect();
        windows.push(TimeWindow::Unbounded);
        Self { windows }
    }

    /// Build a schedule from whole hours, as found in configuration.
    ///
    /// Hours too large to represent as a duration are dropped along with
    /// zeroes.
    pub fn from_hours(hours: &[u64]) -> Self {
        Self::new(
            hours
                .iter()
                .filter_map(|h| i64::try_from(*h).ok().and_then(Duration::try_hours))
                .collect(),
        )
    }

    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl Default for WindowSchedule {
    /// `[1h, 6h, 24h, unbounded]`
    fn default() -> Self {
        Self::from_hours(&[1, 6, 24])
    }
}
