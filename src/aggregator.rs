//! Aggregation orchestrator: the public entry point of the core.
//!
//! ```ignore
//! let config = AggregatorConfig::default();
//! let aggregator = Aggregator::from_config(&config)?;
//! let articles = aggregator.aggregate(&["renewable energy"], 5).await?;
//! ```
//!
//! One call validates the request, runs the widening controller, sorts the
//! accumulator newest-first, truncates it to the requested count and, when a
//! validator is configured, probes the top links for the logs. Nothing is
//! cached between calls.

use crate::config::AggregatorConfig;
use crate::error::{AggregateError, ConfigError};
use crate::models::{Article, QueryLimits, TopicQuery, WindowSchedule};
use crate::sources::{GdeltAdapter, GoogleNewsAdapter, NewsApiAdapter, SourceAdapter};
use crate::validator::{HttpLinkValidator, LinkValidator, log_top_links};
use crate::widening;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    validator: Option<Arc<dyn LinkValidator>>,
    schedule: WindowSchedule,
    limits: QueryLimits,
    max_candidates: usize,
    validate_top: usize,
}

impl Aggregator {
    /// An aggregator over `adapters` with default limits and no link validation.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, schedule: WindowSchedule) -> Self {
        Self {
            adapters,
            validator: None,
            schedule,
            limits: QueryLimits::default(),
            max_candidates: AggregatorConfig::default().max_candidates,
            validate_top: 0,
        }
    }

    /// Wire up the real sources and validator described by `config`.
    ///
    /// NewsAPI is always registered; without a key it stays inert.
    pub fn from_config(config: &AggregatorConfig) -> Result<Self, ConfigError> {
        let ua = config.user_agent.as_str();
        let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();
        if config.google_news.enabled {
            adapters.push(Arc::new(GoogleNewsAdapter::new(&config.google_news, ua)?));
        }
        adapters.push(Arc::new(NewsApiAdapter::new(&config.news_api, ua)?));
        if config.gdelt.enabled {
            adapters.push(Arc::new(GdeltAdapter::new(&config.gdelt, ua)?));
        }

        let mut aggregator = Self::new(adapters, config.window_schedule())
            .with_limits(config.limits)
            .with_max_candidates(config.max_candidates);
        if config.validate_top > 0 {
            let validator = HttpLinkValidator::new(&config.validator, ua)?;
            aggregator = aggregator.with_validator(Arc::new(validator), config.validate_top);
        }
        Ok(aggregator)
    }

    pub fn with_validator(mut self, validator: Arc<dyn LinkValidator>, top: usize) -> Self {
        self.validator = Some(validator);
        self.validate_top = top;
        self
    }

    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }

    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    /// Validate `topics`/`min_articles` and aggregate.
    ///
    /// # Arguments
    ///
    /// * `topics` - Search topics; blanks and case-insensitive repeats are dropped
    /// * `min_articles` - Articles wanted; `<= 0` means the configured default,
    ///   larger values are clamped to the configured maximum
    ///
    /// # Returns
    ///
    /// A non-empty list of at most `min_articles` articles, newest first, with
    /// no two sharing a link or normalized title.
    ///
    /// # Errors
    ///
    /// * [`AggregateError::InvalidRequest`] when no non-blank topic is given.
    /// * [`AggregateError::NoArticlesFound`] when every source came back empty.
    pub async fn aggregate<S: AsRef<str>>(
        &self,
        topics: &[S],
        min_articles: i64,
    ) -> Result<Vec<Article>, AggregateError> {
        let query = TopicQuery::with_limits(topics, min_articles, &self.limits)?;
        self.aggregate_query(&query).await
    }

    /// Aggregate an already-validated query.
    ///
    /// The result is non-empty, holds at most `query.min_articles()` articles,
    /// has unique links and normalized titles, and is sorted newest-first.
    #[instrument(level = "info", skip_all, fields(topics = ?query.topics(), min_articles = query.min_articles()))]
    pub async fn aggregate_query(&self, query: &TopicQuery) -> Result<Vec<Article>, AggregateError> {
        let t0 = Instant::now();
        let outcome = widening::run(
            &self.adapters,
            query.topics(),
            &self.schedule,
            query.min_articles(),
            self.max_candidates,
        )
        .await;

        let candidates = outcome.articles.len();
        let mut articles = outcome.articles;
        articles.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
        articles.truncate(query.min_articles());

        if articles.is_empty() {
            warn!(
                windows_used = outcome.windows_used,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "No articles found for any window or source"
            );
            return Err(AggregateError::NoArticlesFound {
                topics: query.topics().to_vec(),
            });
        }

        if let Some(validator) = &self.validator {
            log_top_links(validator.as_ref(), &articles, self.validate_top).await;
        }

        info!(
            candidates,
            returned = articles.len(),
            windows_used = outcome.windows_used,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Aggregation complete"
        );
        Ok(articles)
    }
}
