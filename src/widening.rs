//! Progressive widening controller.
//!
//! Walks the [`WindowSchedule`] from narrowest to widest. For each window every
//! adapter is queried for all topics concurrently; once all of them have
//! answered (or hit their timeout) the batch is freshness-filtered and merged
//! into the request's accumulator. The walk stops as soon as the accumulator
//! holds `min_articles`, or after the unbounded window.
//!
//! The accumulator is only touched between join points, so no locking is needed
//! and concurrent requests never share state.

use crate::dedup::Deduplicator;
use crate::error::AdapterError;
use crate::freshness::retain_fresh;
use crate::models::{Article, TimeWindow, WindowSchedule};
use crate::sources::SourceAdapter;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// What the controller produced and how far it had to widen.
#[derive(Debug, Clone)]
pub struct WideningOutcome {
    /// Deduplicated articles in acceptance order (not yet sorted).
    pub articles: Vec<Article>,
    /// How many windows were queried, `1..=schedule.len()`.
    pub windows_used: usize,
}

/// Query one adapter for one window under its hard timeout.
async fn fetch_bounded(
    adapter: &dyn SourceAdapter,
    topics: &[String],
    window: &TimeWindow,
    max_candidates: usize,
) -> Vec<Article> {
    let budget = adapter.timeout();
    let started = Instant::now();
    match timeout(budget, adapter.fetch_topics(topics, window, max_candidates)).await {
        Ok(articles) => {
            debug!(
                adapter = adapter.name(),
                count = articles.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Adapter returned"
            );
            articles
        }
        Err(_) => {
            let e = AdapterError::Timeout(budget);
            warn!(adapter = adapter.name(), error = %e, "Adapter call abandoned; treating as empty");
            Vec::new()
        }
    }
}

/// Run the widening loop for one request.
#[instrument(level = "info", skip_all, fields(topics = ?topics, min_articles = min_articles))]
pub async fn run(
    adapters: &[Arc<dyn SourceAdapter>],
    topics: &[String],
    schedule: &WindowSchedule,
    min_articles: usize,
    max_candidates: usize,
) -> WideningOutcome {
    let mut accumulator = Deduplicator::new();
    let mut windows_used = 0;

    for window in schedule.windows() {
        windows_used += 1;

        let batches = join_all(
            adapters
                .iter()
                .map(|adapter| fetch_bounded(adapter.as_ref(), topics, window, max_candidates)),
        )
        .await;

        let now = Utc::now();
        let mut fetched = 0;
        let mut fresh = 0;
        let mut accepted = 0;
        for batch in batches {
            fetched += batch.len();
            let batch = retain_fresh(batch, window, now);
            fresh += batch.len();
            accepted += accumulator.merge(batch);
        }

        info!(
            %window,
            fetched,
            fresh,
            accepted,
            total = accumulator.len(),
            "Window complete"
        );

        if accumulator.len() >= min_articles {
            break;
        }
    }

    WideningOutcome {
        articles: accumulator.into_articles(),
        windows_used,
    }
}
