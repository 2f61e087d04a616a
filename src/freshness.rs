//! Recency filtering against a [`TimeWindow`].

use crate::models::{Article, TimeWindow};
use chrono::{DateTime, Utc};

/// Whether something published at `published_at` qualifies for `window`.
///
/// The unbounded window accepts everything. A bounded window accepts an
/// article whose age is at most the window's duration, so an article published
/// exactly at `now - duration` is still fresh. Articles dated in the future
/// (clock skew at the provider) have a negative age and are accepted.
///
/// # Arguments
///
/// * `published_at` - The article's publish time
/// * `window` - The recency cutoff being applied
/// * `now` - Reference time, shared by every article of one batch
///
/// # Returns
///
/// `true` when the article falls inside the window.
pub fn is_fresh(published_at: DateTime<Utc>, window: &TimeWindow, now: DateTime<Utc>) -> bool {
    match window {
        TimeWindow::Unbounded => true,
        TimeWindow::Bounded(duration) => now - published_at <= *duration,
    }
}

/// Keep only the articles that are fresh for `window`.
pub fn retain_fresh(articles: Vec<Article>, window: &TimeWindow, now: DateTime<Utc>) -> Vec<Article> {
    if !window.is_bounded() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|a| is_fresh(a.published_at(), window, now))
        .collect()
}
