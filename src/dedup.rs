//! Cross-source deduplication.
//!
//! Two articles are the same story when their links match case-insensitively
//! OR their normalized titles match. The title key catches syndicated copies
//! and tracking-URL variants of one story that arrive from different sources.

use crate::models::Article;
use itertools::Itertools;
use std::collections::HashSet;

/// Lowercase, drop punctuation, collapse whitespace.
///
/// `"Breaking: Solar Output Hits Record!"` and `"breaking solar output hits record"`
/// normalize to the same key.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}

fn link_key(link: &str) -> String {
    link.trim().to_lowercase()
}

/// Drop repeated links within a single source response, keeping the first.
pub fn dedup_by_link(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .unique_by(|a| link_key(a.link()))
        .collect()
}

/// A running, deduplicated article list.
///
/// Owned by one aggregation request; the `seen` sets cover the entire history
/// merged so far, not just the latest batch.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    articles: Vec<Article>,
    seen_links: HashSet<String>,
    seen_titles: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from an existing list, applying the same rules as [`merge`](Self::merge).
    pub fn from_articles(existing: impl IntoIterator<Item = Article>) -> Self {
        let mut dedup = Self::new();
        dedup.merge(existing);
        dedup
    }

    /// Append every incoming article that collides with nothing already held.
    ///
    /// Accepted articles keep their arrival order. Returns how many were accepted.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Article>) -> usize {
        let mut accepted = 0;
        for article in incoming {
            if self.insert(article) {
                accepted += 1;
            }
        }
        accepted
    }

    fn insert(&mut self, article: Article) -> bool {
        let link = link_key(article.link());
        let title = normalize_title(article.title());

        if self.seen_links.contains(&link) {
            return false;
        }
        // A title made only of punctuation normalizes to "" and must not
        // collide with every other such title.
        if !title.is_empty() && self.seen_titles.contains(&title) {
            return false;
        }

        self.seen_links.insert(link);
        if !title.is_empty() {
            self.seen_titles.insert(title);
        }
        self.articles.push(article);
        true
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn into_articles(self) -> Vec<Article> {
        self.articles
    }
}

/// Pure form of [`Deduplicator::merge`].
///
/// # Arguments
///
/// * `existing` - The accumulated list so far
/// * `incoming` - A new batch, possibly overlapping `existing` or itself
///
/// # Returns
///
/// `existing` followed by every incoming article whose link and normalized
/// title collide with nothing before it. Merging the same batch twice adds
/// nothing the second time.
pub fn merge(existing: &[Article], incoming: &[Article]) -> Vec<Article> {
    let mut dedup = Deduplicator::from_articles(existing.iter().cloned());
    dedup.merge(incoming.iter().cloned());
    dedup.into_articles()
}
