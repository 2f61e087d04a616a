//! # Awful Topic News
//!
//! A news aggregation core that collects fresh articles about a set of topics
//! from several public sources, deduplicates them across sources, and returns
//! a ranked, bounded list for a downstream generation stage.
//!
//! ## Sources
//!
//! - Google News RSS search (always on)
//! - NewsAPI `/v2/everything` (only with an API key)
//! - GDELT DOC 2.0 API
//!
//! ## Architecture
//!
//! 1. **Validation**: topics are trimmed, deduplicated and capped ([`models::TopicQuery`])
//! 2. **Widening**: sources are queried concurrently per time window, narrowest
//!    first, until enough articles are collected ([`widening`])
//! 3. **Deduplication**: by case-insensitive link and normalized title ([`dedup`])
//! 4. **Ranking**: newest first, truncated to the requested count ([`aggregator`])
//! 5. **Advisory validation**: top links are probed and logged, never dropped ([`validator`])

pub mod aggregator;
pub mod config;
pub mod dedup;
pub mod error;
pub mod freshness;
pub mod models;
pub mod outputs;
pub mod sources;
pub mod utils;
pub mod validator;
pub mod widening;

pub use aggregator::Aggregator;
pub use config::AggregatorConfig;
pub use error::{AdapterError, AggregateError, ConfigError};
pub use models::{Article, TimeWindow, TopicQuery, WindowSchedule};
