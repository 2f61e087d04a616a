//! Advisory link validation.
//!
//! A probe answers "is this link obviously dead?" and nothing more. It returns
//! `false` only for a definitive dead status (404/410). Timeouts, connection
//! errors and ambiguous statuses all count as alive. Results are logged and
//! never remove an article: dropping a real story costs more than shipping a
//! link that rots later.

use crate::config::ValidatorConfig;
use crate::error::ConfigError;
use crate::models::Article;
use crate::sources::build_client;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::header::RANGE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Bytes requested by the fallback GET.
const RANGE_PROBE: &str = "bytes=0-1023";

#[async_trait]
pub trait LinkValidator: Send + Sync {
    /// Best-effort liveness check. Must return `true` whenever unsure.
    async fn validate(&self, url: &str) -> bool;
}

/// What a single HTTP status tells us about a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Alive,
    Dead,
    Ambiguous,
}

/// Classify a response status.
///
/// Many publishers reject `HEAD` (405, 403, 501) or rate-limit bots (429), so
/// anything besides success, redirect, 404 and 410 is ambiguous.
pub fn classify_status(status: StatusCode) -> Probe {
    if status.is_success() || status.is_redirection() {
        Probe::Alive
    } else if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        Probe::Dead
    } else {
        Probe::Ambiguous
    }
}

/// `HEAD` first, then a byte-range `GET` when the `HEAD` answer is ambiguous.
#[derive(Debug, Clone)]
pub struct HttpLinkValidator {
    client: Client,
}

impl HttpLinkValidator {
    pub fn new(config: &ValidatorConfig, user_agent: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_secs), user_agent)?,
        })
    }

    async fn probe(&self, url: &str) -> Result<Probe, reqwest::Error> {
        let head = self.client.head(url).send().await?;
        match classify_status(head.status()) {
            Probe::Ambiguous => {
                debug!(status = %head.status(), "HEAD ambiguous; retrying with ranged GET");
                let get = self.client.get(url).header(RANGE, RANGE_PROBE).send().await?;
                Ok(classify_status(get.status()))
            }
            decided => Ok(decided),
        }
    }
}

#[async_trait]
impl LinkValidator for HttpLinkValidator {
    #[instrument(level = "debug", skip(self))]
    async fn validate(&self, url: &str) -> bool {
        match self.probe(url).await {
            Ok(Probe::Dead) => false,
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Link probe failed; assuming alive");
                true
            }
        }
    }
}

/// Probe the first `top` articles concurrently and log the outcome.
///
/// Returns the links that looked dead, for callers that want to report them.
#[instrument(level = "info", skip_all, fields(top = top))]
pub async fn log_top_links(
    validator: &dyn LinkValidator,
    articles: &[Article],
    top: usize,
) -> Vec<String> {
    let checked: Vec<&Article> = articles.iter().take(top).collect();
    let results = join_all(checked.iter().map(|a| validator.validate(a.link()))).await;

    let dead: Vec<String> = checked
        .iter()
        .zip(results)
        .filter(|(_, ok)| !ok)
        .map(|(a, _)| a.link().to_string())
        .collect();
    for link in &dead {
        warn!(%link, "Link looks dead; keeping article anyway");
    }
    info!(checked = checked.len(), dead = dead.len(), "Link validation complete");
    dead
}
