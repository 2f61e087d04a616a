//! # Awful Topic News
//!
//! Command-line driver for the aggregation core: fetches fresh, deduplicated
//! articles for the requested topics and emits them as JSON.
//!
//! ## Usage
//!
//! ```sh
//! awful_topic_news -t "renewable energy" -t solar -n 10 -j ./json
//! ```
//!
//! Logging is controlled through `RUST_LOG` (default `info`). Logs go to
//! stderr, so stdout carries only the JSON report.

use awful_topic_news::outputs::json::{self, AggregationReport};
use awful_topic_news::utils::ensure_writable_dir;
use awful_topic_news::{Aggregator, AggregatorConfig, TopicQuery};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("awful_topic_news starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.topics, min_articles = args.min_articles, ?args.config, "Parsed CLI arguments");

    // ---- Load config ----
    let mut config = match &args.config {
        Some(path) => AggregatorConfig::load(path)?,
        None => AggregatorConfig::default(),
    };
    if args.news_api_key.is_some() {
        config.news_api.api_key = args.news_api_key.clone();
    }
    if args.no_validate {
        config.validate_top = 0;
    }

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let aggregator = Aggregator::from_config(&config)?;
    info!(sources = ?aggregator.adapter_names(), "Aggregator ready");

    // ---- Aggregate ----
    let query = match TopicQuery::with_limits(&args.topics, args.min_articles, aggregator.limits()) {
        Ok(query) => query,
        Err(e) => {
            error!(error = %e, "Aggregation request rejected");
            return Err(e.into());
        }
    };
    let articles = match aggregator.aggregate_query(&query).await {
        Ok(articles) => articles,
        Err(e) => {
            warn!(error = %e, retryable = e.is_retryable(), "Nothing to report");
            return Err(e.into());
        }
    };

    let report = AggregationReport::new(query.topics().to_vec(), articles);

    // ---- Output ----
    match &args.json_output_dir {
        Some(dir) => {
            let path = json::write_report(&report, dir).await?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = report.articles.len(),
        "Execution complete"
    );

    Ok(())
}
