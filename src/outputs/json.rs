//! JSON output of an aggregation run.
//!
//! Files are organized by UTC date and named after the requested topics:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── renewable-energy_solar.json
//! ```
//!
//! Running the same topics twice on one day overwrites the earlier report.

use crate::models::Article;
use crate::utils::slugify_title;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Longest topic slug used in a file name.
const MAX_SLUG_CHARS: usize = 80;

/// One aggregation run as written to disk or stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    pub generated_at: DateTime<Utc>,
    pub topics: Vec<String>,
    pub articles: Vec<Article>,
}

impl AggregationReport {
    pub fn new(topics: Vec<String>, articles: Vec<Article>) -> Self {
        Self {
            generated_at: Utc::now(),
            topics,
            articles,
        }
    }

    /// `renewable-energy_solar`, capped to a sane file name length.
    pub fn file_stem(&self) -> String {
        let slug = self
            .topics
            .iter()
            .map(|t| slugify_title(t))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        let slug: String = slug.chars().take(MAX_SLUG_CHARS).collect();
        if slug.is_empty() {
            "articles".to_string()
        } else {
            slug
        }
    }
}

/// Write a report to `{json_output_dir}/{YYYY-MM-DD}/{topics}.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &AggregationReport,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let full_json_dir = PathBuf::from(json_output_dir)
        .join(report.generated_at.date_naive().to_string());
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = full_json_dir.join(format!("{}.json", report.file_stem()));
    info!(path = %output_json_filename.display(), "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(
        path = %output_json_filename.display(),
        articles = report.articles.len(),
        "Wrote JSON report"
    );

    Ok(output_json_filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> AggregationReport {
        let article = Article::new(
            "Wind capacity passes coal",
            "Europe crossed the line in April.",
            "theguardian.com",
            "https://www.theguardian.com/environment/wind",
            Utc::now(),
        )
        .unwrap();
        AggregationReport::new(
            vec!["Renewable Energy".to_string(), "solar!".to_string()],
            vec![article],
        )
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(report().file_stem(), "renewable-energy_solar");
        let odd = AggregationReport::new(vec!["???".to_string()], vec![]);
        assert_eq!(odd.file_stem(), "articles");
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = report();
        let path = write_report(&report, dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert!(path.ends_with("renewable-energy_solar.json"));
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["topics"][0], "Renewable Energy");
        assert_eq!(written["articles"][0]["source"], "theguardian.com");
        assert!(written["articles"][0]["publishedAt"].is_string());
        assert!(written["generatedAt"].is_string());
    }
}
