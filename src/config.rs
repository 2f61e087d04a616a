//! Aggregator configuration.
//!
//! Built once at process start (from defaults or a YAML file) and handed to
//! [`crate::aggregator::Aggregator::from_config`]. The core never reads the
//! environment; credentials arrive through this struct.
//!
//! # Example
//!
//! ```yaml
//! windows_hours: [1, 6, 24]
//! max_candidates: 20
//! validate_top: 3
//! limits:
//!   max_topics: 10
//!   max_articles: 20
//!   default_articles: 5
//! news_api:
//!   api_key: "..."
//! gdelt:
//!   enabled: false
//! ```

use crate::error::ConfigError;
use crate::models::{QueryLimits, WindowSchedule};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; awful_topic_news/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Bounded widening windows in hours; the unbounded window is always appended.
    pub windows_hours: Vec<u64>,
    /// Candidates requested from each source per topic and window.
    pub max_candidates: usize,
    /// How many of the top results get an advisory link check. 0 disables.
    pub validate_top: usize,
    pub user_agent: String,
    pub limits: QueryLimits,
    pub google_news: GoogleNewsConfig,
    pub news_api: NewsApiConfig,
    pub gdelt: GdeltConfig,
    pub validator: ValidatorConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            windows_hours: vec![1, 6, 24],
            max_candidates: 20,
            validate_top: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limits: QueryLimits::default(),
            google_news: GoogleNewsConfig::default(),
            news_api: NewsApiConfig::default(),
            gdelt: GdeltConfig::default(),
            validator: ValidatorConfig::default(),
        }
    }
}

impl AggregatorConfig {
    /// Load a YAML configuration file. Missing keys keep their defaults.
    #[instrument(level = "info", skip_all)]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        info!(
            path = %path.display(),
            windows = ?config.windows_hours,
            news_api = config.news_api.api_key.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn window_schedule(&self) -> WindowSchedule {
        WindowSchedule::from_hours(&self.windows_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleNewsConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    /// `hl` parameter, e.g. `en-US`.
    pub language: String,
    /// `gl` parameter, e.g. `US`.
    pub country: String,
}

impl Default for GoogleNewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 8,
            language: "en-US".to_string(),
            country: "US".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    /// The adapter is inert without a key.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub language: String,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_secs: 10,
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GdeltConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
}

impl Default for GdeltConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub timeout_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AggregatorConfig::default();
        assert_eq!(config.windows_hours, vec![1, 6, 24]);
        assert_eq!(config.limits.max_topics, 10);
        assert_eq!(config.news_api.api_key, None);
        assert!(config.google_news.enabled);
        assert_eq!(config.window_schedule().windows().last(), Some(&TimeWindow::Unbounded));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
windows_hours: [2, 12]
news_api:
  api_key: "secret"
gdelt:
  enabled: false
"#;
        let config = AggregatorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.windows_hours, vec![2, 12]);
        assert_eq!(config.news_api.api_key.as_deref(), Some("secret"));
        assert_eq!(config.news_api.timeout_secs, 10);
        assert!(!config.gdelt.enabled);
        assert_eq!(config.gdelt.timeout_secs, 12);
        assert_eq!(config.max_candidates, 20);
        assert_eq!(config.window_schedule().len(), 3);
    }

    #[test]
    fn test_oversized_window_hours_are_ignored() {
        let config = AggregatorConfig::from_yaml("windows_hours: [9223372036854775807, 2]").unwrap();
        assert_eq!(
            config.window_schedule().windows(),
            &[TimeWindow::hours(2), TimeWindow::Unbounded]
        );
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AggregatorConfig::from_yaml("  \n").unwrap(), AggregatorConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(
            AggregatorConfig::from_yaml("windows_hours: nope"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "validate_top: 0").unwrap();
        let config = AggregatorConfig::load(file.path()).unwrap();
        assert_eq!(config.validate_top, 0);

        assert!(matches!(
            AggregatorConfig::load("/definitely/not/here.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
