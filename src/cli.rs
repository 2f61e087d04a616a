//! Command-line interface definitions for Awful Topic News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the Awful Topic News application.
///
/// # Examples
///
/// ```sh
/// # Five fresh articles about one topic, printed to stdout
/// awful_topic_news -t "renewable energy"
///
/// # Several topics, more articles, written to ./json/YYYY-MM-DD/
/// awful_topic_news -t "renewable energy" -t solar -n 10 -j ./json
///
/// # With NewsAPI enabled
/// awful_topic_news -t solar --news-api-key YOUR_KEY
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to search for (repeat for several topics)
    #[arg(short, long = "topic", required = true)]
    pub topics: Vec<String>,

    /// Number of articles wanted; stops widening once reached
    #[arg(short = 'n', long, default_value_t = 5)]
    pub min_articles: i64,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// NewsAPI key; the NewsAPI source is skipped without one
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: Option<String>,

    /// Output directory for the JSON report (prints to stdout when absent)
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Skip the advisory link check on the top results
    #[arg(long)]
    pub no_validate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "awful_topic_news",
            "--topic",
            "renewable energy",
            "--topic",
            "solar",
            "--min-articles",
            "8",
            "--json-output-dir",
            "./json",
        ]);

        assert_eq!(cli.topics, vec!["renewable energy", "solar"]);
        assert_eq!(cli.min_articles, 8);
        assert_eq!(cli.json_output_dir.as_deref(), Some("./json"));
        assert!(!cli.no_validate);
    }

    #[test]
    fn test_cli_short_flags_and_defaults() {
        let cli = Cli::parse_from([
            "awful_topic_news",
            "-t",
            "ai",
            "-c",
            "/tmp/config.yaml",
            "--no-validate",
        ]);

        assert_eq!(cli.topics, vec!["ai"]);
        assert_eq!(cli.min_articles, 5);
        assert_eq!(cli.config.as_deref(), Some("/tmp/config.yaml"));
        assert_eq!(cli.json_output_dir, None);
        assert!(cli.no_validate);
    }

    #[test]
    fn test_cli_requires_a_topic() {
        assert!(Cli::try_parse_from(["awful_topic_news"]).is_err());
    }
}
