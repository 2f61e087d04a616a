//! Utility functions for text cleanup, URL handling, and file system checks.
//!
//! This module provides helper functions used throughout the crate:
//! - Character-safe truncation for article fields and log previews
//! - HTML stripping and whitespace collapsing for feed descriptions
//! - Publisher derivation from article links
//! - Slugification for output file names
//! - File system validation for output directories

use quick_xml::escape::unescape;
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended. Cuts always land on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Truncate to at most `max` characters, ending with `...` when cut.
///
/// Used to keep article titles and summaries bounded for downstream prompts.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push_str("...");
    out
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce an HTML fragment to its visible text.
///
/// Feed descriptions frequently carry anchors, lists and `<font>` tags. Parsing
/// them as a fragment is far more forgiving than a tag-stripping regex.
/// Text without markup still has its entities decoded (`AT&amp;T` becomes
/// `AT&T`); text that does not decode cleanly is kept as-is.
pub fn strip_html(html: &str) -> String {
    if !html.contains('<') {
        let text = html.replace("&nbsp;", " ");
        return match unescape(&text) {
            Ok(decoded) => collapse_whitespace(&decoded),
            Err(_) => collapse_whitespace(&text),
        };
    }
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&text)
}

/// Parse `link` and accept it only when it is an absolute `http`/`https` URL.
pub fn parse_http_url(link: &str) -> Option<Url> {
    let parsed = Url::parse(link.trim()).ok()?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Some(parsed),
        _ => None,
    }
}

/// Derive a publisher label from a link's host.
///
/// `https://www.reuters.com/world/...` becomes `reuters.com`.
pub fn domain_of(link: &str) -> Option<String> {
    let parsed = parse_http_url(link)?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Convert a title to a URL-friendly slug.
///
/// It lowercases the text, removes special characters, and replaces
/// spaces with hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("Hello World"), "hello-world");
/// assert_eq!(slugify_title("Test-Article!"), "test-article");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "é".repeat(20);
        let result = truncate_for_log(&s, 5);
        assert!(result.starts_with("ééééé…"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 10), "abcdefghij");
        assert_eq!(truncate_chars("abcdefghijk", 10), "abcdefg...");
        assert_eq!(truncate_chars(&"ü".repeat(300), 200).chars().count(), 200);
    }

    #[test]
    fn test_strip_html() {
        let html = r##"<a href="https://x.test/a" target="_blank">Solar farms</a>&nbsp;<font color="#6f6f6f">Reuters</font>"##;
        assert_eq!(strip_html(html), "Solar farms Reuters");
        assert_eq!(strip_html("  plain   text "), "plain text");
        assert_eq!(strip_html("<ol><li>One</li><li>Two</li></ol>"), "One Two");
    }

    #[test]
    fn test_strip_html_decodes_plain_text_entities() {
        assert_eq!(strip_html("AT&amp;T raises rates"), "AT&T raises rates");
        assert_eq!(strip_html("Solar&nbsp;&quot;boom&quot;"), "Solar \"boom\"");
        assert_eq!(strip_html("AT&T &unknown; rates"), "AT&T &unknown; rates");
    }

    #[test]
    fn test_parse_http_url() {
        assert!(parse_http_url("https://example.com/a").is_some());
        assert!(parse_http_url("http://example.com").is_some());
        assert!(parse_http_url("ftp://example.com/file").is_none());
        assert!(parse_http_url("/relative/path").is_none());
        assert!(parse_http_url("mailto:news@example.com").is_none());
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(
            domain_of("https://www.reuters.com/world/article"),
            Some("reuters.com".to_string())
        );
        assert_eq!(
            domain_of("https://text.npr.org/123"),
            Some("text.npr.org".to_string())
        );
        assert_eq!(domain_of("not a url"), None);
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello World"), "hello-world");
        assert_eq!(slugify_title("Test-Article!"), "test-article");
        assert_eq!(slugify_title("Multiple   Spaces"), "multiple---spaces");
        assert_eq!(slugify_title("renewable energy"), "renewable-energy");
    }
}
