//! Tolerant extraction of items from RSS-style syndication feeds.
//!
//! Search feeds are not always well-formed XML (stray `&`, HTML inside
//! descriptions, CDATA in some fields and not in others), so items are pulled
//! out with forgiving patterns rather than a strict XML reader. Each `<item>`
//! becomes an `Option<RawArticle>`: items without a title or link are dropped
//! instead of failing the whole document.

use crate::models::RawArticle;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use quick_xml::escape::unescape;
use regex::Regex;
use std::borrow::Cow;

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").expect("valid item regex"));
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("valid title regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link\b[^>]*>(.*?)</link>").expect("valid link regex"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<description\b[^>]*>(.*?)</description>").expect("valid description regex")
});
static SOURCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<source\b[^>]*>(.*?)</source>").expect("valid source regex"));
static PUB_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:pubDate|dc:date)\b[^>]*>(.*?)</(?:pubDate|dc:date)>")
        .expect("valid pubDate regex")
});
static CDATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid CDATA regex"));

/// Parse every `<item>` in `body`, skipping the ones that are unusable.
pub fn parse_items(body: &str) -> Vec<RawArticle> {
    ITEM_RE
        .captures_iter(body)
        .filter_map(|cap| parse_item(&cap[1]))
        .collect()
}

/// Parse the inner markup of one `<item>`.
///
/// Returns `None` when the title or link is missing or blank.
pub fn parse_item(item: &str) -> Option<RawArticle> {
    let title = field(&TITLE_RE, item)?;
    let link = field(&LINK_RE, item)?;
    let source = field(&SOURCE_RE, item);
    let summary = field(&DESCRIPTION_RE, item);
    let published_at = field(&PUB_DATE_RE, item).and_then(|d| parse_date(&d));

    let title = match &source {
        Some(source) => strip_publisher_suffix(&title, source),
        None => title,
    };

    Some(RawArticle {
        title: Some(title),
        link: Some(link),
        source,
        summary,
        published_at,
    })
}

/// First match of `re` in `item`, with CDATA unwrapped and entities decoded.
fn field(re: &Regex, item: &str) -> Option<String> {
    let raw = re.captures(item)?.get(1)?.as_str();
    let text = decode_text(raw);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Unwrap CDATA sections and decode XML entities.
///
/// `&nbsp;` is not an XML entity but is common in feeds that embed HTML;
/// it is normalized first so the decoder does not reject the whole field.
/// Undecodable text is returned as-is.
pub fn decode_text(raw: &str) -> String {
    let unwrapped: Cow<str> = CDATA_RE.replace_all(raw, "$1");
    if unwrapped.len() < raw.len() {
        // CDATA content is literal, no entity pass.
        return unwrapped.into_owned();
    }
    let normalized = unwrapped.replace("&nbsp;", " ");
    match unescape(&normalized) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => normalized,
    }
}

/// Google News appends ` - Publisher` to every headline; drop it when it
/// repeats the item's source label.
fn strip_publisher_suffix(title: &str, source: &str) -> String {
    let suffix = format!(" - {source}");
    match title.strip_suffix(&suffix) {
        Some(head) if !head.trim().is_empty() => head.trim().to_string(),
        _ => title.to_string(),
    }
}

/// Parse RFC 2822 (`pubDate`) or RFC 3339 (`dc:date`) timestamps.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GOOGLE_NEWS_FIXTURE: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel>
<title>"renewable energy" when:1h - Google News</title>
<item>
  <title>Offshore wind auction draws record bids - Reuters</title>
  <link>https://news.google.com/rss/articles/CBMiAAA?oc=5</link>
  <guid isPermaLink="false">CBMiAAA</guid>
  <pubDate>Tue, 06 May 2025 13:45:00 GMT</pubDate>
  <description>&lt;a href="https://news.google.com/rss/articles/CBMiAAA?oc=5" target="_blank"&gt;Offshore wind auction draws record bids&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Reuters&lt;/font&gt;</description>
  <source url="https://www.reuters.com">Reuters</source>
</item>
<item>
  <title><![CDATA[Solar & storage: what's next?]]></title>
  <link>https://example.org/solar-storage</link>
  <pubDate>not a date</pubDate>
</item>
<item>
  <title>   </title>
  <link>https://example.org/blank-title</link>
</item>
<item>
  <title>No link here</title>
</item>
</channel></rss>"##;

    #[test]
    fn test_parse_google_news_items() {
        let items = parse_items(GOOGLE_NEWS_FIXTURE);
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(
            first.title.as_deref(),
            Some("Offshore wind auction draws record bids")
        );
        assert_eq!(
            first.link.as_deref(),
            Some("https://news.google.com/rss/articles/CBMiAAA?oc=5")
        );
        assert_eq!(first.source.as_deref(), Some("Reuters"));
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 13, 45, 0).unwrap())
        );
        let summary = first.summary.as_deref().unwrap();
        assert!(summary.starts_with("<a href="));
        assert!(summary.contains("Reuters"));
    }

    #[test]
    fn test_cdata_and_missing_fields() {
        let items = parse_items(GOOGLE_NEWS_FIXTURE);
        let second = &items[1];
        assert_eq!(second.title.as_deref(), Some("Solar & storage: what's next?"));
        assert_eq!(second.source, None);
        assert_eq!(second.summary, None);
        assert_eq!(second.published_at, None);
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_text("<![CDATA[a &amp; b]]>"), "a &amp; b");
        assert_eq!(decode_text("AT&T &unknown; rates"), "AT&T &unknown; rates");
        assert_eq!(decode_text("one&nbsp;two"), "one two");
    }

    #[test]
    fn test_strip_publisher_suffix() {
        assert_eq!(strip_publisher_suffix("Big news - AP News", "AP News"), "Big news");
        assert_eq!(strip_publisher_suffix("Big news - AP News", "Reuters"), "Big news - AP News");
        assert_eq!(strip_publisher_suffix(" - AP News", "AP News"), " - AP News");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 6, 13, 45, 0).unwrap();
        assert_eq!(parse_date("Tue, 06 May 2025 13:45:00 GMT"), Some(expected));
        assert_eq!(parse_date("2025-05-06T15:45:00+02:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_garbage_input_yields_nothing() {
        assert!(parse_items("<html><body>503 Service Unavailable</body></html>").is_empty());
        assert!(parse_items("").is_empty());
    }
}
