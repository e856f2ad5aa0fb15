//! Pure extraction of candidate patch records from scraped source text.
//!
//! Two source shapes hide behind one entry point: the HTML listing page with
//! a fixed-column table inside a `<pre>` block, and an Atom/RSS feed whose
//! entry bodies open with a `patch ...` banner line. Extraction is
//! deterministic and total: a malformed individual entry is skipped, never
//! fatal for the pass.

use crate::config::SourceFormat;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::warn;

/// Extracted, not-yet-persisted record awaiting an insertion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub title: String,
    pub description: String,
}

static TABLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+SIZE\s+NAME\s+FIXES$").expect("valid regex"));
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+\d").expect("valid regex"));
static TABLE_FIELDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s+(\S+)\s+(.*)$").expect("valid regex"));

static FEED_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry[^>]*>(.*?)</entry>").expect("valid regex"));
static ENTRY_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:content|summary)[^>]*>(.*?)</(?:content|summary)>").expect("valid regex")
});
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)+$").expect("valid regex"));
static BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*patch\b[^\n]*\n?").expect("valid regex"));

/// Extract candidate records from raw source text, in source order.
pub fn extract(raw: &str, format: SourceFormat) -> Vec<Candidate> {
    match format {
        SourceFormat::Listing => extract_listing(raw),
        SourceFormat::Feed => extract_feed(raw),
    }
}

/// Listing mode: the patch table sits between a fixed header line and the
/// first line that no longer looks like a row. A missing header yields an
/// empty result. A table running into EOF without a terminating line yields
/// nothing as well, with a warning, rather than a guessed slice bound.
fn extract_listing(raw_html: &str) -> Vec<Candidate> {
    let text = pre_text(raw_html);
    let lines: Vec<&str> = text.lines().collect();

    let Some(start) = lines.iter().position(|line| TABLE_HEADER.is_match(line)) else {
        return Vec::new();
    };
    let Some(end) = lines[start + 1..]
        .iter()
        .position(|line| !TABLE_ROW.is_match(line))
    else {
        warn!("Listing table end marker not found; treating source as truncated");
        return Vec::new();
    };

    lines[start + 1..start + 1 + end]
        .iter()
        .filter_map(|line| {
            let caps = TABLE_FIELDS.captures(line)?;
            Some(Candidate {
                name: caps[1].to_string(),
                title: caps[2].trim_end().to_string(),
                description: String::new(),
            })
        })
        .collect()
}

/// Concatenated text of every `<pre>` block in the document.
fn pre_text(raw_html: &str) -> String {
    let doc = Html::parse_document(raw_html);
    let selector = Selector::parse("pre").expect("valid selector");
    doc.select(&selector).flat_map(|el| el.text()).collect()
}

fn extract_feed(raw: &str) -> Vec<Candidate> {
    FEED_ENTRY
        .captures_iter(raw)
        .filter_map(|entry| candidate_from_entry(entry.get(1).map(|m| m.as_str())?))
        .collect()
}

/// Feed mode: strip markup from the entry body, read the natural key from the
/// second token of the banner line, and keep the rest of the body (minus the
/// banner) as the description. Entries whose key is not a dotted version
/// number are discarded.
fn candidate_from_entry(entry: &str) -> Option<Candidate> {
    let body = ENTRY_BODY
        .captures(entry)
        .map_or_else(|| entry.to_string(), |caps| caps[1].to_string());
    let text = MARKUP_TAG
        .replace_all(&unescape_entities(&body), "")
        .into_owned();

    let banner = text.lines().find(|line| !line.trim().is_empty())?.trim();
    let token = banner.split_whitespace().nth(1)?;
    let name = token
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '.')
        .trim_matches('.');
    if !VERSION.is_match(name) {
        return None;
    }

    let description = BANNER.replace(text.trim_start(), "").trim().to_string();

    Some(Candidate {
        name: name.to_string(),
        title: banner.to_string(),
        description,
    })
}

fn unescape_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "<html><body><pre>\nIntro text\n   SIZE   NAME   FIXES\n  1234  9.0.0001  fix one\n  2345  9.0.0002  fix two\n  3456  9.0.0003  fix three\nTrailer text\n</pre></body></html>";

    #[test]
    fn listing_extracts_rows_between_markers_in_order() {
        let candidates = extract(LISTING, SourceFormat::Listing);
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].name, "9.0.0001");
        assert_eq!(candidates[0].title, "fix one");
        assert_eq!(candidates[0].description, "");
        assert_eq!(candidates[2].name, "9.0.0003");
    }

    #[test]
    fn listing_without_header_yields_nothing() {
        let html = "<html><pre>\n  1234  9.0.0001  fix one\n</pre></html>";
        assert!(extract(html, SourceFormat::Listing).is_empty());
    }

    #[test]
    fn listing_without_end_marker_yields_nothing() {
        let html = "<html><pre>   SIZE   NAME   FIXES\n  1234  9.0.0001  fix one\n  2345  9.0.0002  fix two</pre></html>";
        assert!(extract(html, SourceFormat::Listing).is_empty());
    }

    #[test]
    fn listing_skips_unparsable_rows() {
        let html = "<html><pre>   SIZE   NAME   FIXES\n  1234  9.0.0001  fix one\n  9\n  3456  9.0.0003  fix three\nTrailer\n</pre></html>";
        let candidates = extract(html, SourceFormat::Listing);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "9.0.0001");
        assert_eq!(candidates[1].name, "9.0.0003");
    }

    #[test]
    fn listing_ignores_text_outside_pre() {
        let html =
            "<html><p>   SIZE   NAME   FIXES</p><pre>no table here</pre></html>";
        assert!(extract(html, SourceFormat::Listing).is_empty());
    }

    #[test]
    fn feed_entry_strips_markup_and_banner() {
        let feed = "<feed xmlns=\"http://www.w3.org/2005/Atom\">\n<entry><title>v9.0.1234</title><content type=\"html\">&lt;p&gt;patch 9.0.1234: fix foo&lt;/p&gt;\nDetails here</content></entry>\n</feed>";
        let candidates = extract(feed, SourceFormat::Feed);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "9.0.1234");
        assert_eq!(candidates[0].title, "patch 9.0.1234: fix foo");
        assert_eq!(candidates[0].description, "Details here");
    }

    #[test]
    fn feed_discards_entries_without_version_key() {
        let feed = "<feed><entry><content>patch tooling: not a release\nbody</content></entry><entry><content>patch 8.2.5000: real one</content></entry></feed>";
        let candidates = extract(feed, SourceFormat::Feed);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "8.2.5000");
    }

    #[test]
    fn feed_without_entries_yields_nothing() {
        assert!(extract("<feed></feed>", SourceFormat::Feed).is_empty());
        assert!(extract("", SourceFormat::Feed).is_empty());
    }
}
