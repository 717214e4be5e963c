// src/ingest/mod.rs
pub mod extract;
pub mod policy;
pub mod rss;
pub mod types;

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::types::{FeedSource, RawEntry};

/// Upper bound on any single normalized field (chars).
pub const MAX_TEXT_CHARS: usize = 1500;

/// Normalize feed text: decode entities, strip tags, collapse whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }

    out
}

/// Result of reading one source.
#[derive(Debug)]
pub enum FeedRead {
    Fetched(Vec<RawEntry>),
    /// Fetch or parse failed; the source contributes nothing this run.
    Skipped,
}

impl FeedRead {
    pub fn into_entries(self) -> Vec<RawEntry> {
        match self {
            FeedRead::Fetched(v) => v,
            FeedRead::Skipped => Vec::new(),
        }
    }
}

/// Fetch one source. Failures are logged and absorbed here, so one bad feed
/// never affects the others.
pub async fn read_feed(source: &dyn FeedSource) -> FeedRead {
    match source.fetch().await {
        Ok(entries) => {
            tracing::debug!(source = source.id(), count = entries.len(), "feed parsed");
            FeedRead::Fetched(entries)
        }
        Err(e) => {
            tracing::warn!(error = ?e, source = source.id(), "feed skipped");
            FeedRead::Skipped
        }
    }
}
