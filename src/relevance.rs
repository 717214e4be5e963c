// src/relevance.rs
//! Relevance gate: title keyword match + recency window.

use time::{Duration, OffsetDateTime};

use crate::ingest::types::{FilteredEntry, PublishedAt};

/// What to do with entries whose publish date could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownTimePolicy {
    Admit,
    Reject,
}

#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<String>, // lowercased
    window: Duration,
    unknown_time: UnknownTimePolicy,
}

impl RelevanceFilter {
    pub fn new<S: AsRef<str>>(
        keywords: &[S],
        window: Duration,
        unknown_time: UnknownTimePolicy,
    ) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keywords,
            window,
            unknown_time,
        }
    }

    /// Substring match, case-insensitive. "fed" matches "Federal".
    pub fn matches_keyword(&self, title: &str) -> bool {
        let t = title.to_lowercase();
        self.keywords.iter().any(|k| t.contains(k.as_str()))
    }

    /// Age `<= window` is recent. Future-dated entries count as recent.
    pub fn is_recent(&self, published_at: &PublishedAt, now: OffsetDateTime) -> bool {
        match published_at {
            PublishedAt::At(t) => now - *t <= self.window,
            PublishedAt::Unknown => self.unknown_time == UnknownTimePolicy::Admit,
        }
    }

    pub fn admits(&self, entry: &FilteredEntry, now: OffsetDateTime) -> bool {
        self.matches_keyword(&entry.title) && self.is_recent(&entry.published_at, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn filter(policy: UnknownTimePolicy) -> RelevanceFilter {
        RelevanceFilter::new(&["fed", "CPI", " "][..], Duration::hours(24), policy)
    }

    #[test]
    fn keyword_is_case_insensitive_substring() {
        let f = filter(UnknownTimePolicy::Admit);
        assert!(f.matches_keyword("Fed Hikes Rates"));
        assert!(f.matches_keyword("Federal Reserve minutes"));
        assert!(f.matches_keyword("US cpi beats"));
        assert!(!f.matches_keyword("Apple unveils new phone"));
    }

    #[test]
    fn blank_keywords_are_dropped() {
        let f = filter(UnknownTimePolicy::Admit);
        assert!(!f.matches_keyword("anything at all"));
    }

    #[test]
    fn window_boundaries() {
        let f = filter(UnknownTimePolicy::Admit);
        let now = datetime!(2026-10-17 12:00:00 UTC);
        let w = Duration::hours(24);
        let s = Duration::seconds(1);
        assert!(!f.is_recent(&PublishedAt::At(now - w - s), now));
        assert!(f.is_recent(&PublishedAt::At(now - w), now));
        assert!(f.is_recent(&PublishedAt::At(now - w + s), now));
        assert!(f.is_recent(&PublishedAt::At(now + Duration::hours(1)), now));
    }

    #[test]
    fn unknown_time_follows_policy() {
        let now = datetime!(2026-10-17 12:00:00 UTC);
        assert!(filter(UnknownTimePolicy::Admit).is_recent(&PublishedAt::Unknown, now));
        assert!(!filter(UnknownTimePolicy::Reject).is_recent(&PublishedAt::Unknown, now));
    }
}
