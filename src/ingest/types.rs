// src/ingest/types.rs
use anyhow::Result;
use time::OffsetDateTime;

use crate::ingest::policy::SourcePolicy;

/// Publish time of an entry, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedAt {
    At(OffsetDateTime),
    /// Date missing or unparsable.
    Unknown,
}

impl PublishedAt {
    pub fn timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            PublishedAt::At(t) => Some(*t),
            PublishedAt::Unknown => None,
        }
    }
}

/// One feed item as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub source_id: String, // e.g., "CNBC", "MarketWatch"
    pub title: String,
    pub link: String, // stable identity
    pub published_at: PublishedAt,
    /// Raw body fields, richest first; order decided by the source policy.
    pub body_candidates: Vec<String>,
}

/// A RawEntry that passed relevance + recency, with its body resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEntry {
    pub source_id: String,
    pub title: String,
    pub link: String,
    pub published_at: PublishedAt,
    pub body: String,
}

/// A fetchable feed. Implementations return `Err` on fetch/parse failure;
/// callers decide how to absorb it (see `ingest::read_feed`).
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawEntry>>;
    fn id(&self) -> &str;
    fn policy(&self) -> &dyn SourcePolicy;
}

/// A FilteredEntry plus its annotation, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedEntry {
    pub source_id: String,
    pub title: String,
    pub link: String,
    pub published_at: PublishedAt,
    pub translated_title: String,
    /// `None` for title-only sources.
    pub summary: Option<String>,
    /// Publish time in the target locale/timezone.
    pub rendered_time: String,
}
