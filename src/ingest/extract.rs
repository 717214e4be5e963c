// src/ingest/extract.rs
use crate::ingest::policy::SourcePolicy;
use crate::ingest::types::{FilteredEntry, RawEntry};

/// Body used when a feed item carries no text at all.
pub const NO_CONTENT_PLACEHOLDER: &str = "No content available.";

/// First candidate with non-whitespace text, else the placeholder. Never empty.
pub fn resolve_body(candidates: &[String]) -> String {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string())
}

/// Resolve the body of an admitted entry once, through its source policy.
pub fn into_filtered(raw: RawEntry, policy: &dyn SourcePolicy) -> FilteredEntry {
    let body = policy.extract_body(&raw.body_candidates);
    // A custom policy may still hand back blank text; the prompt must not.
    let body = if body.trim().is_empty() {
        NO_CONTENT_PLACEHOLDER.to_string()
    } else {
        body
    };
    FilteredEntry {
        source_id: raw.source_id,
        title: raw.title,
        link: raw.link,
        published_at: raw.published_at,
        body,
    }
}
