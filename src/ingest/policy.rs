// src/ingest/policy.rs
//! Per-source rules: which body field is richest and whether the annotator summarizes.

use crate::ingest::extract::resolve_body;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationMode {
    TitleOnly,
    TitleAndSummary,
}

/// Body-bearing fields a feed item may expose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyFields {
    /// `<description>` synopsis.
    pub synopsis: Option<String>,
    /// `<content:encoded>` full content.
    pub full_content: Option<String>,
}

pub trait SourcePolicy: Send + Sync {
    /// Order the raw body fields, richest first. Absent fields become empty strings.
    fn body_candidates(&self, fields: BodyFields) -> Vec<String>;

    fn annotation_mode(&self) -> AnnotationMode;

    /// Pick the body for one entry. Defaults to the first non-blank candidate.
    fn extract_body(&self, candidates: &[String]) -> String {
        resolve_body(candidates)
    }
}

/// Full content before synopsis; translate and summarize.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichFeedPolicy;

impl SourcePolicy for RichFeedPolicy {
    fn body_candidates(&self, fields: BodyFields) -> Vec<String> {
        vec![
            fields.full_content.unwrap_or_default(),
            fields.synopsis.unwrap_or_default(),
        ]
    }

    fn annotation_mode(&self) -> AnnotationMode {
        AnnotationMode::TitleAndSummary
    }
}

/// MarketWatch headlines carry a teaser at best: synopsis only, translate the title only.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlineFeedPolicy;

impl SourcePolicy for HeadlineFeedPolicy {
    fn body_candidates(&self, fields: BodyFields) -> Vec<String> {
        vec![fields.synopsis.unwrap_or_default()]
    }

    fn annotation_mode(&self) -> AnnotationMode {
        AnnotationMode::TitleOnly
    }
}

/// Select the policy by source identity.
pub fn policy_for(source_id: &str) -> Box<dyn SourcePolicy> {
    if source_id.eq_ignore_ascii_case("marketwatch") {
        Box::new(HeadlineFeedPolicy)
    } else {
        Box::new(RichFeedPolicy)
    }
}
