// src/annotate/mod.rs
//! Annotator: one model call per entry, translate title, optionally summarize.
//! Never fails: any call or parse problem degrades to the original title.

pub mod openai;
pub mod reply;

use anyhow::Result;

use crate::ingest::policy::AnnotationMode;
pub use reply::{parse_reply, ParsedReply, NO_CORE_POINT};

/// Marker shown when the model produced no usable summary.
pub const SUMMARY_UNAVAILABLE: &str = "요약 실패";

pub const SYSTEM_ROLE: &str = "You are a financial news assistant for Korean futures traders. \
You translate English market headlines into natural Korean and judge their relevance to US index, \
rates, FX and commodity futures. Answer in Korean only, following the requested numbered format.";

/// Free-text completion collaborator.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationStatus {
    /// Every requested part came back.
    Complete,
    /// Title translated, summary missing from the reply.
    Partial,
    /// Call or parse failed; original title kept.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub translated_title: String,
    /// Always `None` in title-only mode.
    pub summary: Option<String>,
    pub status: AnnotationStatus,
}

impl Annotation {
    /// Single place where defaults for missing parts are applied.
    pub fn from_reply(reply: ParsedReply, mode: AnnotationMode, original_title: &str) -> Self {
        use AnnotationStatus::*;
        match (mode, reply) {
            (AnnotationMode::TitleOnly, ParsedReply::Both { title, .. })
            | (AnnotationMode::TitleOnly, ParsedReply::TitleOnly { title }) => Self {
                translated_title: title,
                summary: None,
                status: Complete,
            },
            (AnnotationMode::TitleOnly, ParsedReply::Unparsable) => Self {
                translated_title: original_title.to_string(),
                summary: None,
                status: Fallback,
            },
            (AnnotationMode::TitleAndSummary, ParsedReply::Both { title, summary }) => Self {
                translated_title: title,
                summary: Some(summary),
                status: Complete,
            },
            (AnnotationMode::TitleAndSummary, ParsedReply::TitleOnly { title }) => Self {
                translated_title: title,
                summary: Some(SUMMARY_UNAVAILABLE.to_string()),
                status: Partial,
            },
            (AnnotationMode::TitleAndSummary, ParsedReply::Unparsable) => Self {
                translated_title: original_title.to_string(),
                summary: Some(SUMMARY_UNAVAILABLE.to_string()),
                status: Fallback,
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.status == AnnotationStatus::Fallback
    }
}

/// User prompt with numbered instructions. Step 2 only in title+summary mode.
pub fn build_prompt(title: &str, body: &str, mode: AnnotationMode) -> String {
    let mut p = format!("Title: {title}\nBody: {body}\n\nInstructions:\n");
    p.push_str("1) Translate the title into natural Korean.\n");
    match mode {
        AnnotationMode::TitleOnly => {
            p.push_str("\nReply with exactly one line:\n1) <Korean title>\n");
        }
        AnnotationMode::TitleAndSummary => {
            p.push_str(&format!(
                "2) In ONE Korean sentence, state the core point of this news for US futures markets. \
If it has no market-relevant core point, answer exactly \"{NO_CORE_POINT}\".\n"
            ));
            p.push_str("\nReply with exactly two lines:\n1) <Korean title>\n2) <one-sentence summary>\n");
        }
    }
    p
}

pub struct Annotator {
    model: Box<dyn LanguageModel>,
}

impl Annotator {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn provider_name(&self) -> &'static str {
        self.model.name()
    }

    /// One call, no retry. Errors are logged and absorbed.
    pub async fn annotate(&self, title: &str, body: &str, mode: AnnotationMode) -> Annotation {
        let prompt = build_prompt(title, body, mode);
        let reply = match self.model.complete(SYSTEM_ROLE, &prompt).await {
            Ok(text) => parse_reply(&text),
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    provider = self.model.name(),
                    "annotation call failed, keeping original title"
                );
                ParsedReply::Unparsable
            }
        };
        let annotation = Annotation::from_reply(reply, mode, title);
        if annotation.status != AnnotationStatus::Complete {
            tracing::warn!(status = ?annotation.status, %title, "annotation degraded");
        }
        annotation
    }
}
