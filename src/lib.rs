// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod annotate;
pub mod config;
pub mod ingest;
pub mod ledger;
pub mod pipeline;
pub mod relevance;
pub mod render;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use tracing::info;

use crate::annotate::{openai::OpenAiChat, Annotator};
use crate::config::{ai::AiConfig, NewsConfig};
use crate::ingest::rss::RssFeed;
use crate::ledger::Ledger;
use crate::pipeline::{Pipeline, RunReport};

/// One production run against the configured HTTP feeds and OpenAI.
///
/// The credential is already resolved in `ai`; building the client fails
/// before any feed is fetched if it is unusable.
pub async fn run_once(cfg: &NewsConfig, ai: &AiConfig) -> Result<RunReport> {
    // Safe diagnostics: provider + model + key length only.
    info!(
        provider = %ai.provider,
        model = %ai.model,
        key_len = ai.api_key.len(),
        "annotator configured"
    );
    let annotator = Annotator::new(Box::new(OpenAiChat::new(ai)?));
    let client = RssFeed::http_client()?;
    let pipeline = Pipeline::from_config(cfg, annotator, client);

    let mut ledger = Ledger::load(&cfg.ledger_path, cfg.ledger_retention)
        .with_context(|| format!("loading ledger {}", cfg.ledger_path.display()))?;
    info!(links = ledger.len(), "ledger loaded");

    pipeline.run(&mut ledger, OffsetDateTime::now_utc()).await
}
