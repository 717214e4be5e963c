// src/pipeline.rs
//! Run orchestration: fetch -> extract -> filter -> dedup -> annotate -> render -> persist.
//! Strictly sequential; the ledger and the output list are only touched here.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;

use crate::annotate::Annotator;
use crate::config::NewsConfig;
use crate::ingest::extract::into_filtered;
use crate::ingest::policy::AnnotationMode;
use crate::ingest::rss::RssFeed;
use crate::ingest::types::{AnnotatedEntry, FeedSource, FilteredEntry};
use crate::ingest::{read_feed, FeedRead};
use crate::ledger::{write_atomic, Ledger};
use crate::relevance::RelevanceFilter;
use crate::render::{format_published, render_page};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching { source: String },
    Extracting,
    Filtering,
    Annotating,
    Rendering,
    Persisted,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Fetched { parsed: usize, admitted: usize },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: String,
    pub outcome: SourceOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub sources: Vec<SourceReport>,
    pub admitted: usize,
    /// Dropped because the ledger (or an earlier feed this run) already had the link.
    pub suppressed: usize,
    pub annotated: usize,
    pub fallbacks: usize,
    /// Links on the written page, in page order.
    pub emitted: Vec<String>,
    pub output_path: PathBuf,
    pub final_state: RunState,
}

pub struct Pipeline {
    sources: Vec<Box<dyn FeedSource>>,
    filter: RelevanceFilter,
    annotator: Annotator,
    output_path: PathBuf,
}

impl Pipeline {
    pub fn new(
        sources: Vec<Box<dyn FeedSource>>,
        filter: RelevanceFilter,
        annotator: Annotator,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sources,
            filter,
            annotator,
            output_path: output_path.into(),
        }
    }

    /// HTTP feeds for every configured source.
    pub fn from_config(cfg: &NewsConfig, annotator: Annotator, client: reqwest::Client) -> Self {
        let sources = cfg
            .feeds
            .iter()
            .map(|f| {
                Box::new(RssFeed::from_url(f.id, f.url, client.clone())) as Box<dyn FeedSource>
            })
            .collect();
        let filter = RelevanceFilter::new(cfg.keywords.as_slice(), cfg.window, cfg.unknown_time);
        Self::new(sources, filter, annotator, cfg.output_path.clone())
    }

    /// One full run. Only page/ledger I/O errors are returned; feed and
    /// annotation failures are absorbed and counted.
    pub async fn run(&self, ledger: &mut Ledger, now: OffsetDateTime) -> Result<RunReport> {
        let mut state = RunState::Idle;
        let mut report = RunReport {
            sources: Vec::with_capacity(self.sources.len()),
            admitted: 0,
            suppressed: 0,
            annotated: 0,
            fallbacks: 0,
            emitted: Vec::new(),
            output_path: self.output_path.clone(),
            final_state: RunState::Idle,
        };

        // Per-source sub-flow; (entry, mode) kept in feed order.
        let mut queue: Vec<(FilteredEntry, AnnotationMode)> = Vec::new();
        let mut seen_this_run: HashSet<String> = HashSet::new();

        for source in &self.sources {
            transition(
                &mut state,
                RunState::Fetching {
                    source: source.id().to_string(),
                },
            );
            let raw = match read_feed(source.as_ref()).await {
                FeedRead::Fetched(v) => v,
                FeedRead::Skipped => {
                    report.sources.push(SourceReport {
                        source: source.id().to_string(),
                        outcome: SourceOutcome::Skipped,
                    });
                    continue;
                }
            };
            let parsed = raw.len();

            transition(&mut state, RunState::Extracting);
            let policy = source.policy();
            let extracted: Vec<FilteredEntry> =
                raw.into_iter().map(|r| into_filtered(r, policy)).collect();

            transition(&mut state, RunState::Filtering);
            let mut admitted = 0usize;
            for entry in extracted {
                if !self.filter.admits(&entry, now) {
                    continue;
                }
                admitted += 1;
                if ledger.has(&entry.link) {
                    // still live in a feed: keep it from aging out of the ledger
                    ledger.touch(&entry.link, now);
                    report.suppressed += 1;
                    continue;
                }
                if !seen_this_run.insert(entry.link.clone()) {
                    report.suppressed += 1;
                    continue;
                }
                queue.push((entry, policy.annotation_mode()));
            }
            report.admitted += admitted;
            report.sources.push(SourceReport {
                source: source.id().to_string(),
                outcome: SourceOutcome::Fetched { parsed, admitted },
            });
            info!(source = source.id(), parsed, admitted, "source processed");
        }

        transition(&mut state, RunState::Annotating);
        let mut annotated: Vec<AnnotatedEntry> = Vec::with_capacity(queue.len());
        for (entry, mode) in queue {
            let a = self.annotator.annotate(&entry.title, &entry.body, mode).await;
            if a.is_fallback() {
                report.fallbacks += 1;
            }
            report.annotated += 1;
            annotated.push(AnnotatedEntry {
                rendered_time: format_published(&entry.published_at),
                source_id: entry.source_id,
                title: entry.title,
                link: entry.link,
                published_at: entry.published_at,
                translated_title: a.translated_title,
                summary: a.summary,
            });
        }

        transition(&mut state, RunState::Rendering);
        let html = render_page(now, &annotated);
        write_atomic(&self.output_path, html.as_bytes())
            .with_context(|| format!("writing page {}", self.output_path.display()))?;
        info!(path = %self.output_path.display(), entries = annotated.len(), "page written");

        for e in &annotated {
            ledger.record(&e.link, now);
        }
        ledger.persist(now)?;
        transition(&mut state, RunState::Persisted);

        report.emitted = annotated.into_iter().map(|e| e.link).collect();
        transition(&mut state, RunState::Done);
        report.final_state = state;

        info!(
            admitted = report.admitted,
            suppressed = report.suppressed,
            annotated = report.annotated,
            fallbacks = report.fallbacks,
            skipped = report
                .sources
                .iter()
                .filter(|s| s.outcome == SourceOutcome::Skipped)
                .count(),
            "run complete"
        );
        Ok(report)
    }
}

fn transition(state: &mut RunState, next: RunState) {
    tracing::debug!(from = ?state, to = ?next, "run state");
    *state = next;
}
