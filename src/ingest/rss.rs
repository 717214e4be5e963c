// src/ingest/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;
use time::{
    format_description::well_known::{Rfc2822, Rfc3339},
    OffsetDateTime, UtcOffset,
};

use crate::ingest::normalize_text;
use crate::ingest::policy::{policy_for, BodyFields, SourcePolicy};
use crate::ingest::types::{FeedSource, PublishedAt, RawEntry};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "content:encoded", alias = "encoded")]
    content_encoded: Option<String>,
}

/// Parse a feed date (`Day, DD Mon YYYY HH:MM:SS TZ`, RFC 3339 tolerated) into UTC.
pub fn parse_published(ts: &str) -> PublishedAt {
    let ts = ts.trim();
    OffsetDateTime::parse(ts, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
        .map(|dt| PublishedAt::At(dt.to_offset(UtcOffset::UTC)))
        .unwrap_or(PublishedAt::Unknown)
}

/// RSS 2.0 feed reader for one configured source.
pub struct RssFeed {
    id: String,
    policy: Box<dyn SourcePolicy>,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssFeed {
    /// Parse a document held in memory (tests, replays).
    pub fn from_fixture(id: &str, xml: &str) -> Self {
        Self {
            id: id.to_string(),
            policy: policy_for(id),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(id: &str, url: &str, client: reqwest::Client) -> Self {
        Self {
            id: id.to_string(),
            policy: policy_for(id),
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    /// Shared HTTP client for all feeds of a run.
    pub fn http_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent("goma-news/0.1 (rss digest)")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .context("building feed http client")
    }

    fn parse_items_from_str(&self, s: &str) -> Result<Vec<RawEntry>> {
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean)
            .with_context(|| format!("parsing {} rss xml", self.id))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let link = it.link.as_deref().map(str::trim).unwrap_or_default();
            if link.is_empty() {
                tracing::debug!(source = %self.id, "item without link skipped");
                continue;
            }
            let fields = BodyFields {
                synopsis: it.description.as_deref().map(normalize_text),
                full_content: it.content_encoded.as_deref().map(normalize_text),
            };
            out.push(RawEntry {
                source_id: self.id.clone(),
                title: normalize_text(it.title.as_deref().unwrap_or_default()),
                link: link.to_string(),
                published_at: it
                    .pub_date
                    .as_deref()
                    .map(parse_published)
                    .unwrap_or(PublishedAt::Unknown),
                body_candidates: self.policy.body_candidates(fields),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl FeedSource for RssFeed {
    async fn fetch(&self) -> Result<Vec<RawEntry>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("{} http get()", self.id))?
                    .text()
                    .await
                    .with_context(|| format!("{} http .text()", self.id))?;
                self.parse_items_from_str(&body)
            }
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn policy(&self) -> &dyn SourcePolicy {
        self.policy.as_ref()
    }
}

/// HTML entities that are not defined in XML and would break the parser.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
