// src/config/mod.rs
//! Static run configuration: feeds, topic keywords, recency window, paths.

pub mod ai;

use std::path::PathBuf;
use time::{Duration, UtcOffset};

use crate::relevance::UnknownTimePolicy;

pub const DEFAULT_OUTPUT_PATH: &str = "goma_news_live_updated.html";
pub const DEFAULT_LEDGER_PATH: &str = "seen_links.json";

pub const ENV_OUTPUT_PATH: &str = "GOMA_OUTPUT_PATH";
pub const ENV_LEDGER_PATH: &str = "GOMA_LEDGER_PATH";

/// Maximum age of an entry relative to run start.
pub const RECENCY_WINDOW: Duration = Duration::hours(24);

/// Ledger rows older than this are dropped when the ledger is persisted.
pub const LEDGER_RETENTION: Duration = Duration::days(14);

/// Korea Standard Time, used for every human-facing timestamp.
pub const TARGET_OFFSET: UtcOffset = time::macros::offset!(+9);

/// One configured feed: stable source id + fetch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSpec {
    pub id: &'static str,
    pub url: &'static str,
}

pub const FEEDS: &[FeedSpec] = &[
    FeedSpec {
        id: "CNBC",
        url: "https://www.cnbc.com/id/100003114/device/rss/rss.html",
    },
    FeedSpec {
        id: "MarketWatch",
        url: "https://feeds.content.dowjones.io/public/rss/mw_topstories",
    },
    FeedSpec {
        id: "Investing.com",
        url: "https://www.investing.com/rss/news_25.rss",
    },
    FeedSpec {
        id: "Yahoo Finance",
        url: "https://finance.yahoo.com/news/rssindex",
    },
];

/// Topic terms matched as case-insensitive substrings of the title.
pub const KEYWORDS: &[&str] = &[
    // macro indicators
    "cpi",
    "ppi",
    "pce",
    "inflation",
    "gdp",
    "payroll",
    "jobs report",
    "unemployment",
    "jobless",
    "retail sales",
    "recession",
    "tariff",
    // institutions / officials
    "fed",
    "fomc",
    "powell",
    "treasury",
    "yellen",
    "bessent",
    "ecb",
    "boj",
    "rate cut",
    "rate hike",
    "interest rate",
    // markets / tickers
    "nasdaq",
    "s&p",
    "dow",
    "futures",
    "yield",
    "crude",
    "oil",
    "gold",
    "dollar",
    "bitcoin",
];

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub feeds: Vec<FeedSpec>,
    pub keywords: Vec<String>,
    pub window: Duration,
    pub unknown_time: UnknownTimePolicy,
    pub output_path: PathBuf,
    pub ledger_path: PathBuf,
    pub ledger_retention: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feeds: FEEDS.to_vec(),
            keywords: KEYWORDS.iter().map(|k| k.to_string()).collect(),
            window: RECENCY_WINDOW,
            unknown_time: UnknownTimePolicy::Admit,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            ledger_retention: LEDGER_RETENTION,
        }
    }
}

impl NewsConfig {
    /// Static defaults with path overrides from $GOMA_OUTPUT_PATH / $GOMA_LEDGER_PATH.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(p) = env_path(ENV_OUTPUT_PATH) {
            cfg.output_path = p;
        }
        if let Some(p) = env_path(ENV_LEDGER_PATH) {
            cfg.ledger_path = p;
        }
        cfg
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
