// tests/providers_rss.rs
use goma_news::ingest::extract::NO_CONTENT_PLACEHOLDER;
use goma_news::ingest::policy::{AnnotationMode, SourcePolicy};
use goma_news::ingest::rss::RssFeed;
use goma_news::ingest::types::{FeedSource, PublishedAt};
use goma_news::ingest::{read_feed, FeedRead};
use time::macros::datetime;

const CNBC_XML: &str = include_str!("fixtures/cnbc_rss.xml");
const MW_XML: &str = include_str!("fixtures/marketwatch_rss.xml");
const BROKEN_XML: &str = include_str!("fixtures/malformed_rss.xml");

#[tokio::test]
async fn cnbc_fixture_parses_all_linked_items() {
    let feed = RssFeed::from_fixture("CNBC", CNBC_XML);
    let items = feed.fetch().await.expect("cnbc parse ok");

    // the item without <link> has no identity and is dropped
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|e| e.source_id == "CNBC"));

    let first = &items[0];
    assert_eq!(first.title, "Fed's Powell signals patience on rate cuts");
    assert_eq!(
        first.link,
        "https://www.cnbc.com/2026/10/17/powell-patience-rate-cuts.html"
    );
    assert_eq!(
        first.published_at,
        PublishedAt::At(datetime!(2026-10-17 08:00:00 UTC))
    );
    // full content first, markup stripped
    assert_eq!(first.body_candidates.len(), 2);
    assert!(first.body_candidates[0].starts_with("Federal Reserve Chair Jerome Powell"));
    assert!(!first.body_candidates[0].contains("<p>"));
    assert_eq!(first.body_candidates[1], "Powell says the Fed can wait.");

    let no_date = &items[3];
    assert_eq!(no_date.published_at, PublishedAt::Unknown);
    assert_eq!(
        feed.policy().extract_body(&no_date.body_candidates),
        NO_CONTENT_PLACEHOLDER
    );
}

#[tokio::test]
async fn marketwatch_is_title_only_with_synopsis_body() {
    let feed = RssFeed::from_fixture("MarketWatch", MW_XML);
    assert_eq!(feed.policy().annotation_mode(), AnnotationMode::TitleOnly);

    let items = feed.fetch().await.expect("marketwatch parse ok");
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0].body_candidates,
        vec!["Stock-index futures rose early Saturday.".to_string()]
    );
    assert_eq!(
        items[0].published_at,
        PublishedAt::At(datetime!(2026-10-17 11:30:00 UTC))
    );
    assert_eq!(items[1].published_at, PublishedAt::Unknown);
}

#[tokio::test]
async fn malformed_document_is_an_error_and_read_feed_skips_it() {
    let feed = RssFeed::from_fixture("Broken", BROKEN_XML);
    assert!(feed.fetch().await.is_err());

    let read = read_feed(&feed).await;
    assert!(matches!(read, FeedRead::Skipped));
    assert!(read.into_entries().is_empty());
}

#[tokio::test]
async fn healthy_feed_reads_as_fetched() {
    let feed = RssFeed::from_fixture("CNBC", CNBC_XML);
    match read_feed(&feed).await {
        FeedRead::Fetched(v) => assert_eq!(v.len(), 4),
        FeedRead::Skipped => panic!("healthy feed must not be skipped"),
    }
}
