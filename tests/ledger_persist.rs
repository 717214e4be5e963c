// tests/ledger_persist.rs
use goma_news::ledger::Ledger;
use std::fs;
use time::macros::datetime;
use time::Duration;

#[test]
fn recorded_links_survive_into_the_next_run() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("seen_links.json");
    let run_n = datetime!(2026-10-17 12:00:00 UTC);

    // run N: first run, no file yet
    let mut ledger = Ledger::load(&path, Duration::days(14)).unwrap();
    assert!(ledger.is_empty());
    ledger.record("https://a/1", run_n);
    ledger.record("https://a/2", run_n);
    ledger.persist(run_n).unwrap();

    // run N+1
    let next = Ledger::load(&path, Duration::days(14)).unwrap();
    assert!(next.has("https://a/1"));
    assert!(next.has("https://a/2"));
    assert!(!next.has("https://a/3"));
}

#[test]
fn persist_is_a_full_rewrite_with_stable_order() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("seen_links.json");
    let now = datetime!(2026-10-17 12:00:00 UTC);

    let mut ledger = Ledger::load(&path, Duration::days(14)).unwrap();
    ledger.record("https://b", now);
    ledger.record("https://a", now);
    ledger.persist(now).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    // re-persisting the same content gives the same bytes
    let mut again = Ledger::load(&path, Duration::days(14)).unwrap();
    again.persist(now).unwrap();
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);

    let v: serde_json::Value = serde_json::from_str(&second).unwrap();
    let links: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["link"].as_str().unwrap())
        .collect();
    assert_eq!(links, vec!["https://a", "https://b"]);
}

#[test]
fn legacy_link_array_is_honored() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("seen_links.json");
    fs::write(&path, r#"["https://legacy/1","https://legacy/2"]"#).unwrap();

    let ledger = Ledger::load(&path, Duration::days(14)).unwrap();
    assert!(ledger.has("https://legacy/1"));
    assert_eq!(ledger.len(), 2);
}

#[test]
fn links_still_in_feeds_outlive_retention_while_gone_ones_age_out() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("seen_links.json");
    let day0 = datetime!(2026-10-17 12:00:00 UTC);

    let mut ledger = Ledger::load(&path, Duration::days(14)).unwrap();
    ledger.record("https://live", day0);
    ledger.record("https://gone", day0);
    ledger.persist(day0).unwrap();

    // daily runs; only "live" keeps appearing in a feed
    for day in 1..=20 {
        let now = day0 + Duration::days(day);
        let mut ledger = Ledger::load(&path, Duration::days(14)).unwrap();
        if ledger.has("https://live") {
            ledger.touch("https://live", now);
        }
        ledger.persist(now).unwrap();
    }

    let last = Ledger::load(&path, Duration::days(14)).unwrap();
    assert!(last.has("https://live"));
    assert!(!last.has("https://gone"));
}
