// src/ledger.rs
//! Cross-run record of emitted links. Loaded at run start, rewritten in full at run end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use time::{Duration, OffsetDateTime};

/// On-disk row. Older ledgers are a bare array of link strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredRow {
    Link(String),
    Record {
        link: String,
        #[serde(default)]
        seen_at: Option<i64>,
    },
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    link: &'a str,
    seen_at: i64,
}

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    /// link -> unix seconds last emitted or seen in a feed; `None` for rows loaded from the legacy schema.
    seen: BTreeMap<String, Option<i64>>,
    retention: Duration,
}

impl Ledger {
    /// Absent or empty file gives an empty ledger. A corrupt file is moved aside
    /// to `<name>.corrupt` and treated as empty; other I/O errors propagate.
    pub fn load(path: impl Into<PathBuf>, retention: Duration) -> Result<Self> {
        let path = path.into();
        let mut ledger = Self {
            path,
            seen: BTreeMap::new(),
            retention,
        };

        let content = match fs::read_to_string(&ledger.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ledger),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading ledger {}", ledger.path.display()))
            }
        };
        if content.trim().is_empty() {
            return Ok(ledger);
        }

        match serde_json::from_str::<Vec<StoredRow>>(&content) {
            Ok(rows) => {
                for row in rows {
                    let (link, seen_at) = match row {
                        StoredRow::Link(link) => (link, None),
                        StoredRow::Record { link, seen_at } => (link, seen_at),
                    };
                    let link = link.trim().to_string();
                    if !link.is_empty() {
                        ledger.seen.insert(link, seen_at);
                    }
                }
            }
            Err(e) => {
                let aside = sibling(&ledger.path, ".corrupt");
                tracing::warn!(
                    error = %e,
                    path = %ledger.path.display(),
                    moved_to = %aside.display(),
                    "ledger unreadable, starting empty"
                );
                if let Err(e) = fs::rename(&ledger.path, &aside) {
                    tracing::warn!(error = %e, "could not move corrupt ledger aside");
                }
            }
        }
        Ok(ledger)
    }

    pub fn has(&self, link: &str) -> bool {
        self.seen.contains_key(link)
    }

    /// Mark a link as emitted. Re-recording keeps the first timestamp.
    pub fn record(&mut self, link: &str, now: OffsetDateTime) {
        self.seen
            .entry(link.to_string())
            .or_insert(Some(now.unix_timestamp()));
    }

    /// Refresh the timestamp of a link that is still showing up in a feed, so it
    /// is not pruned while it can still be fetched.
    pub fn touch(&mut self, link: &str, now: OffsetDateTime) {
        if let Some(seen_at) = self.seen.get_mut(link) {
            *seen_at = Some(now.unix_timestamp());
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prune rows past retention, then replace the file atomically.
    pub fn persist(&mut self, now: OffsetDateTime) -> Result<()> {
        let now_ts = now.unix_timestamp();
        let cutoff = (now - self.retention).unix_timestamp();
        for seen_at in self.seen.values_mut() {
            if seen_at.is_none() {
                *seen_at = Some(now_ts);
            }
        }
        self.seen
            .retain(|_, seen_at| seen_at.is_some_and(|t| t >= cutoff));

        let rows: Vec<Row<'_>> = self
            .seen
            .iter()
            .map(|(link, seen_at)| Row {
                link,
                seen_at: seen_at.unwrap_or(now_ts),
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows).context("serializing ledger")?;
        write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("writing ledger {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), links = rows.len(), "ledger persisted");
        Ok(())
    }
}

/// Write to a sibling temp file, flush to disk, then rename over `path`.
/// Readers see either the old file or the new one, never a partial write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = sibling(path, ".tmp");

    let mut f = fs::File::create(&tmp)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    drop(f);
    fs::rename(&tmp, path)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-17 12:00:00 UTC);

    #[test]
    fn absent_file_is_empty_ledger() {
        let tmp = tempfile::tempdir().unwrap();
        let l = Ledger::load(tmp.path().join("nope.json"), Duration::days(14)).unwrap();
        assert!(l.is_empty());
    }

    #[test]
    fn legacy_string_array_and_objects_both_load() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("seen.json");
        fs::write(
            &p,
            r#"["https://a/1", {"link":"https://a/2","seen_at":1790000000}, {"title":"t","link":"https://a/3"}]"#,
        )
        .unwrap();
        let l = Ledger::load(&p, Duration::days(14)).unwrap();
        assert!(l.has("https://a/1"));
        assert!(l.has("https://a/2"));
        assert!(l.has("https://a/3"));
        assert_eq!(l.len(), 3);
    }

    #[test]
    fn corrupt_file_starts_empty_and_is_kept_aside() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("seen.json");
        fs::write(&p, "{ not json").unwrap();
        let l = Ledger::load(&p, Duration::days(14)).unwrap();
        assert!(l.is_empty());
        assert!(!p.exists());
        let aside = tmp.path().join("seen.json.corrupt");
        assert_eq!(fs::read_to_string(aside).unwrap(), "{ not json");
    }

    #[test]
    fn touch_refreshes_known_links_only() {
        let tmp = tempfile::tempdir().unwrap();
        let mut l = Ledger::load(tmp.path().join("seen.json"), Duration::days(14)).unwrap();
        l.record("https://a/1", NOW - Duration::days(13));
        l.touch("https://a/1", NOW);
        l.touch("https://a/2", NOW);
        assert!(!l.has("https://a/2"));

        l.persist(NOW + Duration::days(10)).unwrap();
        assert!(l.has("https://a/1"));
    }

    #[test]
    fn persist_prunes_past_retention_and_stamps_legacy_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("seen.json");
        let old = (NOW - Duration::days(30)).unix_timestamp();
        fs::write(
            &p,
            format!(r#"["https://legacy", {{"link":"https://old","seen_at":{old}}}]"#),
        )
        .unwrap();

        let mut l = Ledger::load(&p, Duration::days(14)).unwrap();
        l.record("https://new", NOW);
        l.persist(NOW).unwrap();

        let l2 = Ledger::load(&p, Duration::days(14)).unwrap();
        assert!(l2.has("https://legacy"));
        assert!(l2.has("https://new"));
        assert!(!l2.has("https://old"));
        assert!(!tmp.path().join("seen.json.tmp").exists());
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("sub").join("page.html");
        write_atomic(&p, b"one").unwrap();
        write_atomic(&p, b"two").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "two");
    }
}
