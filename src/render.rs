// src/render.rs
//! Static HTML page. Pure: same inputs, same bytes.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;
use time::{macros::format_description, OffsetDateTime};

use crate::config::TARGET_OFFSET;
use crate::ingest::types::{AnnotatedEntry, PublishedAt};

pub const PAGE_TITLE: &str = "GOMA NEWS";
pub const PAGE_HEADING: &str = "실시간 해외선물 뉴스";
pub const NO_NEW_ITEMS: &str = "새로운 뉴스가 없습니다.";
pub const UNKNOWN_TIME: &str = "시간 정보 없음";

/// `2026-10-17 21:05 KST`
pub fn format_kst(t: OffsetDateTime) -> String {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]");
    match t.to_offset(TARGET_OFFSET).format(&fmt) {
        Ok(s) => format!("{s} KST"),
        Err(_) => UNKNOWN_TIME.to_string(),
    }
}

pub fn format_published(p: &PublishedAt) -> String {
    match p {
        PublishedAt::At(t) => format_kst(*t),
        PublishedAt::Unknown => UNKNOWN_TIME.to_string(),
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:2rem auto;padding:0 1rem;color:#222}\
ul{list-style:none;padding:0}li{border-bottom:1px solid #ddd;padding:.8rem 0}\
.src{color:#888;font-size:.85rem}.summary{margin:.3rem 0;color:#333}.time{color:#666;font-size:.85rem}";

/// Render the page for one run, entries in the given order.
pub fn render_page(updated_at: OffsetDateTime, entries: &[AnnotatedEntry]) -> String {
    let mut html = String::with_capacity(2048 + entries.len() * 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{PAGE_TITLE}</title>");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{PAGE_HEADING}</h1>");
    let _ = writeln!(
        html,
        "<p class=\"updated\">업데이트 시각: {}</p>",
        format_kst(updated_at)
    );

    if entries.is_empty() {
        let _ = writeln!(html, "<p class=\"empty\">{NO_NEW_ITEMS}</p>");
    } else {
        html.push_str("<ul>\n");
        for e in entries {
            render_entry(&mut html, e);
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_entry(html: &mut String, e: &AnnotatedEntry) {
    html.push_str("<li>\n");
    let _ = writeln!(
        html,
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" title=\"{}\">{}</a>",
        encode_double_quoted_attribute(&e.link),
        encode_double_quoted_attribute(&e.title),
        encode_text(&e.translated_title)
    );
    if let Some(summary) = &e.summary {
        let _ = writeln!(html, "<p class=\"summary\">{}</p>", encode_text(summary));
    }
    let _ = writeln!(
        html,
        "<span class=\"time\">{}</span> <span class=\"src\">{}</span>",
        encode_text(&e.rendered_time),
        encode_text(&e.source_id)
    );
    html.push_str("</li>\n");
}
