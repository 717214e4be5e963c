// src/annotate/reply.rs
//! Tolerant, line-oriented parser for the model's numbered reply.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Canonical token for "nothing market-relevant here".
pub const NO_CORE_POINT: &str = "핵심 없음";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    Both { title: String, summary: String },
    TitleOnly { title: String },
    Unparsable,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Title,
    Summary,
}

fn re_enumerator() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\(?\d{1,2}\s*(?:[)\]:]|\.(?:\s|$))|[-*•·](?:\s|$))\s*").unwrap()
    })
}

fn re_label() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\**\s*(translated title|translation|title|korean title|번역 제목|번역|제목|one-sentence summary|summary|요약|한줄 요약|한 줄 요약|핵심)\s*\**\s*[:：]\s*\**",
        )
        .unwrap()
    })
}

fn classify_label(label: &str) -> Slot {
    let l = label.to_lowercase();
    if l.contains("summary") || l.contains("요약") || l == "핵심" {
        Slot::Summary
    } else {
        Slot::Title
    }
}

struct Line {
    /// Started with an enumerator or a label.
    marked: bool,
    slot: Option<Slot>,
    text: String,
}

/// Strip enumerator and label from one line.
fn clean_line(line: &str) -> Line {
    let mut s = line.trim();
    let mut marked = false;
    if let Some(m) = re_enumerator().find(s) {
        s = &s[m.end()..];
        marked = true;
    }
    let mut slot = None;
    if let Some(caps) = re_label().captures(s) {
        slot = caps.get(1).map(|m| classify_label(m.as_str()));
        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        s = &s[end..];
        marked = true;
    }
    let text = s
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '*' | '\u{201C}' | '\u{201D}' | '「' | '」'))
        .trim()
        .to_string();
    Line { marked, slot, text }
}

fn canonical_summary(s: String) -> String {
    let lower = s.to_lowercase();
    if s.contains(NO_CORE_POINT) || lower.contains("no core point") || s.contains("핵심없음")
    {
        NO_CORE_POINT.to_string()
    } else {
        s
    }
}

/// Split a reply into translation and summary.
///
/// Labeled lines go to their slot; unlabeled lines fill title, then summary.
/// When any line is numbered or labeled, unmarked lines before the first such
/// line are chatter ("Here is the result:") and skipped. Lines after both
/// slots are filled are ignored.
pub fn parse_reply(text: &str) -> ParsedReply {
    let lines: Vec<Line> = text.lines().map(clean_line).collect();
    let start = lines.iter().position(|l| l.marked).unwrap_or(0);

    let mut title: Option<String> = None;
    let mut summary: Option<String> = None;
    for line in lines.into_iter().skip(start).filter(|l| !l.text.is_empty()) {
        let target = match line.slot {
            Some(s) => s,
            None if title.is_none() => Slot::Title,
            None => Slot::Summary,
        };
        match target {
            Slot::Title if title.is_none() => title = Some(line.text),
            Slot::Summary if summary.is_none() => summary = Some(line.text),
            _ => {}
        }
        if title.is_some() && summary.is_some() {
            break;
        }
    }

    match (title, summary) {
        (Some(title), Some(summary)) => ParsedReply::Both {
            title,
            summary: canonical_summary(summary),
        },
        (Some(title), None) => ParsedReply::TitleOnly { title },
        (None, _) => ParsedReply::Unparsable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_reply_splits_in_order() {
        let r = parse_reply("1) 연준, 금리 동결\n2) 금리 경로 불확실성이 선물 변동성을 키울 수 있다.");
        assert_eq!(
            r,
            ParsedReply::Both {
                title: "연준, 금리 동결".into(),
                summary: "금리 경로 불확실성이 선물 변동성을 키울 수 있다.".into()
            }
        );
    }

    #[test]
    fn labels_and_markdown_are_stripped() {
        let r = parse_reply("**Translation:** \"유가 급등\"\n\n- Summary: 원유 선물 상승 압력.");
        assert_eq!(
            r,
            ParsedReply::Both {
                title: "유가 급등".into(),
                summary: "원유 선물 상승 압력.".into()
            }
        );
    }

    #[test]
    fn labeled_summary_before_title_still_lands_in_its_slot() {
        let r = parse_reply("요약: 달러 강세\n번역: 달러 지수 상승");
        assert_eq!(
            r,
            ParsedReply::Both {
                title: "달러 지수 상승".into(),
                summary: "달러 강세".into()
            }
        );
    }

    #[test]
    fn leading_chatter_before_numbered_lines_is_skipped() {
        let r = parse_reply("Here is the result:\n1) 연준 동결\n2) 중립.");
        assert_eq!(
            r,
            ParsedReply::Both {
                title: "연준 동결".into(),
                summary: "중립.".into()
            }
        );

        let r = parse_reply("물론입니다.\n\n번역: 국채 금리 상승\n요약: 채권 선물 약세.");
        assert_eq!(
            r,
            ParsedReply::Both {
                title: "국채 금리 상승".into(),
                summary: "채권 선물 약세.".into()
            }
        );

        // bare enumerator on its own line
        let r = parse_reply("1)\n달러 약세\n2) 수출주 호재.");
        assert_eq!(
            r,
            ParsedReply::Both {
                title: "달러 약세".into(),
                summary: "수출주 호재.".into()
            }
        );
    }

    #[test]
    fn unmarked_lines_still_fill_title_then_summary() {
        assert_eq!(
            parse_reply("금값 사상 최고\n안전자산 수요 확대."),
            ParsedReply::Both {
                title: "금값 사상 최고".into(),
                summary: "안전자산 수요 확대.".into()
            }
        );
    }

    #[test]
    fn no_core_point_is_canonicalized() {
        let r = parse_reply("1. 애플 신제품 공개\n2. 핵심 없음.");
        assert_eq!(
            r,
            ParsedReply::Both {
                title: "애플 신제품 공개".into(),
                summary: NO_CORE_POINT.into()
            }
        );
    }

    #[test]
    fn single_line_is_title_only() {
        assert_eq!(
            parse_reply("  1) 파월 발언 대기  \n"),
            ParsedReply::TitleOnly {
                title: "파월 발언 대기".into()
            }
        );
    }

    #[test]
    fn blank_or_summary_only_is_unparsable() {
        assert_eq!(parse_reply(""), ParsedReply::Unparsable);
        assert_eq!(parse_reply("\n 2) \n"), ParsedReply::Unparsable);
        assert_eq!(parse_reply("Summary: 무언가"), ParsedReply::Unparsable);
    }
}
