// src/digest/compose.rs
//! Renders cache entries into the composite digest and single-source views.
//! Pure functions over snapshots; registry order in, registry order out.

use crate::digest::cache::CacheEntry;
use crate::digest::quote::TodayInfo;

pub const DIGEST_TITLE: &str = "# the BIG BANG FE 🔥 今日读物";
/// Returned by `compose_single` when the source has never been fetched.
pub const NO_CONTENT: &str = "暂无内容";

const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Merge every entry's partial view into one report. Absent entries and
/// entries whose partial view has no items contribute nothing, not even a
/// heading. Returns the summed partial item count alongside the text.
pub fn compose_digest(entries: &[CacheEntry], today: &TodayInfo) -> (usize, String) {
    let mut total = 0usize;
    let mut body = String::new();

    for entry in entries {
        let Some(result) = &entry.result else {
            continue;
        };
        let partial = &result.partial;
        if partial.items.is_empty() {
            continue;
        }
        total += partial.items.len();
        body.push_str(&partial.heading);
        body.push_str("\n\n");
        body.push_str(&partial.items.join("\n"));
        body.push_str(SECTION_SEPARATOR);
    }

    let mut blocks = vec![
        DIGEST_TITLE.to_string(),
        format!("**时间：***{}*", today.display_time),
        format!("**总数：***{total} 条*"),
        format!("![Hello]({})", today.image_url),
    ];
    if !today.quote.is_empty() && !today.author.is_empty() {
        blocks.push(format!("> {} *-- {}*", today.quote, today.author));
    }
    blocks.push("---".to_string());
    blocks.push(body);

    (total, blocks.join("\n\n"))
}

/// The full (unfiltered) view of exactly one entry; items separated by blank
/// lines. A source with no cached content gets the sentinel line instead.
pub fn compose_single(entry: Option<&CacheEntry>) -> String {
    match entry.and_then(|e| e.result.as_ref()) {
        Some(result) => format!(
            "{}\n\n{}",
            result.all.heading,
            result.all.items.join("\n\n")
        ),
        None => NO_CONTENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::types::{Section, SourceResult};
    use chrono::Utc;

    fn today() -> TodayInfo {
        TodayInfo {
            display_time: "08:00:00".into(),
            quote: "少即是多".into(),
            author: "Mies".into(),
            image_url: "https://picsum.photos/seed/2024-5-1/200/300".into(),
        }
    }

    fn entry(name: &'static str, partial_items: &[&str]) -> CacheEntry {
        CacheEntry {
            name,
            result: Some(SourceResult {
                all: Section::new(
                    format!("## {name} 全部"),
                    partial_items.iter().map(|s| s.to_string()).collect(),
                ),
                partial: Section::new(
                    format!("## {name} 最新"),
                    partial_items.iter().map(|s| s.to_string()).collect(),
                ),
            }),
            fetched_at: Some(Utc::now()),
        }
    }

    fn absent(name: &'static str) -> CacheEntry {
        CacheEntry {
            name,
            result: None,
            fetched_at: None,
        }
    }

    #[test]
    fn total_is_sum_of_partial_items_across_entries() {
        let entries = vec![
            entry("a", &["* 1", "* 2"]),
            absent("b"),
            entry("c", &[]),
            entry("d", &["* 3"]),
        ];
        let (total, _) = compose_digest(&entries, &today());
        assert_eq!(total, 3);
    }

    #[test]
    fn empty_partial_contributes_no_heading() {
        let entries = vec![entry("a", &["* x"]), entry("quiet", &[])];
        let (_, text) = compose_digest(&entries, &today());
        assert!(text.contains("## a 最新"));
        assert!(!text.contains("quiet"));
    }

    #[test]
    fn sections_follow_entry_order() {
        let entries = vec![entry("first", &["* x"]), entry("second", &["* y"])];
        let (_, text) = compose_digest(&entries, &today());
        let i = text.find("## first 最新").unwrap();
        let j = text.find("## second 最新").unwrap();
        assert!(i < j);
    }

    #[test]
    fn header_carries_count_quote_and_image() {
        let entries = vec![entry("a", &["* 1", "* 2"])];
        let (_, text) = compose_digest(&entries, &today());
        assert!(text.starts_with(DIGEST_TITLE));
        assert!(text.contains("**总数：***2 条*"));
        assert!(text.contains("![Hello](https://picsum.photos/seed/2024-5-1/200/300)"));
        assert!(text.contains("> 少即是多 *-- Mies*"));
    }

    #[test]
    fn quote_line_omitted_when_quote_or_author_empty() {
        let mut info = today();
        info.quote.clear();
        let (_, text) = compose_digest(&[entry("a", &["* 1"])], &info);
        assert!(!text.contains("*-- Mies*"));

        let mut info = today();
        info.author.clear();
        let (_, text) = compose_digest(&[entry("a", &["* 1"])], &info);
        assert!(!text.contains("> 少即是多"));
    }

    #[test]
    fn single_view_uses_all_items_or_sentinel() {
        let e = entry("a", &["* 1", "* 2"]);
        let text = compose_single(Some(&e));
        assert!(text.starts_with("## a 全部"));
        assert!(text.contains("* 1\n\n* 2"));

        assert_eq!(compose_single(Some(&absent("b"))), NO_CONTENT);
        assert_eq!(compose_single(None), NO_CONTENT);
    }
}
