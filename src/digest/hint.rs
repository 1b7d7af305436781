// src/digest/hint.rs
//! Free-text hint -> source name, by keyword containment.
//!
//! The hint is lowercased and the registry scanned in registration order; the
//! first source with any keyword appearing as a substring wins. No scoring,
//! no ranking. `None` means "no relevant source", which is a defined outcome
//! rather than an error.

use crate::digest::registry::RegisteredSource;

/// Fixed reply when no source matches the hint.
pub const NO_RELATED: &str = "没有找到相关读物";

pub fn resolve_source<'a>(
    registry: &'a [RegisteredSource],
    hint: &str,
) -> Option<&'a RegisteredSource> {
    let sentence = hint.to_lowercase();
    registry
        .iter()
        .find(|s| s.keywords.iter().any(|kw| sentence.contains(kw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::testutil::{registry_with_keywords, StubAdapter};

    fn table() -> Vec<RegisteredSource> {
        registry_with_keywords(vec![
            (StubAdapter::ok("ruanyifeng-blog", 1, 1), &["ruanyifeng", "阮一峰"] as &[_]),
            (StubAdapter::ok("github-fe-topic", 1, 1), &["topic", "前端专题", "前端话题"]),
            (
                StubAdapter::ok("github-trending", 1, 1),
                &["github", "trending", "前端流行", "前端潮流", "前端趋势"],
            ),
            (
                StubAdapter::ok("juejin-hot", 1, 1),
                &["juejin", "掘金", "掘金热门", "掘金前端"],
            ),
            (
                StubAdapter::ok("infoq-fe", 1, 1),
                &["infoq", "infoq前端", "前端之巅", "阅读", "reading"],
            ),
            (StubAdapter::ok("alimama-fe", 1, 1), &["alimama", "快爆", "阿里妈妈"]),
        ])
    }

    #[test]
    fn documented_hints_resolve() {
        let t = table();
        assert_eq!(resolve_source(&t, "掘金热门").unwrap().name, "juejin-hot");
        assert_eq!(resolve_source(&t, "看看阮一峰写了什么").unwrap().name, "ruanyifeng-blog");
        assert_eq!(resolve_source(&t, "github trending").unwrap().name, "github-trending");
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let t = table();
        assert_eq!(resolve_source(&t, "InfoQ 上有什么").unwrap().name, "infoq-fe");
        assert_eq!(resolve_source(&t, "GITHUB!").unwrap().name, "github-trending");
    }

    #[test]
    fn first_registered_source_wins_ties() {
        // "前端话题 trending" matches both github sources; registration order
        // decides.
        let t = table();
        assert_eq!(
            resolve_source(&t, "前端话题 trending").unwrap().name,
            "github-fe-topic"
        );
    }

    #[test]
    fn gibberish_resolves_to_none() {
        let t = table();
        assert!(resolve_source(&t, "unrelated gibberish").is_none());
        assert!(resolve_source(&t, "").is_none());
    }
}
