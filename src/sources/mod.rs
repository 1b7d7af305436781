// src/sources/mod.rs
//! One adapter per content origin. Every adapter has an HTTP mode for
//! production and a fixture mode that parses a captured body, with the parse
//! step pure so tests can pin the clock.

pub mod alimama;
pub mod github_topic;
pub mod github_trending;
pub mod infoq;
pub mod juejin;
pub mod ruanyifeng;

use once_cell::sync::OnceCell;
use regex::Regex;

/// Decode HTML entities, then wrap markup-looking tokens in backticks so
/// titles like `<template> tricks` survive markdown rendering.
pub(crate) fn escape_markup_tokens(s: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(<[\w\s]+>)").unwrap());
    let decoded = html_escape::decode_html_entities(s);
    re.replace_all(&decoded, "`$1`").to_string()
}

/// Collapse runs of whitespace and trim; scraped fragments come with layout
/// newlines embedded.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"\s+").unwrap());
    re.replace_all(s, " ").trim().to_string()
}

/// Compact count rendering: 12345 -> "12k", 980 -> "980".
pub(crate) fn format_count(n: u64) -> String {
    if n > 1000 {
        format!("{}k", (n as f64 / 1000.0).round() as u64)
    } else {
        n.to_string()
    }
}

/// Pull the digits out of a counter fragment like " 1,234 " or "评论数 12".
pub(crate) fn digits_of(s: &str) -> u64 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_tokens_get_backticked() {
        assert_eq!(
            escape_markup_tokens("understanding <template> in depth"),
            "understanding `<template>` in depth"
        );
        assert_eq!(escape_markup_tokens("no tags here"), "no tags here");
    }

    #[test]
    fn entities_are_decoded_before_escaping() {
        assert_eq!(
            escape_markup_tokens("&lt;div&gt; 还是 &lt;span&gt;&nbsp;?"),
            "`<div>` 还是 `<span>`\u{a0}?"
        );
    }

    #[test]
    fn counts_format_compactly() {
        assert_eq!(format_count(980), "980");
        assert_eq!(format_count(1000), "1000");
        assert_eq!(format_count(12345), "12k");
    }

    #[test]
    fn digits_are_extracted() {
        assert_eq!(digits_of(" 1,234 "), 1234);
        assert_eq!(digits_of("评论数 12"), 12);
        assert_eq!(digits_of("none"), 0);
    }
}
