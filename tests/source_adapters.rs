// tests/source_adapters.rs
//
// Adapter parsing against captured upstream bodies, with the clock pinned so
// the recency filters are deterministic.

use chrono::{Duration, TimeZone, Utc};

use fe_daily::digest::types::SourceAdapter;
use fe_daily::sources::alimama::AlimamaAdapter;
use fe_daily::sources::github_topic::GithubTopicAdapter;
use fe_daily::sources::github_trending::GithubTrendingAdapter;
use fe_daily::sources::infoq::InfoqAdapter;
use fe_daily::sources::juejin::JuejinAdapter;
use fe_daily::sources::ruanyifeng::RuanyifengAdapter;

const JUEJIN_FEED: &str = include_str!("fixtures/juejin_feed.json");
const INFOQ_LIST: &str = include_str!("fixtures/infoq_list.json");
const ZHIHU_COLUMN: &str = include_str!("fixtures/zhihu_column.json");
const RYF_ARCHIVE: &str = include_str!("fixtures/ruanyifeng_archive.html");
const RYF_TOPIC: &str = include_str!("fixtures/ruanyifeng_topic.html");
const GH_TOPIC: &str = include_str!("fixtures/github_topic.html");
const GH_TRENDING_TS: &str = include_str!("fixtures/github_trending_ts.html");
const GH_TRENDING_JS: &str = include_str!("fixtures/github_trending_js.html");

// 2024-06-01T02:46:40Z; the fixtures date their fresh items shortly before.
fn now() -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_717_210_000, 0).unwrap()
}

fn day() -> Duration {
    Duration::hours(24)
}

#[test]
fn juejin_renders_and_filters_by_window() {
    let result = JuejinAdapter::parse(JUEJIN_FEED, now(), day()).unwrap();

    // 3 articles, 2 lines each; only the 2 recent ones pass the filter.
    assert_eq!(result.all.items.len(), 6);
    assert_eq!(result.partial.items.len(), 4);
    assert_eq!(result.all.heading, "## 掘金前端热贴");

    let head = &result.partial.items[0];
    assert!(head.contains("彻底搞懂 `<template>` 标签"), "markup token escaped: {head}");
    assert!(head.contains("https://juejin.cn/post/7001"));
    assert!(head.contains("作者：小明"));
    assert!(head.contains("浏览数：12k"), "compact count: {head}");
    assert!(result.partial.items[1].starts_with("> "));

    // The stale article is still in `all`.
    assert!(result.all.items.iter().any(|l| l.contains("旧文存档")));
    assert!(!result.partial.items.iter().any(|l| l.contains("旧文存档")));
}

#[test]
fn juejin_rejects_garbage_bodies() {
    assert!(JuejinAdapter::parse("<html>not json</html>", now(), day()).is_err());
}

#[test]
fn juejin_empty_feed_is_a_valid_zero_item_result() {
    let result = JuejinAdapter::parse(r#"{"data": []}"#, now(), day()).unwrap();
    assert!(result.all.items.is_empty());
    assert!(result.partial.items.is_empty());
}

#[test]
fn infoq_bylines_prefer_no_author_then_join_nicknames() {
    let result = InfoqAdapter::parse(INFOQ_LIST, now(), day()).unwrap();

    assert_eq!(result.all.items.len(), 4);
    assert_eq!(result.partial.items.len(), 2);
    assert!(result.partial.items[0].contains("作者：张三, 李四"));
    assert!(result.all.items[2].contains("作者：InfoQ 编辑部"));
    assert!(result.all.items[0].contains("https://www.infoq.cn/article/abc123"));
}

#[test]
fn alimama_filters_by_created_time() {
    let result = AlimamaAdapter::parse(ZHIHU_COLUMN, now(), day()).unwrap();

    assert_eq!(result.all.items.len(), 4);
    assert_eq!(result.partial.items.len(), 2);
    assert!(result.partial.items[0].contains("🧡：42"));
    assert!(result.partial.items[0].contains("https://zhuanlan.zhihu.com/p/700000001"));
}

#[test]
fn ruanyifeng_partial_is_topic_articles_present_in_recent_archive() {
    let archive = RuanyifengAdapter::parse_archive(RYF_ARCHIVE);
    assert_eq!(archive.len(), 2);
    assert_eq!(archive[0].comment_count, "25");

    let topics = vec![RuanyifengAdapter::parse_topic(RYF_TOPIC)];
    assert_eq!(topics[0].len(), 2);

    // Pin "now" to noon UTC+8 on the day of the fresh archive entry.
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap();
    let result = RuanyifengAdapter::build_result(&archive, &topics, now, day());

    assert_eq!(result.all.items.len(), 2);
    assert_eq!(result.partial.items.len(), 1);
    assert!(result.partial.items[0].contains("第 100 期"));
    assert!(result.partial.items[0].contains("评论数：25"));
    assert_eq!(result.partial.heading, "## 阮一峰技术博客最新博文");
}

#[test]
fn ruanyifeng_without_topics_falls_back_to_archive() {
    let archive = RuanyifengAdapter::parse_archive(RYF_ARCHIVE);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap();
    let result = RuanyifengAdapter::build_result(&archive, &[], now, day());

    assert_eq!(result.all.items.len(), 2);
    assert_eq!(result.partial.items.len(), 1);
}

#[test]
fn github_topic_extracts_repos_and_takes_top_n() {
    let repos = GithubTopicAdapter::parse_page(GH_TOPIC);
    assert_eq!(repos.len(), 3);
    assert_eq!(repos[0].title, "facebook/react");
    assert_eq!(repos[0].link, "https://github.com/facebook/react");
    assert_eq!(repos[0].language, "JavaScript");
    assert_eq!(repos[0].stars, "223k");
    assert_eq!(repos[2].stars, "789");

    let result = GithubTopicAdapter::build_result(&repos, 2);
    assert_eq!(result.all.items.len(), 6);
    assert_eq!(result.partial.items.len(), 4);
    assert_eq!(result.partial.heading, "## Github 前端专题榜 TOP2");
}

#[test]
fn github_trending_keeps_language_page_order() {
    let ts = GithubTrendingAdapter::parse_page(GH_TRENDING_TS, "Typescript");
    let js = GithubTrendingAdapter::parse_page(GH_TRENDING_JS, "Javascript");
    assert_eq!(ts.len(), 2);
    assert_eq!(js.len(), 1);
    assert_eq!(ts[0].title, "microsoft/TypeScript");
    assert_eq!(ts[0].stars, "99k");
    assert_eq!(ts[0].forks, "12k");
    assert_eq!(ts[0].today_stars, "876");

    let result = GithubTrendingAdapter::build_result(&[ts, js], 1);
    // Partial: top 1 of each language, 2 lines per repo.
    assert_eq!(result.partial.items.len(), 4);
    assert!(result.partial.items[0].contains("microsoft/TypeScript"));
    assert!(result.partial.items[2].contains("axios/axios"));
    // All: every repo with the full stat line.
    assert_eq!(result.all.items.len(), 6);
    assert!(result.all.items[0].contains("fork：12k"));
    assert!(result.all.items[0].contains("今日 ⭐️：876"));
}

#[tokio::test]
async fn fixture_adapters_fetch_end_to_end() {
    let juejin = JuejinAdapter::from_fixture(JUEJIN_FEED, day());
    let result = juejin.fetch().await.unwrap();
    assert_eq!(juejin.name(), "juejin-hot");
    assert_eq!(result.all.items.len(), 6);
    // Real clock: every fixture article is long past the window.
    assert!(result.partial.items.len() <= result.all.items.len());

    let trending = GithubTrendingAdapter::from_fixtures(GH_TRENDING_TS, GH_TRENDING_JS, 2);
    let result = trending.fetch().await.unwrap();
    assert_eq!(result.all.items.len(), 6);
    assert_eq!(result.partial.items.len(), 6);
}
