// src/digest/registry.rs
//! The closed, ordered set of content sources.
//!
//! Registration order is load-bearing: the digest lists sections in this
//! order and the hint resolver scans it first-match-wins.

use std::sync::Arc;

use crate::config::Settings;
use crate::digest::types::SourceAdapter;
use crate::sources::{
    alimama::AlimamaAdapter, github_topic::GithubTopicAdapter,
    github_trending::GithubTrendingAdapter, infoq::InfoqAdapter, juejin::JuejinAdapter,
    ruanyifeng::RuanyifengAdapter,
};

/// One source: unique name, lowercase keywords for hint matching, and the
/// adapter that fetches it. Immutable after startup.
pub struct RegisteredSource {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub adapter: Arc<dyn SourceAdapter>,
}

pub const RUANYIFENG: &str = "ruanyifeng-blog";
pub const GITHUB_TOPIC: &str = "github-fe-topic";
pub const GITHUB_TRENDING: &str = "github-trending";
pub const JUEJIN: &str = "juejin-hot";
pub const INFOQ: &str = "infoq-fe";
pub const ALIMAMA: &str = "alimama-fe";

/// Build the registry from settings, skipping banned names.
pub fn build_registry(settings: &Settings, client: &reqwest::Client) -> Vec<RegisteredSource> {
    let window = settings.recency_window();
    let top = settings.top_count;

    let mut sources = vec![
        RegisteredSource {
            name: RUANYIFENG,
            keywords: &["ruanyifeng", "阮一峰"],
            adapter: Arc::new(RuanyifengAdapter::over_http(
                client.clone(),
                settings.ruanyifeng_topics.clone(),
                window,
            )),
        },
        RegisteredSource {
            name: GITHUB_TOPIC,
            keywords: &["topic", "前端专题", "前端话题"],
            adapter: Arc::new(GithubTopicAdapter::over_http(client.clone(), top)),
        },
        RegisteredSource {
            name: GITHUB_TRENDING,
            keywords: &["github", "trending", "前端流行", "前端潮流", "前端趋势"],
            adapter: Arc::new(GithubTrendingAdapter::over_http(client.clone(), top)),
        },
        RegisteredSource {
            name: JUEJIN,
            keywords: &["juejin", "掘金", "掘金热门", "掘金前端"],
            adapter: Arc::new(JuejinAdapter::over_http(client.clone(), window)),
        },
        RegisteredSource {
            name: INFOQ,
            keywords: &["infoq", "infoq前端", "前端之巅", "阅读", "reading"],
            adapter: Arc::new(InfoqAdapter::over_http(client.clone(), window)),
        },
        RegisteredSource {
            name: ALIMAMA,
            keywords: &["alimama", "快爆", "阿里妈妈"],
            adapter: Arc::new(AlimamaAdapter::over_http(client.clone(), window)),
        },
    ];

    sources.retain(|s| {
        let banned = settings
            .banned_sources
            .iter()
            .any(|b| b.eq_ignore_ascii_case(s.name));
        if banned {
            tracing::info!(source = s.name, "source banned by configuration");
        }
        !banned
    });

    sources
}
