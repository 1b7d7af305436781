// src/sources/juejin.rs
//! Juejin front-end hot posts, via the recommend-feed JSON API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics::histogram;
use serde::Deserialize;

use crate::digest::types::{Section, SourceAdapter, SourceResult};
use crate::sources::{escape_markup_tokens, format_count};

const FEED_URL: &str = "https://api.juejin.cn/recommend_api/v1/article/recommend_cate_tag_feed";
const ALL_HEADING: &str = "## 掘金前端热贴";
const PARTIAL_HEADING: &str = "## 掘金 24 小时内最新前端热贴";

#[derive(Debug, Deserialize)]
struct FeedResponse {
    data: Option<Vec<FeedItem>>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    article_info: ArticleInfo,
    author_user_info: AuthorInfo,
}

#[derive(Debug, Deserialize)]
struct ArticleInfo {
    article_id: String,
    title: String,
    brief_content: String,
    view_count: u64,
    digg_count: u64,
    comment_count: u64,
    /// Unix seconds, as a string.
    ctime: String,
}

#[derive(Debug, Deserialize)]
struct AuthorInfo {
    user_name: String,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

pub struct JuejinAdapter {
    mode: Mode,
    window: Duration,
}

impl JuejinAdapter {
    pub fn over_http(client: reqwest::Client, window: Duration) -> Self {
        Self {
            mode: Mode::Http { client },
            window,
        }
    }

    pub fn from_fixture(body: &str, window: Duration) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
            window,
        }
    }

    pub fn parse(body: &str, now: DateTime<Utc>, window: Duration) -> Result<SourceResult> {
        let t0 = std::time::Instant::now();
        let res: FeedResponse = serde_json::from_str(body).context("parsing juejin feed json")?;

        let mut all = Vec::new();
        let mut partial = Vec::new();
        for it in res.data.unwrap_or_default() {
            let info = it.article_info;
            let head_line = format!(
                "* **[{}](https://juejin.cn/post/{})** *作者：{} ｜ 评论数：{} | 浏览数：{} | 🧡：{}*",
                escape_markup_tokens(&info.title),
                info.article_id,
                it.author_user_info.user_name,
                format_count(info.comment_count),
                format_count(info.view_count),
                format_count(info.digg_count),
            );
            let brief_line = format!("> {}", escape_markup_tokens(&info.brief_content));

            all.push(head_line.clone());
            all.push(brief_line.clone());

            let published = DateTime::<Utc>::from_timestamp(info.ctime.parse().unwrap_or(0), 0)
                .unwrap_or_default();
            if published + window >= now {
                partial.push(head_line);
                partial.push(brief_line);
            }
        }

        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(SourceResult {
            all: Section::new(ALL_HEADING, all),
            partial: Section::new(PARTIAL_HEADING, partial),
        })
    }
}

#[async_trait]
impl SourceAdapter for JuejinAdapter {
    async fn fetch(&self) -> Result<SourceResult> {
        let body = match &self.mode {
            Mode::Fixture(s) => s.clone(),
            Mode::Http { client } => {
                let payload = serde_json::json!({
                    "id_type": 2,
                    "sort_type": 200,
                    "cate_id": "6809637767543259144",
                    "tag_id": "6809640407484334093",
                    "cursor": "0",
                    "limit": 20,
                });
                client
                    .post(FEED_URL)
                    .json(&payload)
                    .send()
                    .await
                    .context("juejin feed post()")?
                    .text()
                    .await
                    .context("juejin feed .text()")?
            }
        };
        Self::parse(&body, Utc::now(), self.window)
    }

    fn name(&self) -> &'static str {
        "juejin-hot"
    }
}
