// src/sources/infoq.rs
//! InfoQ 前端之巅 articles, via the article-list JSON API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics::histogram;
use serde::Deserialize;

use crate::digest::types::{Section, SourceAdapter, SourceResult};
use crate::sources::escape_markup_tokens;

const LIST_URL: &str = "https://www.infoq.cn/public/v1/article/getList";
const REFERER: &str = "https://www.infoq.cn/topic/Front-end";
const ALL_HEADING: &str = "## InfoQ 前端之巅前端热贴";
const PARTIAL_HEADING: &str = "## InfoQ 前端之巅 24 小时内最新前端热贴";

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Option<Vec<ListItem>>,
}

#[derive(Debug, Deserialize)]
struct ListItem {
    uuid: String,
    /// Unix milliseconds.
    publish_time: i64,
    article_title: String,
    article_summary: String,
    #[serde(default)]
    author: Option<Vec<Author>>,
    #[serde(default)]
    no_author: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    nickname: String,
}

impl ListItem {
    fn byline(&self) -> String {
        if let Some(no_author) = self.no_author.as_deref().filter(|s| !s.is_empty()) {
            return no_author.to_string();
        }
        self.author
            .as_deref()
            .map(|authors| {
                authors
                    .iter()
                    .map(|a| a.nickname.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

pub struct InfoqAdapter {
    mode: Mode,
    window: Duration,
}

impl InfoqAdapter {
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
        let res: ListResponse = serde_json::from_str(body).context("parsing infoq list json")?;

        let mut all = Vec::new();
        let mut partial = Vec::new();
        for it in res.data.unwrap_or_default() {
            let head_line = format!(
                "* **[{}](https://www.infoq.cn/article/{})** *作者：{}*",
                escape_markup_tokens(&it.article_title),
                it.uuid,
                it.byline(),
            );
            let brief_line = format!("> {}", escape_markup_tokens(&it.article_summary));

            all.push(head_line.clone());
            all.push(brief_line.clone());

            let published =
                DateTime::<Utc>::from_timestamp_millis(it.publish_time).unwrap_or_default();
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
impl SourceAdapter for InfoqAdapter {
    async fn fetch(&self) -> Result<SourceResult> {
        let body = match &self.mode {
            Mode::Fixture(s) => s.clone(),
            Mode::Http { client } => client
                .post(LIST_URL)
                .header(reqwest::header::REFERER, REFERER)
                .json(&serde_json::json!({ "type": 0, "size": 30, "id": 33 }))
                .send()
                .await
                .context("infoq list post()")?
                .text()
                .await
                .context("infoq list .text()")?,
        };
        Self::parse(&body, Utc::now(), self.window)
    }

    fn name(&self) -> &'static str {
        "infoq-fe"
    }
}
