// src/sources/alimama.rs
//! 阿里妈妈前端快爆, via the Zhihu column items JSON API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics::histogram;
use serde::Deserialize;

use crate::digest::types::{Section, SourceAdapter, SourceResult};
use crate::sources::escape_markup_tokens;

const COLUMN_URL: &str = "https://www.zhihu.com/api/v4/columns/mm-fe/items";
const ALL_HEADING: &str = "## 阿里妈妈前端快爆";
const PARTIAL_HEADING: &str = "## 阿里妈妈前端快爆 24 小时内最新发布";

#[derive(Debug, Deserialize)]
struct ColumnResponse {
    data: Option<Vec<ColumnItem>>,
}

#[derive(Debug, Deserialize)]
struct ColumnItem {
    title: String,
    excerpt: String,
    url: String,
    voteup_count: u64,
    /// Unix seconds.
    created: i64,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

pub struct AlimamaAdapter {
    mode: Mode,
    window: Duration,
}

impl AlimamaAdapter {
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
        let res: ColumnResponse =
            serde_json::from_str(body).context("parsing zhihu column json")?;

        let mut all = Vec::new();
        let mut partial = Vec::new();
        for it in res.data.unwrap_or_default() {
            let head_line = format!(
                "* **[{}]({})** *🧡：{}*",
                escape_markup_tokens(&it.title),
                it.url,
                it.voteup_count,
            );
            let brief_line = format!("> {}", escape_markup_tokens(&it.excerpt));

            all.push(head_line.clone());
            all.push(brief_line.clone());

            let published = DateTime::<Utc>::from_timestamp(it.created, 0).unwrap_or_default();
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
impl SourceAdapter for AlimamaAdapter {
    async fn fetch(&self) -> Result<SourceResult> {
        let body = match &self.mode {
            Mode::Fixture(s) => s.clone(),
            Mode::Http { client } => client
                .get(COLUMN_URL)
                .send()
                .await
                .context("zhihu column get()")?
                .text()
                .await
                .context("zhihu column .text()")?,
        };
        Self::parse(&body, Utc::now(), self.window)
    }

    fn name(&self) -> &'static str {
        "alimama-fe"
    }
}
