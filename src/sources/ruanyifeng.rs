// src/sources/ruanyifeng.rs
//! 阮一峰技术博客: archive page for recency, topic pages for content.
//!
//! The archive page carries dates and comment counts; topic pages carry the
//! curated article lists. The partial view is the topic articles whose link
//! also appears in the recent slice of the archive. With no topics configured
//! the archive itself is the content.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use metrics::histogram;
use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;

use crate::digest::quote::display_offset;
use crate::digest::types::{Section, SourceAdapter, SourceResult};
use crate::sources::{collapse_whitespace, digits_of, escape_markup_tokens};

const ARCHIVE_URL: &str = "https://www.ruanyifeng.com/blog/archives.html";
const ALL_HEADING: &str = "## 阮一峰技术博客";
const PARTIAL_HEADING: &str = "## 阮一峰技术博客最新博文";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArticle {
    pub title: String,
    pub link: String,
    pub comment_count: String,
    pub published: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicArticle {
    pub title: String,
    pub link: String,
}

enum Mode {
    Fixture {
        archive: String,
        topics: Vec<String>,
    },
    Http {
        client: reqwest::Client,
        topics: Vec<String>,
    },
}

pub struct RuanyifengAdapter {
    mode: Mode,
    window: Duration,
}

impl RuanyifengAdapter {
    pub fn over_http(client: reqwest::Client, topics: Vec<String>, window: Duration) -> Self {
        Self {
            mode: Mode::Http { client, topics },
            window,
        }
    }

    pub fn from_fixtures(archive: &str, topics: Vec<String>, window: Duration) -> Self {
        Self {
            mode: Mode::Fixture {
                archive: archive.to_string(),
                topics,
            },
            window,
        }
    }

    /// Archive entries: `<li class="module-list-item">` with a date like
    /// `2024.6.12` in the surrounding text and a comment count in `.hint`.
    pub fn parse_archive(html: &str) -> Vec<ArchiveArticle> {
        static DATE_RE: OnceCell<Regex> = OnceCell::new();
        let date_re =
            DATE_RE.get_or_init(|| Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})").unwrap());

        let document = Html::parse_document(html);
        let li_sel = Selector::parse("#alpha li.module-list-item").unwrap();
        let a_sel = Selector::parse("a").unwrap();
        let hint_sel = Selector::parse(".hint").unwrap();

        let mut articles = Vec::new();
        for li in document.select(&li_sel) {
            let Some(a) = li.select(&a_sel).next() else {
                continue;
            };
            let Some(href) = a.value().attr("href") else {
                continue;
            };
            let title =
                escape_markup_tokens(&collapse_whitespace(&a.text().collect::<String>()));
            if title.is_empty() {
                continue;
            }
            let comment_count = li
                .select(&hint_sel)
                .next()
                .map(|h| digits_of(&h.text().collect::<String>()).to_string())
                .unwrap_or_default();

            let li_text = li.text().collect::<String>();
            let published = date_re
                .captures(&li_text)
                .and_then(|c| {
                    let year: i32 = c[1].parse().ok()?;
                    let month: u32 = c[2].parse().ok()?;
                    let day: u32 = c[3].parse().ok()?;
                    display_offset()
                        .with_ymd_and_hms(year, month, day, 0, 0, 0)
                        .single()
                })
                .map(|local| local.with_timezone(&Utc))
                .unwrap_or_default();

            articles.push(ArchiveArticle {
                title,
                link: href.to_string(),
                comment_count,
                published,
            });
        }
        articles
    }

    /// Topic pages reuse the archive list markup, minus dates.
    pub fn parse_topic(html: &str) -> Vec<TopicArticle> {
        let document = Html::parse_document(html);
        let li_sel = Selector::parse("#alpha li.module-list-item").unwrap();
        let a_sel = Selector::parse("a").unwrap();

        let mut articles = Vec::new();
        for li in document.select(&li_sel) {
            let Some(a) = li.select(&a_sel).next() else {
                continue;
            };
            let Some(href) = a.value().attr("href") else {
                continue;
            };
            let title =
                escape_markup_tokens(&collapse_whitespace(&a.text().collect::<String>()));
            if title.is_empty() {
                continue;
            }
            articles.push(TopicArticle {
                title,
                link: href.to_string(),
            });
        }
        articles
    }

    pub fn build_result(
        archive: &[ArchiveArticle],
        topic_pages: &[Vec<TopicArticle>],
        now: DateTime<Utc>,
        window: Duration,
    ) -> SourceResult {
        let recent: HashMap<&str, &ArchiveArticle> = archive
            .iter()
            .filter(|a| a.published + window >= now)
            .map(|a| (a.link.as_str(), a))
            .collect();

        let (all, partial) = if topic_pages.is_empty() {
            let all = archive
                .iter()
                .map(|a| format!("* **[{}]({})**", a.title, a.link))
                .collect();
            let partial = archive
                .iter()
                .filter(|a| recent.contains_key(a.link.as_str()))
                .map(|a| format!("* **[{}]({})** *评论数：{}*", a.title, a.link, a.comment_count))
                .collect();
            (all, partial)
        } else {
            let all = topic_pages
                .iter()
                .flatten()
                .map(|a| format!("* **[{}]({})**", a.title, a.link))
                .collect();
            let partial = topic_pages
                .iter()
                .flatten()
                .filter_map(|a| recent.get(a.link.as_str()))
                .map(|a| format!("* **[{}]({})** *评论数：{}*", a.title, a.link, a.comment_count))
                .collect();
            (all, partial)
        };

        SourceResult {
            all: Section::new(ALL_HEADING, all),
            partial: Section::new(PARTIAL_HEADING, partial),
        }
    }
}

#[async_trait]
impl SourceAdapter for RuanyifengAdapter {
    async fn fetch(&self) -> Result<SourceResult> {
        let (archive_body, topic_bodies) = match &self.mode {
            Mode::Fixture { archive, topics } => (archive.clone(), topics.clone()),
            Mode::Http { client, topics } => {
                let archive = client
                    .get(ARCHIVE_URL)
                    .send()
                    .await
                    .context("ruanyifeng archive get()")?
                    .text()
                    .await
                    .context("ruanyifeng archive .text()")?;
                let mut bodies = Vec::with_capacity(topics.len());
                for topic in topics {
                    let url = format!("https://www.ruanyifeng.com/blog/{topic}/");
                    let body = client
                        .get(&url)
                        .send()
                        .await
                        .with_context(|| format!("ruanyifeng topic get() {topic}"))?
                        .text()
                        .await
                        .context("ruanyifeng topic .text()")?;
                    bodies.push(body);
                }
                (archive, bodies)
            }
        };

        let t0 = std::time::Instant::now();
        let archive = Self::parse_archive(&archive_body);
        let topic_pages: Vec<Vec<TopicArticle>> = topic_bodies
            .iter()
            .map(|b| Self::parse_topic(b))
            .collect();
        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(
            archive = archive.len(),
            topics = topic_pages.len(),
            "ruanyifeng parsed"
        );

        Ok(Self::build_result(
            &archive,
            &topic_pages,
            Utc::now(),
            self.window,
        ))
    }

    fn name(&self) -> &'static str {
        "ruanyifeng-blog"
    }
}
