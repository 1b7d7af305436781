// src/sources/github_topic.rs
//! GitHub front-end topic page scrape.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use scraper::{Html, Selector};
use url::Url;

use crate::digest::types::{Section, SourceAdapter, SourceResult};
use crate::sources::{collapse_whitespace, digits_of, escape_markup_tokens, format_count};

const TOPIC_URL: &str = "https://github.com/topics/front-end";
const ALL_HEADING: &str = "## Github 前端专题榜";

/// Resolve a (usually relative) repo href against github.com.
pub(crate) fn join_github(href: &str) -> Option<String> {
    Url::parse("https://github.com")
        .ok()?
        .join(href)
        .ok()
        .map(|u| u.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRepo {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub stars: String,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

pub struct GithubTopicAdapter {
    mode: Mode,
    top_count: usize,
}

impl GithubTopicAdapter {
    pub fn over_http(client: reqwest::Client, top_count: usize) -> Self {
        Self {
            mode: Mode::Http { client },
            top_count,
        }
    }

    pub fn from_fixture(body: &str, top_count: usize) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
            top_count,
        }
    }

    pub fn parse_page(html: &str) -> Vec<TopicRepo> {
        let document = Html::parse_document(html);
        let article_sel = Selector::parse("article.border").unwrap();
        let title_sel = Selector::parse("h3").unwrap();
        let desc_sel = Selector::parse("p").unwrap();
        let link_sel = Selector::parse("a.text-bold").unwrap();
        let stars_sel = Selector::parse(".social-count").unwrap();
        let lang_sel = Selector::parse(r#"[itemprop="programmingLanguage"]"#).unwrap();

        let mut repos = Vec::new();
        for article in document.select(&article_sel) {
            let title = article
                .select(&title_sel)
                .next()
                .map(|t| {
                    escape_markup_tokens(
                        &collapse_whitespace(&t.text().collect::<String>()).replace(" / ", "/"),
                    )
                })
                .unwrap_or_default();
            let link = article
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(join_github)
                .unwrap_or_default();
            if title.is_empty() || link.is_empty() {
                continue;
            }
            let description = article
                .select(&desc_sel)
                .next()
                .map(|p| escape_markup_tokens(&collapse_whitespace(&p.text().collect::<String>())))
                .unwrap_or_default();
            let language = article
                .select(&lang_sel)
                .next()
                .map(|l| collapse_whitespace(&l.text().collect::<String>()))
                .unwrap_or_default();
            let stars = article
                .select(&stars_sel)
                .next()
                .map(|s| format_count(digits_of(&s.text().collect::<String>())))
                .unwrap_or_default();

            repos.push(TopicRepo {
                title,
                description,
                link,
                language,
                stars,
            });
        }
        repos
    }

    pub fn build_result(repos: &[TopicRepo], top_count: usize) -> SourceResult {
        let render = |r: &TopicRepo| {
            vec![
                format!(
                    "* **[{}]({})** *{} ｜ ⭐️：{}*",
                    r.title, r.link, r.language, r.stars
                ),
                format!("> {}", r.description),
            ]
        };

        let all: Vec<String> = repos.iter().flat_map(render).collect();
        let partial: Vec<String> = repos.iter().take(top_count).flat_map(render).collect();

        SourceResult {
            all: Section::new(ALL_HEADING, all),
            partial: Section::new(format!("## Github 前端专题榜 TOP{top_count}"), partial),
        }
    }
}

#[async_trait]
impl SourceAdapter for GithubTopicAdapter {
    async fn fetch(&self) -> Result<SourceResult> {
        let body = match &self.mode {
            Mode::Fixture(s) => s.clone(),
            Mode::Http { client } => client
                .get(TOPIC_URL)
                .send()
                .await
                .context("github topic get()")?
                .text()
                .await
                .context("github topic .text()")?,
        };
        let t0 = std::time::Instant::now();
        let repos = Self::parse_page(&body);
        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(count = repos.len(), "github topic parsed");
        Ok(Self::build_result(&repos, self.top_count))
    }

    fn name(&self) -> &'static str {
        "github-fe-topic"
    }
}
