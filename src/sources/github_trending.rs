// src/sources/github_trending.rs
//! GitHub daily trending for TypeScript and JavaScript.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use scraper::{Html, Selector};

use crate::digest::types::{Section, SourceAdapter, SourceResult};
use crate::sources::github_topic::join_github;
use crate::sources::{collapse_whitespace, digits_of, escape_markup_tokens, format_count};

const ALL_HEADING: &str = "## Github TS/JS 今日流行趋势";
const LANGUAGES: [&str; 2] = ["Typescript", "Javascript"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingRepo {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub stars: String,
    pub forks: String,
    pub today_stars: String,
}

enum Mode {
    /// One captured page per language, in `LANGUAGES` order.
    Fixture { pages: Vec<String> },
    Http { client: reqwest::Client },
}

pub struct GithubTrendingAdapter {
    mode: Mode,
    top_count: usize,
}

impl GithubTrendingAdapter {
    pub fn over_http(client: reqwest::Client, top_count: usize) -> Self {
        Self {
            mode: Mode::Http { client },
            top_count,
        }
    }

    pub fn from_fixtures(typescript: &str, javascript: &str, top_count: usize) -> Self {
        Self {
            mode: Mode::Fixture {
                pages: vec![typescript.to_string(), javascript.to_string()],
            },
            top_count,
        }
    }

    pub fn parse_page(html: &str, language: &str) -> Vec<TrendingRepo> {
        let document = Html::parse_document(html);
        let row_sel = Selector::parse(".Box-row").unwrap();
        let title_sel = Selector::parse("h2 a").unwrap();
        let desc_sel = Selector::parse("p").unwrap();
        let stars_sel = Selector::parse(r#"a[href$="/stargazers"]"#).unwrap();
        let forks_sel = Selector::parse(r#"a[href$="/forks"]"#).unwrap();
        let today_sel = Selector::parse("span.float-sm-right").unwrap();

        let mut repos = Vec::new();
        for row in document.select(&row_sel) {
            let Some(title_el) = row.select(&title_sel).next() else {
                continue;
            };
            let Some(link) = title_el.value().attr("href").and_then(join_github) else {
                continue;
            };
            let title = escape_markup_tokens(
                &collapse_whitespace(&title_el.text().collect::<String>()).replace(" / ", "/"),
            );
            let description = row
                .select(&desc_sel)
                .next()
                .map(|p| escape_markup_tokens(&collapse_whitespace(&p.text().collect::<String>())))
                .unwrap_or_default();
            let count_text = |sel: &Selector| {
                row.select(sel)
                    .next()
                    .map(|el| format_count(digits_of(&el.text().collect::<String>())))
                    .unwrap_or_default()
            };

            repos.push(TrendingRepo {
                title,
                description,
                link,
                language: language.to_string(),
                stars: count_text(&stars_sel),
                forks: count_text(&forks_sel),
                today_stars: count_text(&today_sel),
            });
        }
        repos
    }

    /// `pages` holds one repo list per language, in `LANGUAGES` order. The
    /// composite keeps that order; `partial` takes the top N of each.
    pub fn build_result(pages: &[Vec<TrendingRepo>], top_count: usize) -> SourceResult {
        let full = |r: &TrendingRepo| {
            vec![
                format!(
                    "* **[{}]({})** *{} ｜ fork：{} | ⭐️：{} | 今日 ⭐️：{}*",
                    r.title, r.link, r.language, r.forks, r.stars, r.today_stars
                ),
                format!("> {}", r.description),
            ]
        };
        let brief = |r: &TrendingRepo| {
            vec![
                format!("* **[{}]({})** *{}*", r.title, r.link, r.language),
                format!("> {}", r.description),
            ]
        };

        let all: Vec<String> = pages.iter().flatten().flat_map(full).collect();
        let partial: Vec<String> = pages
            .iter()
            .flat_map(|page| page.iter().take(top_count))
            .flat_map(brief)
            .collect();

        SourceResult {
            all: Section::new(ALL_HEADING, all),
            partial: Section::new(
                format!("## Github TS TOP {top_count}/JS TOP {top_count} 今日流行趋势"),
                partial,
            ),
        }
    }
}

#[async_trait]
impl SourceAdapter for GithubTrendingAdapter {
    async fn fetch(&self) -> Result<SourceResult> {
        let mut pages = Vec::with_capacity(LANGUAGES.len());
        match &self.mode {
            Mode::Fixture { pages: bodies } => {
                for (body, language) in bodies.iter().zip(LANGUAGES) {
                    pages.push(Self::parse_page(body, language));
                }
            }
            Mode::Http { client } => {
                for language in LANGUAGES {
                    let url = format!(
                        "https://github.com/trending/{}?since=daily",
                        language.to_lowercase()
                    );
                    let body = client
                        .get(&url)
                        .send()
                        .await
                        .with_context(|| format!("github trending get() {language}"))?
                        .text()
                        .await
                        .context("github trending .text()")?;
                    let t0 = std::time::Instant::now();
                    let repos = Self::parse_page(&body, language);
                    histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                    tracing::debug!(language, count = repos.len(), "github trending parsed");
                    pages.push(repos);
                }
            }
        }
        Ok(Self::build_result(&pages, self.top_count))
    }

    fn name(&self) -> &'static str {
        "github-trending"
    }
}
