// src/digest/quote.rs
//! Quote-of-the-day cache, independent from the per-source entries but under
//! the same TTL. Provider failure degrades to an empty quote line; the image
//! seed is still regenerated from the current date so the greeting image stays
//! stable for a whole day.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};
use tokio::sync::RwLock;

use crate::digest::types::{QuoteOfDay, QuoteProvider};

const QOD_URL: &str = "https://quotes.rest/qod";

/// Display timezone for the digest (UTC+8).
pub fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("valid fixed offset")
}

/// What the composer needs for the digest header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayInfo {
    pub display_time: String,
    pub quote: String,
    pub author: String,
    pub image_url: String,
}

#[derive(Debug, Default)]
struct DayQuoteState {
    fetched_at: Option<DateTime<Utc>>,
    seed: String,
    quote: String,
    author: String,
}

pub struct DayQuoteCache {
    state: RwLock<DayQuoteState>,
    ttl: Duration,
}

impl DayQuoteCache {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            state: RwLock::new(DayQuoteState::default()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub async fn today(&self, provider: &dyn QuoteProvider) -> TodayInfo {
        self.today_at(provider, Utc::now()).await
    }

    /// Clock-injected variant. Same staleness rule as source entries.
    pub async fn today_at(&self, provider: &dyn QuoteProvider, now: DateTime<Utc>) -> TodayInfo {
        let needs_refresh = {
            let s = self.state.read().await;
            match s.fetched_at {
                None => true,
                Some(t) => now > t + self.ttl,
            }
        };

        if needs_refresh {
            tracing::debug!("day quote stale, fetching from remote");
            let local = now.with_timezone(&display_offset());
            // Month is zero-based in the seed; only per-day determinism matters.
            let seed = format!("{}-{}-{}", local.year(), local.month0(), local.day());
            let fetched = provider.fetch_quote().await;

            let mut s = self.state.write().await;
            s.fetched_at = Some(now);
            s.seed = seed;
            match fetched {
                Ok(q) => {
                    s.quote = q.quote;
                    s.author = q.author;
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "quote provider failed, digest will omit the quote line");
                    s.quote.clear();
                    s.author.clear();
                }
            }
        } else {
            tracing::debug!("day quote served from cache");
        }

        let s = self.state.read().await;
        let shown = s.fetched_at.unwrap_or(now).with_timezone(&display_offset());
        TodayInfo {
            display_time: shown.format("%H:%M:%S").to_string(),
            quote: s.quote.clone(),
            author: s.author.clone(),
            image_url: format!("https://picsum.photos/seed/{}/200/300", s.seed),
        }
    }
}

// ---- HTTP provider (quotes.rest) ----

#[derive(serde::Deserialize)]
struct QodResponse {
    contents: QodContents,
}

#[derive(serde::Deserialize)]
struct QodContents {
    quotes: Vec<QuoteOfDay>,
}

pub struct HttpQuoteProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpQuoteProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            url: QOD_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn parse(body: &str) -> Result<QuoteOfDay> {
        let res: QodResponse = serde_json::from_str(body).context("parsing qod json")?;
        match res.contents.quotes.into_iter().next() {
            Some(q) => Ok(q),
            None => bail!("qod response contained no quotes"),
        }
    }
}

#[async_trait::async_trait]
impl QuoteProvider for HttpQuoteProvider {
    async fn fetch_quote(&self) -> Result<QuoteOfDay> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("qod get()")?
            .text()
            .await
            .context("qod .text()")?;
        Self::parse(&body)
    }
}
