// src/digest/mod.rs
//! The aggregation cache: registry, TTL cache + refresh engine, day-quote
//! cache, composer, and hint resolver, owned together by `DigestService`.

pub mod cache;
pub mod compose;
pub mod hint;
pub mod quote;
pub mod registry;
pub mod types;

use std::sync::Arc;

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::digest::cache::DigestCache;
use crate::digest::hint::NO_RELATED;
use crate::digest::quote::DayQuoteCache;
use crate::digest::registry::RegisteredSource;
use crate::digest::types::QuoteProvider;

pub use crate::digest::quote::HttpQuoteProvider;
pub use crate::digest::types::{QuoteOfDay, Section, SourceAdapter, SourceResult};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_fetch_total", "Successful source fetches committed.");
        describe_counter!(
            "digest_fetch_errors_total",
            "Source fetches that failed; previous cache value kept."
        );
        describe_counter!(
            "digest_cache_hits_total",
            "Entries served from cache instead of refetched."
        );
        describe_histogram!("source_parse_ms", "Source body parse time in milliseconds.");
    });
}

/// Owns the registry and both caches; constructed once at startup and handed
/// to whatever serves requests. No global state.
pub struct DigestService {
    registry: Vec<RegisteredSource>,
    cache: DigestCache,
    day_quote: DayQuoteCache,
    quote_provider: Arc<dyn QuoteProvider>,
}

impl DigestService {
    pub fn new(
        registry: Vec<RegisteredSource>,
        ttl_hours: i64,
        quote_provider: Arc<dyn QuoteProvider>,
    ) -> Self {
        ensure_metrics_described();
        let cache = DigestCache::new(&registry, ttl_hours);
        Self {
            registry,
            cache,
            day_quote: DayQuoteCache::new(ttl_hours),
            quote_provider,
        }
    }

    pub fn registry(&self) -> &[RegisteredSource] {
        &self.registry
    }

    /// Refresh every stale source plus the day quote, then compose the
    /// composite digest. Never fails: broken sources and a broken quote
    /// provider only reduce the content.
    pub async fn full_digest(&self) -> String {
        self.cache.refresh_all(&self.registry).await;
        let today = self.day_quote.today(self.quote_provider.as_ref()).await;
        let entries = self.cache.snapshot().await;
        let (total, text) = compose::compose_digest(&entries, &today);
        tracing::info!(total, "digest composed");
        text
    }

    /// Resolve a free-text hint to one source, refresh only that source, and
    /// return its full (unfiltered) content. No match gets the fixed
    /// no-related-material reply.
    pub async fn digest_for_hint(&self, hint: &str) -> String {
        let Some(source) = hint::resolve_source(&self.registry, hint) else {
            tracing::info!(hint, "no source matched hint");
            return NO_RELATED.to_string();
        };
        let name = source.name;
        tracing::info!(hint, source = name, "hint resolved");
        self.cache.refresh_one(&self.registry, name).await;
        let entries = self.cache.snapshot().await;
        compose::compose_single(entries.iter().find(|e| e.name == name))
    }
}
