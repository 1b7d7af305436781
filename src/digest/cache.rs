// src/digest/cache.rs
//! Per-source TTL cache and the refresh engine.
//!
//! One `CacheEntry` per registered source, recreated at startup with no
//! content. Entries are only written by the refresh methods here; readers get
//! cloned snapshots. Staleness check and fetch dispatch are two separate steps
//! with an awaited gap between them, so two overlapping refresh calls may both
//! fetch the same source. That duplicate fetch is accepted; commits are
//! whole-value replacement, so the cache never ends up half-written.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinSet;

use crate::digest::registry::RegisteredSource;
use crate::digest::types::{SourceAdapter, SourceResult};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub name: &'static str,
    pub result: Option<SourceResult>,
    pub fetched_at: Option<DateTime<Utc>>,
}

pub struct DigestCache {
    entries: RwLock<Vec<CacheEntry>>,
    ttl: Duration,
}

impl DigestCache {
    /// One absent entry per registered source, in registry order.
    pub fn new(registry: &[RegisteredSource], ttl_hours: i64) -> Self {
        let entries = registry
            .iter()
            .map(|s| CacheEntry {
                name: s.name,
                result: None,
                fetched_at: None,
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Re-evaluate every entry and refetch the stale ones concurrently.
    /// Returns once every triggered fetch has settled.
    pub async fn refresh_all(&self, registry: &[RegisteredSource]) {
        self.refresh_at(registry, None, Utc::now()).await;
    }

    /// Same staleness rule, restricted to one named entry. Every other entry
    /// is left exactly as it is. An unknown name matches nothing and is a
    /// no-op.
    pub async fn refresh_one(&self, registry: &[RegisteredSource], name: &str) {
        self.refresh_at(registry, Some(name), Utc::now()).await;
    }

    /// Clock-injected refresh; `only = None` means every entry.
    pub async fn refresh_at(
        &self,
        registry: &[RegisteredSource],
        only: Option<&str>,
        now: DateTime<Utc>,
    ) {
        // Step 1: decide which entries are stale. The read guard is dropped
        // before any fetch runs.
        let stale: Vec<(usize, Arc<dyn SourceAdapter>)> = {
            let entries = self.entries.read().await;
            registry
                .iter()
                .enumerate()
                .filter(|(_, s)| only.is_none_or(|n| n == s.name))
                .filter(|(idx, s)| {
                    if is_stale(entries[*idx].fetched_at, now, self.ttl) {
                        tracing::debug!(source = s.name, "stale, fetching from remote");
                        true
                    } else {
                        tracing::debug!(source = s.name, "fresh, serving from cache");
                        counter!("digest_cache_hits_total").increment(1);
                        false
                    }
                })
                .map(|(idx, s)| (idx, Arc::clone(&s.adapter)))
                .collect()
        };

        if stale.is_empty() {
            return;
        }

        // Step 2: fan out and join all fetches.
        let mut set = JoinSet::new();
        for (idx, adapter) in stale {
            set.spawn(async move {
                let name = adapter.name();
                (idx, name, adapter.fetch().await)
            });
        }

        let mut settled = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => settled.push(outcome),
                Err(e) => tracing::warn!(error = ?e, "source fetch task panicked"),
            }
        }

        // Step 3: commit. A failed fetch keeps the previous value (possibly
        // absent) and only logs; other sources are unaffected.
        let mut entries = self.entries.write().await;
        for (idx, name, outcome) in settled {
            match outcome {
                Ok(result) => {
                    counter!("digest_fetch_total").increment(1);
                    entries[idx].result = Some(result);
                    entries[idx].fetched_at = Some(now);
                }
                Err(e) => {
                    counter!("digest_fetch_errors_total").increment(1);
                    tracing::warn!(source = name, error = ?e, "source fetch failed, keeping previous value");
                }
            }
        }
    }

    /// Cloned view of the entries, in registry order.
    pub async fn snapshot(&self) -> Vec<CacheEntry> {
        self.entries.read().await.clone()
    }
}

fn is_stale(fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match fetched_at {
        None => true,
        Some(t) => now > t + ttl,
    }
}
