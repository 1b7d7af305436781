// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod digest;
pub mod metrics;
pub mod notify;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::Settings;
pub use crate::digest::registry::build_registry;
pub use crate::digest::{DigestService, HttpQuoteProvider};
pub use crate::notify::{spawn_digest_broadcast, DingTalkNotifier, MarkdownMessage};
