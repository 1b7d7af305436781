//! fe-daily — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the digest service, routes, metrics,
//! and the webhook broadcast task.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fe_daily::api::{create_router, AppState};
use fe_daily::config::Settings;
use fe_daily::digest::registry::build_registry;
use fe_daily::digest::{DigestService, HttpQuoteProvider};
use fe_daily::metrics::Metrics;
use fe_daily::notify::spawn_digest_broadcast;

const USER_AGENT: &str = concat!("fe-daily/", env!("CARGO_PKG_VERSION"));

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fe_daily=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let settings = Settings::from_env();
    if settings.access_token.is_empty() {
        tracing::warn!("CRAWLER_ACCESS_TOKEN is empty; the API is effectively open");
    }

    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    let registry = build_registry(&settings, &client);
    tracing::info!(
        sources = registry.len(),
        ttl_hours = settings.ttl_hours,
        "source registry built"
    );

    let service = Arc::new(DigestService::new(
        registry,
        settings.ttl_hours,
        Arc::new(HttpQuoteProvider::new(client.clone())),
    ));

    let metrics = Metrics::init(settings.ttl_hours as u64);

    if !settings.webhooks.is_empty() {
        spawn_digest_broadcast(
            Arc::clone(&service),
            settings.webhooks.clone(),
            settings.ttl_hours as u64,
        );
    }

    let state = AppState {
        digest: service,
        access_token: settings.access_token.clone(),
    };
    let router = create_router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", settings.port)).await?;
    tracing::info!(port = settings.port, "fe-daily listening");
    axum::serve(listener, router).await?;

    Ok(())
}
