// src/notify/dingtalk.rs
//! DingTalk webhook delivery and the periodic digest broadcast.

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::MarkdownMessage;
use crate::digest::DigestService;

pub const BROADCAST_TITLE: &str = "The BIG BANG FE 🔥 今日读物";

#[derive(Clone)]
pub struct DingTalkNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl DingTalkNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    pub async fn send_markdown(&self, msg: &MarkdownMessage) -> Result<()> {
        let payload = DingTalkPayload::markdown(&msg.title, &msg.text);

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.webhook)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        return Err(anyhow!("DingTalk webhook HTTP error: {e}"));
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(anyhow!("DingTalk webhook request failed: {e}"));
                }
            }
        }
    }
}

#[derive(Serialize)]
struct DingTalkMarkdown {
    title: String,
    text: String,
}

#[derive(Serialize)]
struct DingTalkPayload {
    msgtype: String,
    markdown: DingTalkMarkdown,
}

impl DingTalkPayload {
    fn markdown(title: &str, text: &str) -> Self {
        Self {
            msgtype: "markdown".to_string(),
            markdown: DingTalkMarkdown {
                title: title.to_string(),
                text: text.to_string(),
            },
        }
    }
}

/// Periodically push the full digest to every configured webhook. Per-hook
/// failures are logged and the loop keeps going; the digest TTL makes the
/// repeated `full_digest` calls cheap between refresh windows.
pub fn spawn_digest_broadcast(
    service: Arc<DigestService>,
    webhooks: Vec<String>,
    interval_hours: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(Duration::from_secs(interval_hours.max(1) * 3600));
        loop {
            ticker.tick().await;
            let text = service.full_digest().await;
            for hook in &webhooks {
                tracing::info!(hook = %hook, "digest broadcast");
                let notifier = DingTalkNotifier::new(hook.clone());
                let msg = MarkdownMessage {
                    title: BROADCAST_TITLE.to_string(),
                    text: text.clone(),
                };
                match notifier.send_markdown(&msg).await {
                    Ok(()) => tracing::info!(hook = %hook, "digest broadcast delivered"),
                    Err(e) => tracing::warn!(hook = %hook, error = ?e, "digest broadcast failed"),
                }
            }
        }
    })
}
