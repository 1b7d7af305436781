// src/api.rs
//! Thin route layer over `DigestService`: token check, format selection,
//! nothing else. The core never returns errors, so neither do these handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::digest::DigestService;
use crate::notify::dingtalk::BROADCAST_TITLE;

#[derive(Clone)]
pub struct AppState {
    pub digest: Arc<DigestService>,
    pub access_token: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/fe-daily", get(fe_daily))
        .route("/api/fe-daily/ask", get(fe_daily_ask))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Response envelope for `format=dingTalk`, shaped for outgoing-bot replies.
#[derive(serde::Serialize)]
struct DingTalkEnvelope {
    success: bool,
    #[serde(rename = "errorCode")]
    error_code: u16,
    #[serde(rename = "errorMsg")]
    error_msg: String,
    fields: DingTalkFields,
}

#[derive(serde::Serialize)]
struct DingTalkFields {
    #[serde(rename = "msgType")]
    msg_type: String,
    title: String,
    text: String,
    #[serde(rename = "isAtAll")]
    is_at_all: bool,
}

fn authorized(state: &AppState, q: &HashMap<String, String>) -> bool {
    q.get("accessToken").map(String::as_str) == Some(state.access_token.as_str())
}

fn dingtalk_envelope(text: String) -> Json<DingTalkEnvelope> {
    Json(DingTalkEnvelope {
        success: true,
        error_code: 200,
        error_msg: String::new(),
        fields: DingTalkFields {
            msg_type: "markdown".to_string(),
            title: BROADCAST_TITLE.to_string(),
            text,
            is_at_all: false,
        },
    })
}

async fn fe_daily(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&state, &q) {
        return (StatusCode::UNAUTHORIZED, "Invalid accessToken").into_response();
    }

    let text = state.digest.full_digest().await;
    if q.get("format").map(String::as_str) == Some("dingTalk") {
        return dingtalk_envelope(text).into_response();
    }
    text.into_response()
}

async fn fe_daily_ask(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&state, &q) {
        return (StatusCode::UNAUTHORIZED, "Invalid accessToken").into_response();
    }

    let hint = q.get("hint").map(String::as_str).unwrap_or_default();
    let text = state.digest.digest_for_hint(hint).await;
    if q.get("format").map(String::as_str) == Some("dingTalk") {
        return dingtalk_envelope(text).into_response();
    }
    text.into_response()
}
