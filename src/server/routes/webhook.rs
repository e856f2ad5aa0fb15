use crate::db::DEFAULT_RECENT_COUNT;
use crate::server::router::AppState;

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

/// Inbound chat-event payload posted by the chat service.
#[derive(Debug, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    #[serde(default, rename = "event_id")]
    pub id: i64,
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub public_session_id: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub speaker_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub text: String,
}

const COMMAND: &str = "!patches";
const MAX_REPLY_CHARS: usize = 1000;

/// `POST /lingr` — chat webhook. Recognized command messages get a bot reply
/// listing the recent patch names; everything else is ignored. The reply,
/// including its trailing-newline framing, never exceeds 1000 characters.
pub async fn lingr_handler(State(state): State<AppState>, Json(status): Json<Status>) -> Response {
    let mut results = String::new();

    for event in &status.events {
        let Some(message) = &event.message else {
            continue;
        };
        if !is_command(&message.text) {
            continue;
        }
        match state.coordinator.list_recent(DEFAULT_RECENT_COUNT).await {
            Ok(rows) => {
                for row in rows {
                    results.push_str(&row.name);
                    results.push('\n');
                }
            }
            Err(e) => warn!("Webhook query failed: {e}"),
        }
    }

    let reply = clamp_reply(&results);
    if reply.is_empty() {
        return ().into_response();
    }

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("{reply}\n"),
    )
        .into_response()
}

/// The command token must be the entire message.
fn is_command(text: &str) -> bool {
    let mut tokens = text.split_whitespace();
    tokens.next() == Some(COMMAND) && tokens.next().is_none()
}

/// Trims trailing newlines, then caps the reply at 999 characters so the
/// framing newline keeps the full response at 1000 or less.
fn clamp_reply(results: &str) -> String {
    let trimmed = results.trim_end_matches('\n');
    if trimmed.chars().count() >= MAX_REPLY_CHARS {
        trimmed.chars().take(MAX_REPLY_CHARS - 1).collect()
    } else {
        trimmed.to_string()
    }
}
