use crate::db::recent_count;
use crate::error::PatchwatchError;
use crate::server::router::AppState;
use crate::server::rss;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Caller-supplied row bound; invalid values fall back to the default.
    pub count: Option<String>,
    /// JSONP callback name for script-tag consumption.
    pub callback: Option<String>,
}

/// Wire shape of one served patch record. Field names are kept stable for
/// existing feed consumers.
#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

async fn feed_items(
    state: &AppState,
    count: Option<&str>,
) -> Result<Vec<FeedItem>, PatchwatchError> {
    let n = recent_count(count);
    let rows = state.coordinator.list_recent(n).await?;

    Ok(rows
        .into_iter()
        .map(|row| FeedItem {
            link: format!("{}{}", state.source_url, row.name),
            id: row.name.clone(),
            title: row.name,
            description: row.title,
            created_at: row.created_at,
        })
        .collect())
}

/// `GET /patches` — stored records rendered as an RSS 2.0 document.
pub async fn feed_handler(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Response, PatchwatchError> {
    let items = feed_items(&state, query.count.as_deref()).await?;
    let body = rss::render_feed(&state.feed_title, &state.source_url, &items);

    Ok(([(header::CONTENT_TYPE, "application/rss+xml")], body).into_response())
}

/// `GET /patches/json` — the same records as a JSON array, optionally wrapped
/// in a caller-supplied callback.
pub async fn json_handler(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Response, PatchwatchError> {
    let items = feed_items(&state, query.count.as_deref()).await?;
    let body = serde_json::to_string(&items)?;

    let body = match query.callback.as_deref() {
        Some(cb) if !cb.is_empty() => format!("{cb}({body})"),
        _ => body,
    };

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// `GET /patches/pull` — manual refresh trigger. Always acknowledges with
/// success; per-record failures are logged inside the cycle and callers
/// cannot distinguish them from duplicates.
pub async fn pull_handler(State(state): State<AppState>) -> Response {
    match state.coordinator.refresh().await {
        Ok(stats) => info!(
            inserted = stats.inserted,
            duplicates = stats.duplicates,
            failures = stats.failures,
            "Manual scrape cycle finished"
        ),
        Err(e) => warn!("Manual scrape cycle failed: {e}"),
    }

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("OK: {}", state.source_url),
    )
        .into_response()
}
