//! Best-effort chat notifications. One-way sends: transport failures are
//! logged and swallowed, never retried, and never affect persisted state.

use crate::config::NotifyConfig;
use async_trait::async_trait;
use sha1::{Digest, Sha1};
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn notify(&self, text: &str);
}

/// Sink that drops every message. Wired in when no bot secret is configured.
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn notify(&self, _text: &str) {}
}

/// Lingr-style "say" sink: an HTTP GET with room, bot, text, and a
/// shared-secret verifier in the query string. The response is discarded.
pub struct LingrSink {
    client: reqwest::Client,
    cfg: NotifyConfig,
    verifier: String,
}

impl LingrSink {
    pub fn new(cfg: NotifyConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("patchwatch/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        let verifier = bot_verifier(&cfg.bot, &cfg.secret);

        Self {
            client,
            cfg,
            verifier,
        }
    }
}

#[async_trait]
impl NotificationSink for LingrSink {
    async fn notify(&self, text: &str) {
        let request = self.client.get(self.cfg.say_url.clone()).query(&[
            ("room", self.cfg.room.as_str()),
            ("bot", self.cfg.bot.as_str()),
            ("text", text),
            ("bot_verifier", self.verifier.as_str()),
        ]);

        match request.send().await {
            Ok(resp) => debug!(status = %resp.status(), "Notification posted"),
            Err(e) => warn!("Failed to post notification: {e}"),
        }
    }
}

/// `hex(sha1(bot + secret))`, the verifier the say endpoint expects.
fn bot_verifier(bot: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bot.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
