use serde::{Deserialize, Serialize};
use url::Url;

/// Chat notification configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Chat-room "say" endpoint.
    /// TOML: `notify.say_url`. Default: the Lingr say API.
    #[serde(default = "default_say_url")]
    pub say_url: Url,

    /// Room to post into.
    /// TOML: `notify.room`. Default: `vim`.
    #[serde(default = "default_room")]
    pub room: String,

    /// Bot identifier the verifier is derived from.
    /// TOML: `notify.bot`. Default: `vim_jp`.
    #[serde(default = "default_bot")]
    pub bot: String,

    /// Shared bot secret. Leaving it empty disables notifications.
    /// TOML: `notify.secret`.
    #[serde(default)]
    pub secret: String,
}

impl NotifyConfig {
    pub fn enabled(&self) -> bool {
        !self.secret.trim().is_empty()
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            say_url: default_say_url(),
            room: default_room(),
            bot: default_bot(),
            secret: String::new(),
        }
    }
}

fn default_say_url() -> Url {
    Url::parse("http://lingr.com/api/room/say").expect("valid default say url")
}

fn default_room() -> String {
    "vim".to_string()
}

fn default_bot() -> String {
    "vim_jp".to_string()
}
