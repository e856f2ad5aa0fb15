use serde::{Deserialize, Serialize};
use url::Url;

/// Shape of the upstream changelog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// HTML page carrying a fixed-column patch table inside a `<pre>` block.
    #[default]
    Listing,
    /// Atom/RSS feed whose entry bodies start with a `patch ...` banner line.
    Feed,
}

/// Upstream source configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Changelog page or feed to scrape. Also used as the link base for
    /// records served back out.
    /// TOML: `source.url`.
    #[serde(default = "default_source_url")]
    pub url: Url,

    /// TOML: `source.format`. Default: `listing`.
    #[serde(default)]
    pub format: SourceFormat,

    /// Minutes between scheduled scrape cycles.
    /// TOML: `source.interval_minutes`. Default: `10`.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Channel title for the published RSS document.
    /// TOML: `source.feed_title`. Default: `vim patches`.
    #[serde(default = "default_feed_title")]
    pub feed_title: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            format: SourceFormat::default(),
            interval_minutes: default_interval_minutes(),
            feed_title: default_feed_title(),
        }
    }
}

fn default_source_url() -> Url {
    Url::parse("http://ftp.vim.org/vim/patches/7.4/").expect("valid default source url")
}

fn default_interval_minutes() -> u64 {
    10
}

fn default_feed_title() -> String {
    "vim patches".to_string()
}
