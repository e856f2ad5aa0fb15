use crate::error::PatchwatchError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Boundary to the remote changelog source. Implemented over HTTP in
/// production; tests substitute fixture fetchers.
#[async_trait]
pub trait SourceFetcher: Send + Sync + 'static {
    async fn fetch(&self) -> Result<String, PatchwatchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    url: Url,
}

impl HttpFetcher {
    pub fn new(url: Url) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("patchwatch/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self { client, url }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String, PatchwatchError> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        require_body(&self.url, resp.text().await?)
    }
}

/// A 200 with nothing in it is a broken source, not a valid empty changelog.
fn require_body(url: &Url, body: String) -> Result<String, PatchwatchError> {
    if body.trim().is_empty() {
        return Err(PatchwatchError::SourceFormat(format!(
            "empty response body from {url}"
        )));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_upstream_body_is_rejected() {
        let url = Url::parse("http://example.com/patches/").unwrap();
        assert!(require_body(&url, String::new()).is_err());
        assert!(require_body(&url, "  \n ".to_string()).is_err());
        assert_eq!(require_body(&url, "body".to_string()).unwrap(), "body");
    }
}
