//! Content gateways resolve a hash to a readable body.

use crate::config::Config;
use crate::error::{Error, FetchError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::debug;

/// Body of a fetched asset, streamed into the destination file
pub type AssetBody = Box<dyn AsyncRead + Send + Unpin>;

/// Source of asset bytes addressed by content hash
///
/// The fetcher handles existence checks, timeouts and file writes; a gateway only turns a
/// hash into a body or a [`FetchError`].
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Start fetching `hash`, returning its body once the source has accepted the request
    async fn open(&self, hash: &str) -> std::result::Result<AssetBody, FetchError>;

    /// Human-readable name for logging
    fn name(&self) -> &str;
}

/// HTTP gateway (e.g. `https://ipfs.io/ipfs/`) that serves assets at `<base>/<hash>`
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Create a gateway for `base_url` whose requests give up after `timeout`
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a gateway from the `gateway_url`, `fetch_timeout` and `user_agent` settings
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.gateway_url, config.fetch_timeout, &config.user_agent)
    }

    /// URL of `hash` on this gateway
    pub fn url_for(&self, hash: &str) -> String {
        format!("{}/{}", self.base_url, hash)
    }
}

#[async_trait]
impl ContentGateway for HttpGateway {
    async fn open(&self, hash: &str) -> std::result::Result<AssetBody, FetchError> {
        let url = self.url_for(hash);
        debug!(%url, "requesting asset");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        after: self.timeout,
                    }
                } else {
                    FetchError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::new(StreamReader::new(Box::pin(stream))))
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}

/// Whether an I/O error raised while streaming a body was a client-side timeout
pub(crate) fn is_body_timeout(e: &std::io::Error) -> bool {
    e.get_ref()
        .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
        .is_some_and(reqwest::Error::is_timeout)
}
