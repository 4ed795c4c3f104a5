//! Asset fetching with skip-if-exists semantics.
//!
//! [`AssetFetcher::fetch`] resolves one content hash into one file:
//! - an existing destination is never re-fetched, whatever its content
//! - the request and the body copy share one timeout
//! - a copy that fails or times out removes the partial file, so a later run retries it
//! - errors are returned as [`FetchOutcome::Failed`], never raised, so one bad hash cannot
//!   stop a batch
//!
//! The hash is only a lookup key; fetched bytes are not verified against it.

mod gateway;


pub use gateway::{AssetBody, ContentGateway, HttpGateway};

use crate::error::FetchError;
use crate::types::FetchOutcome;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Fetches content hashes from a [`ContentGateway`] into files
#[derive(Clone)]
pub struct AssetFetcher {
    gateway: Arc<dyn ContentGateway>,
    timeout: Duration,
}

impl AssetFetcher {
    /// Create a fetcher whose fetches give up after `timeout`
    pub fn new(gateway: Arc<dyn ContentGateway>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// Name of the underlying gateway
    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Fetch `hash` into `dest` unless `dest` already exists
    pub async fn fetch(&self, dest: &Path, hash: &str) -> FetchOutcome {
        match tokio::fs::symlink_metadata(dest).await {
            Ok(_) => {
                info!(hash, path = %dest.display(), "file already exists, skipping");
                return FetchOutcome::Skipped;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(hash, path = %dest.display(), error = %e, "cannot check destination");
                return FetchOutcome::Failed(write_failed(dest, &e));
            }
        }

        let started = Instant::now();
        match self.transfer(dest, hash).await {
            Ok(Some(bytes)) => {
                let elapsed = started.elapsed();
                info!(hash, bytes, ?elapsed, "downloaded {}", hash);
                FetchOutcome::Downloaded { bytes, elapsed }
            }
            Ok(None) => {
                info!(hash, path = %dest.display(), "file appeared during fetch, skipping");
                FetchOutcome::Skipped
            }
            Err(e) => {
                warn!(hash, gateway = self.gateway.name(), error = %e, "fetch failed");
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Request the body and stream it into a newly created `dest`
    ///
    /// Returns `Ok(None)` if `dest` was created by someone else in the meantime.
    async fn transfer(&self, dest: &Path, hash: &str) -> Result<Option<u64>, FetchError> {
        let deadline = tokio::time::Instant::now() + self.timeout;

        let mut body = tokio::time::timeout_at(deadline, self.gateway.open(hash))
            .await
            .map_err(|_| self.timed_out())??;

        // create_new turns the existence check above into an atomic claim on the path
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(write_failed(dest, &e)),
        };

        let copied = tokio::time::timeout_at(deadline, async {
            let bytes = tokio::io::copy(&mut body, &mut file).await?;
            file.flush().await?;
            Ok::<_, std::io::Error>(bytes)
        })
        .await;
        drop(file);

        match copied {
            Ok(Ok(bytes)) => Ok(Some(bytes)),
            Ok(Err(e)) => {
                discard_partial(dest).await;
                if gateway::is_body_timeout(&e) {
                    Err(self.timed_out())
                } else {
                    Err(write_failed(dest, &e))
                }
            }
            Err(_) => {
                discard_partial(dest).await;
                Err(self.timed_out())
            }
        }
    }

    fn timed_out(&self) -> FetchError {
        FetchError::Timeout {
            after: self.timeout,
        }
    }
}

fn write_failed(dest: &Path, e: &std::io::Error) -> FetchError {
    FetchError::WriteFailed {
        path: dest.to_path_buf(),
        reason: e.to_string(),
    }
}

async fn discard_partial(dest: &Path) {
    match tokio::fs::remove_file(dest).await {
        Ok(()) => debug!(path = %dest.display(), "removed partial file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %dest.display(), error = %e, "failed to remove partial file"),
    }
}
