//! Shared test helpers: an in-memory gateway and Markdown fixtures.

use crate::error::FetchError;
use crate::fetcher::{AssetBody, ContentGateway};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

enum StubAsset {
    Bytes(Vec<u8>),
    Stream(Option<AssetBody>),
    Fail(FetchError),
    Stall(Duration),
}

/// Gateway that serves canned assets and records every requested hash.
///
/// Unknown hashes answer with HTTP 404.
#[derive(Default)]
pub(crate) struct StubGateway {
    assets: Mutex<HashMap<String, StubAsset>>,
    requests: Mutex<Vec<String>>,
}

impl StubGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_asset(self, hash: &str, bytes: &[u8]) -> Self {
        self.insert(hash, StubAsset::Bytes(bytes.to_vec()))
    }

    /// Serve `body` once for `hash`
    pub(crate) fn with_stream(self, hash: &str, body: AssetBody) -> Self {
        self.insert(hash, StubAsset::Stream(Some(body)))
    }

    pub(crate) fn with_failure(self, hash: &str, error: FetchError) -> Self {
        self.insert(hash, StubAsset::Fail(error))
    }

    /// Sleep for `delay` before answering with an empty body
    pub(crate) fn with_stall(self, hash: &str, delay: Duration) -> Self {
        self.insert(hash, StubAsset::Stall(delay))
    }

    fn insert(self, hash: &str, asset: StubAsset) -> Self {
        self.assets.lock().unwrap().insert(hash.to_string(), asset);
        self
    }

    /// Hashes requested so far, in order
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentGateway for StubGateway {
    async fn open(&self, hash: &str) -> Result<AssetBody, FetchError> {
        self.requests.lock().unwrap().push(hash.to_string());

        let delay = {
            let mut assets = self.assets.lock().unwrap();
            match assets.get_mut(hash) {
                Some(StubAsset::Bytes(bytes)) => {
                    return Ok(Box::new(std::io::Cursor::new(bytes.clone())));
                }
                Some(StubAsset::Stream(body)) => {
                    return body
                        .take()
                        .ok_or(FetchError::NonSuccessStatus { status: 410 });
                }
                Some(StubAsset::Fail(error)) => return Err(error.clone()),
                Some(StubAsset::Stall(delay)) => *delay,
                None => return Err(FetchError::NonSuccessStatus { status: 404 }),
            }
        };

        tokio::time::sleep(delay).await;
        Ok(Box::new(std::io::Cursor::new(Vec::new())))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Front matter for a record with the given TOML body, fenced by `+++`
pub(crate) fn front_matter(body: &str) -> String {
    format!("+++\n{}\n+++\n\nSome Markdown body.\n", body.trim())
}

/// Write `contents` to `root/relative`, creating parent directories
pub(crate) fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}
