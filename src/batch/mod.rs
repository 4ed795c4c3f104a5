//! Batch runner: walk a tree of Markdown files and mirror every referenced asset.
//!
//! For each Markdown file the runner extracts the front matter, decodes the record, resolves
//! its output directory and fetches the primary image followed by `images_ipfs` in order.
//! The pipeline is strictly sequential: one file and one fetch at a time.
//!
//! A file that cannot be read, decoded or placed is logged and skipped; a failed fetch is
//! counted in [`BatchSummary::failed_hashes`]. Only a traversal error (or failure to create
//! the output root) aborts the run.


use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::{AssetFetcher, ContentGateway, HttpGateway};
use crate::frontmatter;
use crate::layout::OutputLayout;
use crate::record::Artwork;
use crate::types::{BatchSummary, Event, FetchOutcome};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Capacity of the event channel; slow subscribers lag rather than block the walk
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Walks a directory tree and fetches the assets of every record found in it
pub struct BatchRunner {
    config: Arc<Config>,
    layout: OutputLayout,
    fetcher: AssetFetcher,
    event_tx: broadcast::Sender<Event>,
}

impl BatchRunner {
    /// Create a runner that fetches from the HTTP gateway named in `config`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid, or [`Error::Network`] if the
    /// HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let gateway = HttpGateway::from_config(&config)?;
        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    /// Create a runner around any [`ContentGateway`]
    pub fn with_gateway(config: Config, gateway: Arc<dyn ContentGateway>) -> Self {
        let layout = OutputLayout::from_config(&config);
        let fetcher = AssetFetcher::new(gateway, config.fetch_timeout);
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            config: Arc::new(config),
            layout,
            fetcher,
            event_tx,
        }
    }

    /// Subscribe to events of subsequent runs
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: Event) {
        // send() only fails when nobody listens
        self.event_tx.send(event).ok();
    }

    /// Process every Markdown file under `root`
    ///
    /// Files are visited in filesystem enumeration order. A symlink to a file is processed
    /// like the file itself; symlinked directories are not descended into.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the output root cannot be created
    /// - [`Error::Traversal`] if a directory under `root` (or `root` itself) cannot be read
    pub async fn run(&self, root: &Path) -> Result<BatchSummary> {
        let output_root = self.layout.root();
        tokio::fs::create_dir_all(output_root).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "failed to create output directory '{}': {}",
                    output_root.display(),
                    e
                ),
            ))
        })?;

        info!(
            root = %root.display(),
            output = %output_root.display(),
            gateway = self.fetcher.gateway_name(),
            "starting batch"
        );

        let mut summary = BatchSummary::default();
        for entry in WalkDir::new(root) {
            let entry = entry?;
            // path().is_file() follows symlinks, file_type() does not
            if !self.is_markdown(entry.path()) || !entry.path().is_file() {
                continue;
            }

            let path = entry.path();
            match self.process_file(path, &mut summary).await {
                Ok(()) => summary.records_processed += 1,
                Err(e) => {
                    warn!(path = %path.display(), code = e.code(), error = %e, "skipping file");
                    summary.records_skipped += 1;
                    self.emit_event(Event::RecordSkipped {
                        path: path.to_path_buf(),
                        code: e.code().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(%summary, "batch finished");
        if summary.has_failures() {
            warn!(hashes = ?summary.failed_hashes, "some assets could not be fetched");
        }
        self.emit_event(Event::Finished {
            summary: summary.clone(),
        });

        Ok(summary)
    }

    /// Case-insensitive suffix match on the file name, so a bare `.md` file counts too
    fn is_markdown(&self, path: &Path) -> bool {
        let suffix = format!(".{}", self.config.markdown_extension.to_ascii_lowercase());
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(&suffix))
    }

    /// Run one file through extract, decode, resolve and fetch
    async fn process_file(&self, path: &Path, summary: &mut BatchSummary) -> Result<()> {
        let artwork = load_record(path).await?;
        let dir = self.layout.record_dir(&artwork)?;

        tokio::fs::create_dir_all(dir.path()).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "failed to create record directory '{}': {}",
                    dir.path().display(),
                    e
                ),
            ))
        })?;

        info!(title = %artwork.title, dir = dir.name(), "processing record");
        if let Ok(json) = serde_json::to_string(&artwork) {
            debug!(record = %json, "decoded record");
        }
        self.emit_event(Event::RecordLoaded {
            path: path.to_path_buf(),
            title: artwork.title.clone(),
        });

        for hash in artwork.asset_hashes() {
            let dest = dir.asset_path(hash);
            let outcome = self.fetcher.fetch(&dest, hash).await;
            summary.record(hash, &outcome);

            self.emit_event(match outcome {
                FetchOutcome::Skipped => Event::AssetSkipped {
                    hash: hash.to_string(),
                    path: dest,
                },
                FetchOutcome::Downloaded { bytes, elapsed } => Event::AssetDownloaded {
                    hash: hash.to_string(),
                    path: dest,
                    bytes,
                    elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                },
                FetchOutcome::Failed(e) => Event::AssetFailed {
                    hash: hash.to_string(),
                    code: e.code().to_string(),
                    reason: e.to_string(),
                },
            });
        }

        Ok(())
    }
}

/// Read a Markdown file and decode its front matter
///
/// Only the front-matter block is read; the Markdown body after the closing delimiter is
/// never loaded.
pub async fn load_record(path: &Path) -> Result<Artwork> {
    let path = path.to_path_buf();
    let raw = tokio::task::spawn_blocking(move || -> Result<String> {
        let file = std::fs::File::open(&path)?;
        Ok(frontmatter::extract(BufReader::new(file))?)
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(e)))??;

    Ok(Artwork::decode(&raw)?)
}
