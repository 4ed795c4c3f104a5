//! Core types for tattoo-dl

use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Result of fetching one content hash
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already existed; no network call was made
    Skipped,
    /// The asset was written to its destination
    Downloaded {
        /// Bytes written
        bytes: u64,
        /// Wall time from request to completed write
        elapsed: Duration,
    },
    /// The fetch failed; no file is left at the destination
    Failed(FetchError),
}

/// Counters accumulated over one batch run
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Markdown files whose record produced an output directory
    pub records_processed: u64,
    /// Markdown files skipped because extraction, decoding or path resolution failed
    pub records_skipped: u64,
    /// Assets fetched during this run
    pub downloaded: u64,
    /// Assets already present at their destination
    pub existing: u64,
    /// Bytes written during this run
    pub bytes_downloaded: u64,
    /// Hashes whose fetch failed, in the order they were attempted
    pub failed_hashes: Vec<String>,
}

impl BatchSummary {
    /// Fold one fetch outcome into the counters
    pub fn record(&mut self, hash: &str, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Skipped => self.existing += 1,
            FetchOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            FetchOutcome::Failed(_) => self.failed_hashes.push(hash.to_string()),
        }
    }

    /// Number of failed fetches
    pub fn failed(&self) -> u64 {
        self.failed_hashes.len() as u64
    }

    /// Every asset reference seen during the run
    pub fn total_assets(&self) -> u64 {
        self.downloaded + self.existing + self.failed()
    }

    /// Whether at least one fetch failed
    pub fn has_failures(&self) -> bool {
        !self.failed_hashes.is_empty()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "downloaded: {}, existing: {}, failed: {} ({} records, {} skipped, {} bytes)",
            self.downloaded,
            self.existing,
            self.failed(),
            self.records_processed,
            self.records_skipped,
            self.bytes_downloaded
        )
    }
}

/// Event emitted while a batch runs
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A record was decoded and its output directory is ready
    RecordLoaded {
        /// Source Markdown file
        path: PathBuf,
        /// Record title
        title: String,
    },

    /// A Markdown file was skipped
    RecordSkipped {
        /// Source Markdown file
        path: PathBuf,
        /// Machine-readable error code
        code: String,
        /// Error message
        reason: String,
    },

    /// An asset was already on disk
    AssetSkipped {
        /// Content hash
        hash: String,
        /// Existing destination
        path: PathBuf,
    },

    /// An asset was fetched
    AssetDownloaded {
        /// Content hash
        hash: String,
        /// Destination written
        path: PathBuf,
        /// Bytes written
        bytes: u64,
        /// Elapsed milliseconds
        elapsed_ms: u64,
    },

    /// An asset fetch failed
    AssetFailed {
        /// Content hash
        hash: String,
        /// Machine-readable error code
        code: String,
        /// Error message
        reason: String,
    },

    /// The walk completed
    Finished {
        /// Final counters
        summary: BatchSummary,
    },
}
