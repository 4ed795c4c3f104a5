//! # tattoo-dl
//!
//! Mirror the IPFS-hosted images referenced by a tree of tattoo-record Markdown files.
//!
//! Each Markdown file starts with a front-matter block: a delimiter line (`---`, `+++` or
//! anything else), a TOML body and the same delimiter again. The body describes one tattoo
//! (title, dates, shop, image hashes). For every record the crate creates one output directory
//! named after the tattoo and downloads each referenced image through an HTTP gateway into it.
//!
//! Existing files are never fetched again, so a run over an unchanged tree is a no-op.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use tattoo_dl::{BatchRunner, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         gateway_url: "https://ipfs.io/ipfs/".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let runner = BatchRunner::new(config)?;
//!
//!     // Subscribe to events
//!     let mut events = runner.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let summary = runner.run(Path::new("content/tattoos")).await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Directory walk and per-record pipeline
pub mod batch;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Asset fetching through a content gateway
pub mod fetcher;
/// Front-matter extraction
pub mod frontmatter;
/// Output directory and file naming
pub mod layout;
/// Tattoo record model
pub mod record;
/// Core types (outcomes, summary, events)
pub mod types;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use batch::{BatchRunner, load_record};
pub use config::{Config, PathSanitization};
pub use error::{DecodeError, Error, ExtractError, FetchError, PathError, Result};
pub use fetcher::{AssetBody, AssetFetcher, ContentGateway, HttpGateway};
pub use layout::{OutputLayout, RecordDir};
pub use record::Artwork;
pub use types::{BatchSummary, Event, FetchOutcome};
