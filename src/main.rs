//! tattoo-dl: mirror the images referenced by a tree of tattoo-record Markdown files.
//!
//! Usage:
//! ```text
//! tattoo-dl <content-dir>
//! ```
//!
//! Settings are read from `tattoo-dl.toml` in the working directory when present.
//! Log verbosity follows `RUST_LOG` (default `tattoo_dl=info`).

use std::env::args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tattoo_dl::config::CONFIG_FILE_NAME;
use tattoo_dl::{BatchRunner, Config};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tattoo_dl=info")),
        )
        .with_target(false)
        .init();

    let Some(root) = args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: tattoo-dl <content-dir>");
        return ExitCode::from(2);
    };

    match run(&root).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), error = %e, "batch aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(root: &Path) -> tattoo_dl::Result<()> {
    let config = Config::load_or_default(Path::new(CONFIG_FILE_NAME))?;
    let runner = BatchRunner::new(config)?;
    let summary = runner.run(root).await?;

    println!("{summary}");
    for hash in &summary.failed_hashes {
        println!("failed: {hash}");
    }
    Ok(())
}
