//! Record fixtures and workspace helpers

use std::path::{Path, PathBuf};
use std::time::Duration;
use tattoo_dl::Config;
use tempfile::TempDir;

/// Koi record in YAML-style fences with a TOML body
pub const KOI_RECORD: &str = r#"---
title = "Koi"
tattoodate = "2020-05-01"
made_at_shop = "InkHouse"
image_ipfs = "Qm123"
images_ipfs = ["Qm456"]
---

Koi fish on the forearm.
"#;

/// Directory the Koi record resolves to
pub const KOI_DIR: &str = "2020.05.01 - Koi @InkHouse";

/// Record whose only image the gateway does not have
pub const MISSING_IMAGE_RECORD: &str = r#"+++
title = "Rose"
date = 2021-02-03
made_at_shop = "Thorn"
image_ipfs = "QmGone"
+++
"#;

/// Directory the Rose record resolves to
pub const ROSE_DIR: &str = "2021.02.03 - Rose @Thorn";

/// Input and output directories inside one temporary root
pub struct Workspace {
    _temp: TempDir,
    /// Directory scanned for Markdown files
    pub input: PathBuf,
    /// Output root
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("content");
        let output = temp.path().join("output");
        std::fs::create_dir_all(&input).unwrap();
        Self {
            _temp: temp,
            input,
            output,
        }
    }

    /// Config pointing at `gateway_uri`'s `/ipfs/` path and this workspace's output root
    pub fn config(&self, gateway_uri: &str) -> Config {
        Config {
            gateway_url: format!("{gateway_uri}/ipfs/"),
            output_dir: self.output.clone(),
            fetch_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.input.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Path of an asset inside the record directory `dir`
    pub fn asset(&self, dir: &str, hash: &str) -> PathBuf {
        self.output.join(dir).join(format!("{dir}{hash}.jpg"))
    }
}

pub fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}
