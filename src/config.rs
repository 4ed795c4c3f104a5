//! Configuration types for tattoo-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File the binary loads from the working directory when it exists
pub const CONFIG_FILE_NAME: &str = "tattoo-dl.toml";

/// How directory names derived from record fields are made filesystem-safe
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSanitization {
    /// Replace only `/` with `.` (compatible with existing output trees)
    #[default]
    Separator,
    /// Also replace `\ : * ? " < > |` and control characters with `.`
    Portable,
}

/// Main configuration for a batch run
///
/// Every field has a default, so an empty TOML document is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Content gateway base URL; the hash is appended as the last path segment
    /// (default: "https://ipfs.io/ipfs/")
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Output root, created at the start of a run (default: "output")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Upper bound for one fetch, request and body copy together (default: 35 seconds)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub fetch_timeout: Duration,

    /// Extension given to fetched assets (default: "jpg")
    #[serde(default = "default_asset_extension")]
    pub asset_extension: String,

    /// Case-insensitive extension selecting input files (default: "md")
    #[serde(default = "default_markdown_extension")]
    pub markdown_extension: String,

    /// Directory name sanitization (default: separator only)
    #[serde(default)]
    pub sanitization: PathSanitization,

    /// User-Agent header sent to the gateway
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            output_dir: default_output_dir(),
            fetch_timeout: default_fetch_timeout(),
            asset_extension: default_asset_extension(),
            markdown_extension: default_markdown_extension(),
            sanitization: PathSanitization::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config {
            message: format!("invalid configuration: {}", e.message()),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read, is not valid TOML, or fails
    /// [`Config::validate`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read '{}': {}", path.display(), e),
            key: None,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `path` when it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values serde cannot express
    pub fn validate(&self) -> Result<()> {
        let gateway = url::Url::parse(&self.gateway_url).map_err(|e| Error::Config {
            message: format!("gateway_url '{}' is not a valid URL: {}", self.gateway_url, e),
            key: Some("gateway_url".to_string()),
        })?;
        if !matches!(gateway.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!(
                    "gateway_url must use http or https, got '{}'",
                    gateway.scheme()
                ),
                key: Some("gateway_url".to_string()),
            });
        }

        if self.fetch_timeout.is_zero() {
            return Err(Error::Config {
                message: "fetch_timeout must be at least one second".to_string(),
                key: Some("fetch_timeout".to_string()),
            });
        }

        for (key, value) in [
            ("asset_extension", &self.asset_extension),
            ("markdown_extension", &self.markdown_extension),
        ] {
            if value.is_empty() || value.contains(['.', '/']) {
                return Err(Error::Config {
                    message: format!("{} must be a bare extension, got '{}'", key, value),
                    key: Some(key.to_string()),
                });
            }
        }

        Ok(())
    }
}

fn default_gateway_url() -> String {
    "https://ipfs.io/ipfs/".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(35)
}

fn default_asset_extension() -> String {
    "jpg".to_string()
}

fn default_markdown_extension() -> String {
    "md".to_string()
}

fn default_user_agent() -> String {
    concat!("tattoo-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

// Durations are written as whole seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
