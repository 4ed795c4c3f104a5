//! Output directory and file naming
//!
//! Every record maps to one directory `<root>/<name>` where `name` is
//! `"<YYYY.MM.DD> - <title> @<shop>"`, and every asset to `<root>/<name>/<name><hash>.<ext>`.
//! The mapping depends only on the date prefix, title, shop and sanitization mode, so re-runs
//! land on the same paths and the skip-if-exists check in the fetcher finds earlier downloads.

use crate::config::{Config, PathSanitization};
use crate::error::PathError;
use crate::record::Artwork;
use std::path::{Path, PathBuf};

/// Number of leading characters of a date that form the `YYYY-MM-DD` prefix
const DATE_PREFIX_LEN: usize = 10;

/// Characters replaced in addition to `/` by [`PathSanitization::Portable`]
const PORTABLE_RESERVED: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];

/// Derive the directory name for a record
///
/// # Errors
///
/// Returns [`PathError::MissingDate`] when both dates are empty or the chosen date has fewer
/// than 10 characters.
///
/// # Examples
///
/// ```
/// use tattoo_dl::config::PathSanitization;
/// use tattoo_dl::layout::resolve_dir_name;
/// use tattoo_dl::Artwork;
///
/// let artwork = Artwork {
///     title: "Koi".to_string(),
///     made_date: "2020-05-01".to_string(),
///     shop_name: "InkHouse".to_string(),
///     ..Default::default()
/// };
/// let name = resolve_dir_name(&artwork, PathSanitization::Separator).unwrap();
/// assert_eq!(name, "2020.05.01 - Koi @InkHouse");
/// ```
pub fn resolve_dir_name(
    artwork: &Artwork,
    sanitization: PathSanitization,
) -> Result<String, PathError> {
    let date = artwork
        .date_source()
        .and_then(date_prefix)
        .ok_or(PathError::MissingDate)?;

    let name = format!("{} - {} @{}", date, artwork.title, artwork.shop_name);
    Ok(sanitize(&name, sanitization))
}

/// First ten characters of `date` with `-` turned into `.`, or `None` if it is too short
fn date_prefix(date: &str) -> Option<String> {
    let prefix: String = date.chars().take(DATE_PREFIX_LEN).collect();
    if prefix.chars().count() < DATE_PREFIX_LEN {
        return None;
    }
    Some(prefix.replace('-', "."))
}

/// Replace characters that cannot appear in a single path component
pub fn sanitize(name: &str, sanitization: PathSanitization) -> String {
    name.chars()
        .map(|c| match sanitization {
            PathSanitization::Separator if c == '/' => '.',
            PathSanitization::Portable
                if c == '/' || c.is_control() || PORTABLE_RESERVED.contains(&c) =>
            {
                '.'
            }
            _ => c,
        })
        .collect()
}

/// Maps records and hashes to locations under an output root
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
    extension: String,
    sanitization: PathSanitization,
}

impl OutputLayout {
    /// Create a layout rooted at `root`
    pub fn new(
        root: impl Into<PathBuf>,
        extension: impl Into<String>,
        sanitization: PathSanitization,
    ) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            sanitization,
        }
    }

    /// Create a layout from the output settings of a [`Config`]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.output_dir.clone(),
            config.asset_extension.clone(),
            config.sanitization,
        )
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the directory a record's assets are written to
    pub fn record_dir(&self, artwork: &Artwork) -> Result<RecordDir, PathError> {
        let name = resolve_dir_name(artwork, self.sanitization)?;
        Ok(RecordDir {
            path: self.root.join(&name),
            name,
            extension: self.extension.clone(),
        })
    }
}

/// The resolved output directory of one record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordDir {
    name: String,
    path: PathBuf,
    extension: String,
}

impl RecordDir {
    /// Directory name, also the prefix of every asset file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full directory path under the output root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Destination of the asset with content hash `hash`
    ///
    /// A `/` inside the hash is mapped to `.` so the file stays inside this directory.
    pub fn asset_path(&self, hash: &str) -> PathBuf {
        let hash = sanitize(hash, PathSanitization::Separator);
        self.path.join(format!("{}{}.{}", self.name, hash, self.extension))
    }
}
