//! Artwork records decoded from front matter
//!
//! Decoding maps a fixed set of TOML keys onto [`Artwork`]. Unknown keys are ignored and
//! missing keys take their zero value. Serialization uses the JSON field names of the
//! published tattoo index, which is what the debug log prints.

use crate::error::DecodeError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One tattoo record, decoded from a single Markdown file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artwork {
    /// Record identifier
    pub id: String,

    /// Link to the original post
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,

    /// Title, part of the output directory name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Date the tattoo was made; preferred over `publish_date`
    #[serde(
        rename = "tattoodate",
        deserialize_with = "date_text",
        skip_serializing_if = "String::is_empty"
    )]
    pub made_date: String,

    /// Date the record was published
    #[serde(
        rename = "date",
        alias = "publishdate",
        deserialize_with = "date_text",
        skip_serializing_if = "String::is_empty"
    )]
    pub publish_date: String,

    /// Free-form tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Body parts the tattoo covers
    #[serde(
        rename = "bodypart",
        alias = "bodyparts",
        alias = "body_parts",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub body_parts: Vec<String>,

    /// Primary image content hash
    #[serde(rename = "image_ipfs")]
    pub image_hash: String,

    /// Additional image content hashes, fetched in order after the primary one
    #[serde(rename = "images_ipfs", skip_serializing_if = "Vec::is_empty")]
    pub image_hashes: Vec<String>,

    /// City the tattoo was made in
    #[serde(
        rename(deserialize = "location_city", serialize = "made_at_city"),
        alias = "made_at_city"
    )]
    pub location_city: String,

    /// Country the tattoo was made in
    #[serde(
        rename(deserialize = "location_country", serialize = "made_at_country"),
        alias = "made_at_country"
    )]
    pub location_country: String,

    /// Shop name, part of the output directory name (may be empty)
    #[serde(rename = "made_at_shop", skip_serializing_if = "String::is_empty")]
    pub shop_name: String,

    /// Session length in minutes
    #[serde(rename = "duration_min", alias = "durationmin")]
    pub duration_minutes: i64,

    /// Gender of the wearer
    pub gender: String,

    /// Extra notes
    pub extra: String,

    /// Related article
    pub article: String,
}

impl Artwork {
    /// Decode a raw front-matter block
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the block is not valid TOML or a recognized key has the
    /// wrong type. No partially decoded record is returned.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(toml::from_str(raw)?)
    }

    /// The date used for the output path: `made_date` when set, otherwise `publish_date`
    pub fn date_source(&self) -> Option<&str> {
        [self.made_date.as_str(), self.publish_date.as_str()]
            .into_iter()
            .find(|date| !date.is_empty())
    }

    /// Content hashes to fetch, primary image first, empty entries skipped
    pub fn asset_hashes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.image_hash.as_str())
            .chain(self.image_hashes.iter().map(String::as_str))
            .filter(|hash| !hash.is_empty())
    }
}

/// Decode a raw front-matter block into an [`Artwork`]
pub fn decode(raw: &str) -> Result<Artwork, DecodeError> {
    Artwork::decode(raw)
}

/// Accept a quoted date or an unquoted TOML date/datetime
fn date_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match toml::Value::deserialize(deserializer)? {
        toml::Value::String(text) => Ok(text),
        toml::Value::Datetime(datetime) => Ok(datetime.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a date string or TOML date, found {}",
            other.type_str()
        ))),
    }
}
