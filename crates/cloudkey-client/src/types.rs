//! Common types for the client SDK

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Length of a media id in hex characters
pub const MEDIA_ID_LEN: usize = 24;

/// A media identifier.
///
/// Ids are never validated before being sent: the server reports a malformed
/// id as `InvalidParam`, and that is what callers see.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Wrap a raw id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for exactly 24 lowercase hex characters
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == MEDIA_ID_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&MediaId> for MediaId {
    fn from(id: &MediaId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for MediaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A user account
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: String,
    /// Login name
    pub username: String,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A media object
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Media {
    /// Media id
    pub id: MediaId,
    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Name (source file name without extension, for uploads)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Location of the media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for creating a media
#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateMediaOptions {
    /// Remote URL the server should ingest the media from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Initial metadata
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl CreateMediaOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest from a remote URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add initial metadata
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// Arguments of `media.set_meta`.
///
/// `key` and `value` are optional so that omitting either is expressible;
/// an incomplete request fails with `MissingParam`.
#[derive(Clone, Debug, Serialize)]
pub struct SetMetaRequest {
    /// Target media
    pub id: MediaId,
    /// Metadata key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Metadata value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl SetMetaRequest {
    /// Start a request for a media
    pub fn new(id: impl Into<MediaId>) -> Self {
        Self {
            id: id.into(),
            key: None,
            value: None,
        }
    }

    /// Set the key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Names of the omitted parameters
    pub fn missing_params(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.key.is_none() {
            missing.push("key");
        }
        if self.value.is_none() {
            missing.push("value");
        }
        missing
    }
}

/// A metadata value
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetaValue {
    /// The stored value
    pub value: String,
}

impl<'de> Deserialize<'de> for MetaValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Entry { value: String },
            Bare(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Entry { value } | Raw::Bare(value) => MetaValue { value },
        })
    }
}

/// Options for `file.upload`
#[derive(Clone, Debug, Default, Serialize)]
pub struct UploadOptions {
    /// Where the browser is redirected once the upload completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl UploadOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the post-upload redirect target
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// A signed upload URL returned by `file.upload`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadTicket {
    /// Signed URL to post the file to
    pub url: String,
    /// Size in bytes, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Name, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadTicket {
    /// Look up a decoded query parameter of the upload URL
    pub fn query_param(&self, name: &str) -> Option<String> {
        let url = url::Url::parse(&self.url).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// The seal authorizing this upload
    pub fn seal(&self) -> Option<String> {
        self.query_param("seal")
    }

    /// The upload transaction id
    pub fn uuid(&self) -> Option<String> {
        self.query_param("uuid")
    }

    /// The redirect target echoed back by the server
    pub fn target(&self) -> Option<String> {
        self.query_param("target")
    }
}
