//! Wire types for the blob store search API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A search definition, registered once and then executed on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Maximum results; -1 means unlimited.
    pub limit: i64,
    pub constraint: Constraint,
    /// Presence asks the server to describe every matched blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<DescribeRequest>,
}

impl SearchQuery {
    /// The standing query: every file whose MIME type starts with `audio/`.
    pub fn audio_files() -> Self {
        Self {
            limit: -1,
            constraint: Constraint {
                file: Some(FileConstraint {
                    mime_type: Some(StringConstraint {
                        has_prefix: Some("audio/".to_string()),
                    }),
                }),
            },
            describe: Some(DescribeRequest::default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConstraint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConstraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<StringConstraint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConstraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeRequest {}

/// Response to an executed search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub blobs: Vec<SearchResultBlob>,
    pub description: Option<Description>,
}

impl SearchResult {
    /// Look up the description of a matched blob.
    pub fn described(&self, blob: &str) -> Option<&DescribedBlob> {
        self.description.as_ref()?.meta.get(blob)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultBlob {
    pub blob: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Description {
    pub meta: HashMap<String, DescribedBlob>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DescribedBlob {
    pub blob_ref: String,
    pub camli_type: Option<String>,
    pub file: Option<FileInfo>,
    pub media_tags: HashMap<String, String>,
}

impl DescribedBlob {
    /// Non-empty media tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.media_tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn mime_type(&self) -> &str {
        self.file
            .as_ref()
            .map(|f| f.mime_type.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileInfo {
    pub file_name: Option<String>,
    pub size: Option<u64>,
    pub mime_type: String,
}

/// Content address of a blob: `<hash>-<lowercase hex digest>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobRef {
    hash: HashKind,
    digest: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HashKind {
    Sha1,
    Sha224,
}

impl HashKind {
    fn name(self) -> &'static str {
        match self {
            HashKind::Sha1 => "sha1",
            HashKind::Sha224 => "sha224",
        }
    }

    fn hex_len(self) -> usize {
        match self {
            HashKind::Sha1 => 40,
            HashKind::Sha224 => 56,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlobRefError {
    #[error("missing '-' separator")]
    MissingSeparator,
    #[error("unknown hash function {0:?}")]
    UnknownHash(String),
    #[error("digest for {hash} must be {expected} lowercase hex digits")]
    BadDigest { hash: &'static str, expected: usize },
}

impl BlobRef {
    pub fn parse(s: &str) -> Result<Self, BlobRefError> {
        let (name, digest) = s.split_once('-').ok_or(BlobRefError::MissingSeparator)?;
        let hash = match name {
            "sha1" => HashKind::Sha1,
            "sha224" => HashKind::Sha224,
            other => return Err(BlobRefError::UnknownHash(other.to_string())),
        };

        let hex_ok = digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if digest.len() != hash.hex_len() || !hex_ok {
            return Err(BlobRefError::BadDigest {
                hash: hash.name(),
                expected: hash.hex_len(),
            });
        }

        Ok(Self {
            hash,
            digest: digest.to_string(),
        })
    }

    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hash.name(), self.digest)
    }
}
