//! Media references and pending uploads.

use serde::{Deserialize, Serialize};

/// Opaque reference to an image already persisted by the platform.
///
/// Ordering is significant wherever these appear in a sequence: index 0 is
/// the experience's primary image. Primary status is positional, never
/// stored on the reference itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(pub String);

impl MediaRef {
    /// Creates a reference from a URL or storage path.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A locally held image blob awaiting upload; not yet a `MediaRef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMedia {
    /// Original file name, used for multipart part naming and error reports.
    pub file_name: String,
    /// MIME type reported by the file picker.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl PendingMedia {
    /// Creates a pending upload from picker output.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Whether the MIME type identifies an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Size of the blob in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// The minimal media change set sent to the server on submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaDiff {
    /// New blobs to upload, in staging order.
    pub to_upload: Vec<PendingMedia>,
    /// Persisted references to delete.
    pub to_delete: Vec<MediaRef>,
}

impl MediaDiff {
    /// True when the diff carries no media change at all.
    ///
    /// The transport uses this to pick a plain structured payload over a
    /// multipart one; the semantic payload is identical either way.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_upload.is_empty() && self.to_delete.is_empty()
    }
}
