//! Remote File Retrieval Contract
//!
//! The chat platform hands the mini-app an opaque file identifier; this
//! contract turns it into bytes the import pipeline can consume.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A file fetched from the chat platform.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Complete file contents
    pub content: Bytes,
    /// MIME type reported by the platform
    pub content_type: String,
    /// File name suggested by the platform, used for the default title
    pub suggested_file_name: String,
}

/// Resolves opaque platform file identifiers into payloads.
#[async_trait]
pub trait RemoteFileSource: Send + Sync {
    /// Fetch the file behind `file_id`.
    ///
    /// # Errors
    /// - [`CollabError::FileNotFound`](crate::CollabError) when the
    ///   platform no longer knows the identifier
    /// - [`CollabError::FetchFailed`](crate::CollabError) on transport
    ///   failure
    async fn fetch(&self, file_id: &str) -> Result<RemoteFile>;
}
