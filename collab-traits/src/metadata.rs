//! Tag Extraction Contract
//!
//! The import pipeline hands an in-memory audio payload to a [`TagSource`]
//! and gets back whatever tags the file carries. Every field is optional;
//! the pipeline owns the fallback defaults, not the extractor.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tags extracted from an audio payload.
///
/// Absent fields mean the file simply did not carry that tag. Extractors
/// must not substitute defaults; that is the caller's decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedTags {
    /// Track title
    pub title: Option<String>,
    /// Primary artist
    pub artist: Option<String>,
    /// Album name
    pub album: Option<String>,
    /// Genre classification
    pub genre: Option<String>,
    /// Duration in seconds
    pub duration_secs: Option<f64>,
    /// Embedded pictures, front cover first when the format says so
    #[serde(skip)]
    pub pictures: Vec<ParsedPicture>,
}

impl ParsedTags {
    /// First embedded picture, the one the library stores as artwork.
    pub fn front_picture(&self) -> Option<&ParsedPicture> {
        self.pictures.first()
    }
}

/// An embedded picture lifted out of the audio tags.
#[derive(Debug, Clone)]
pub struct ParsedPicture {
    /// Raw image bytes
    pub data: Bytes,
    /// Image format as a MIME type (e.g. "image/jpeg")
    pub format: String,
}

/// Extracts tags from an in-memory audio payload.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Parse the payload and return whatever tags it carries.
    ///
    /// # Arguments
    /// * `audio` - Complete audio payload
    /// * `content_type` - MIME type reported by the upload or fetch
    ///
    /// # Errors
    /// Returns [`CollabError::ExtractionFailed`](crate::CollabError) when
    /// the payload cannot be probed at all. Partial tags are not an error.
    async fn parse(&self, audio: &Bytes, content_type: &str) -> Result<ParsedTags>;
}
