//! Audio Tag Extraction
//!
//! Implements the [`TagSource`] contract with the `lofty` crate. Supports
//! ID3v2, Vorbis Comments, MP4 tags, and FLAC.
//!
//! ## Overview
//!
//! - Probes the payload entirely in memory (uploads and chat downloads
//!   never touch disk)
//! - Extracts title/artist/album/genre plus duration
//! - Lifts embedded pictures, sniffing the image MIME type when the tag
//!   does not carry one
//! - Normalizes text tags (trim, collapse whitespace, strip control
//!   characters)
//!
//! Absent tags stay absent: fallback defaults belong to the import
//! pipeline, not the extractor.
//!
//! ## Usage
//!
//! ```ignore
//! use bytes::Bytes;
//! use collab_traits::TagSource;
//! use core_metadata::TagReader;
//!
//! # async fn example(payload: Bytes) -> Result<(), Box<dyn std::error::Error>> {
//! let reader = TagReader::new();
//! let tags = reader.parse(&payload, "audio/mpeg").await?;
//! println!("Title: {}", tags.title.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use collab_traits::{CollabError, ParsedPicture, ParsedTags, TagSource};
use lofty::config::ParseOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::MimeType;
use lofty::probe::Probe;
use lofty::tag::Accessor;
use tracing::{debug, warn};

use crate::artwork;
use crate::error::{MetadataError, Result};

/// Tag reader backed by `lofty`.
pub struct TagReader {
    /// Parse options for lofty
    parse_options: ParseOptions,
}

impl TagReader {
    /// Create a new tag reader with default settings
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::new(),
        }
    }

    /// Create a reader with custom parse options
    pub fn with_options(parse_options: ParseOptions) -> Self {
        Self { parse_options }
    }

    fn parse_bytes(&self, audio: &Bytes, content_type: &str) -> Result<ParsedTags> {
        debug!(
            content_type,
            size = audio.len(),
            "Parsing audio tags from payload"
        );

        let tagged_file = Probe::new(std::io::Cursor::new(audio.as_ref()))
            .options(self.parse_options)
            .guess_file_type()
            .map_err(|e| MetadataError::ExtractionFailed(format!("Failed to probe payload: {}", e)))?
            .read()
            .map_err(|e| MetadataError::ExtractionFailed(format!("Failed to parse payload: {}", e)))?;

        let duration_secs = tagged_file.properties().duration().as_secs_f64();

        // Primary tag first, falling back to the first available tag.
        let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

        let (title, artist, album, genre) = match tag {
            Some(tag) => (
                tag.title().map(|s| Self::normalize_text(s.as_ref())),
                tag.artist().map(|s| Self::normalize_text(s.as_ref())),
                tag.album().map(|s| Self::normalize_text(s.as_ref())),
                tag.genre().map(|s| Self::normalize_text(s.as_ref())),
            ),
            None => {
                warn!(content_type, "No tags found in payload");
                (None, None, None, None)
            }
        };

        let pictures = tag.map(Self::extract_pictures).unwrap_or_default();

        Ok(ParsedTags {
            title,
            artist,
            album,
            genre,
            duration_secs: Some(duration_secs),
            pictures,
        })
    }

    /// Normalize text metadata
    ///
    /// - Trims leading/trailing whitespace
    /// - Normalizes consecutive whitespace to single space
    /// - Removes null bytes and control characters
    fn normalize_text(text: &str) -> String {
        text.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .filter(|c| !c.is_control())
            .collect()
    }

    /// Lift all pictures out of the tag, skipping empty or untyped data
    fn extract_pictures(tag: &lofty::tag::Tag) -> Vec<ParsedPicture> {
        tag.pictures()
            .iter()
            .filter_map(|pic| {
                if pic.data().is_empty() {
                    return None;
                }

                let data = Bytes::copy_from_slice(pic.data());
                let format = pic
                    .mime_type()
                    .map(Self::mime_type_to_string)
                    .or_else(|| artwork::sniff_mime(&data))?;

                Some(ParsedPicture { data, format })
            })
            .collect()
    }

    /// Convert lofty MimeType to string
    fn mime_type_to_string(mime_type: &MimeType) -> String {
        match mime_type {
            MimeType::Png => "image/png".to_string(),
            MimeType::Jpeg => "image/jpeg".to_string(),
            MimeType::Tiff => "image/tiff".to_string(),
            MimeType::Bmp => "image/bmp".to_string(),
            MimeType::Gif => "image/gif".to_string(),
            _ => "application/octet-stream".to_string(),
        }
    }
}

impl Default for TagReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagSource for TagReader {
    async fn parse(&self, audio: &Bytes, content_type: &str) -> collab_traits::Result<ParsedTags> {
        self.parse_bytes(audio, content_type)
            .map_err(|e| CollabError::ExtractionFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(TagReader::normalize_text("  Hello   World  "), "Hello World");
        assert_eq!(
            TagReader::normalize_text("Title\nWith\tWhitespace"),
            "Title With Whitespace"
        );
        assert_eq!(TagReader::normalize_text("Clean Text"), "Clean Text");
    }

    #[test]
    fn test_mime_type_to_string() {
        assert_eq!(TagReader::mime_type_to_string(&MimeType::Png), "image/png");
        assert_eq!(TagReader::mime_type_to_string(&MimeType::Jpeg), "image/jpeg");
        assert_eq!(TagReader::mime_type_to_string(&MimeType::Gif), "image/gif");
    }

    #[tokio::test]
    async fn test_garbage_payload_fails_extraction() {
        let reader = TagReader::new();
        let result = reader
            .parse(&Bytes::from_static(b"definitely not audio"), "audio/mpeg")
            .await;

        assert!(matches!(result, Err(CollabError::ExtractionFailed(_))));
    }

    #[test]
    fn test_tag_reader_default() {
        let reader1 = TagReader::new();
        let reader2 = TagReader::default();

        assert_eq!(
            format!("{:?}", reader1.parse_options),
            format!("{:?}", reader2.parse_options)
        );
    }
}
