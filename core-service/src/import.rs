//! Import Pipeline
//!
//! Turns an arbitrary audio payload (manual upload or chat hand-off) into
//! a persisted, playable [`Song`].
//!
//! ## Steps
//!
//! 1. Size gate - payloads over 50 MiB are rejected before any other work
//! 2. Tag extraction through the [`TagSource`] contract, with fallback
//!    defaults for absent tags
//! 3. Duplicate gate - case-insensitive (title, artist, album) against
//!    the catalog
//! 4. Optional category enrichment through [`GenreClassifier`]
//!    (failures logged, never fatal)
//! 5. Persist through the codec and the song repository
//! 6. Materialize the live song with a fresh media URL
//!
//! Steps 1-4 perform no durable work; step 5 is the only mutation, so a
//! failure anywhere leaves the store untouched.

use crate::error::{Result, ServiceError};
use bytes::Bytes;
use collab_traits::{GenreClassifier, TagSource};
use core_library::codec::{self, ArtworkImage};
use core_library::models::{NewSong, Song};
use core_library::repositories::SongRepository;
use core_library::{Library, LibraryError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Inclusive upper bound on import payload size: 50 MiB.
pub const MAX_IMPORT_BYTES: usize = 50 * 1024 * 1024;

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";
const UNKNOWN_GENRE: &str = "Unknown Genre";

/// An audio payload handed to the pipeline, plus the original file name
/// the default title is derived from.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Bytes,
    pub content_type: String,
    pub file_name: String,
}

impl AudioUpload {
    /// Default title: the file name with its extension stripped.
    pub fn default_title(&self) -> String {
        let name = self.file_name.trim();
        let stem = match name.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem,
            _ => name,
        };

        if stem.is_empty() {
            "Untitled".to_string()
        } else {
            stem.to_string()
        }
    }
}

/// The import pipeline. Cheap to clone per import call site.
#[derive(Clone)]
pub struct ImportPipeline {
    library: Library,
    tags: Arc<dyn TagSource>,
    classifier: Option<Arc<dyn GenreClassifier>>,
}

impl ImportPipeline {
    /// Create a pipeline over the given library and tag extractor
    pub fn new(library: Library, tags: Arc<dyn TagSource>) -> Self {
        Self {
            library,
            tags,
            classifier: None,
        }
    }

    /// Attach an optional genre classifier for category enrichment
    pub fn with_classifier(mut self, classifier: Arc<dyn GenreClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Import one payload end to end.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::FileTooLarge`] when the payload exceeds
    ///   [`MAX_IMPORT_BYTES`]
    /// - [`ServiceError::Collaborator`] when tag extraction fails
    /// - [`ServiceError::DuplicateSong`] when the extracted identity is
    ///   already in the catalog
    /// - [`ServiceError::Library`] on storage failure
    pub async fn import(&self, upload: AudioUpload) -> Result<Song> {
        if upload.bytes.len() > MAX_IMPORT_BYTES {
            return Err(ServiceError::FileTooLarge {
                actual_bytes: upload.bytes.len(),
                limit_bytes: MAX_IMPORT_BYTES,
            });
        }

        debug!(
            file_name = %upload.file_name,
            content_type = %upload.content_type,
            size = upload.bytes.len(),
            "Reading tags"
        );
        let parsed = self.tags.parse(&upload.bytes, &upload.content_type).await?;

        let title = parsed
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| upload.default_title());
        let artist = parsed
            .artist
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let album = parsed
            .album
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
        let genre = parsed
            .genre
            .clone()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_GENRE.to_string());
        let duration_secs = parsed.duration_secs.unwrap_or(0.0);

        let songs = self.library.songs();
        if songs.find_duplicate(&title, &artist, &album).await?.is_some() {
            warn!(%title, %artist, %album, "Rejecting duplicate import");
            return Err(ServiceError::DuplicateSong {
                title,
                artist,
                album,
            });
        }

        let (category, sub_category) = self.classify(&title, &artist, &genre).await;

        let artwork = parsed.front_picture().map(|picture| {
            codec::artwork_to_storable(ArtworkImage {
                bytes: picture.data.clone(),
                format: picture.format.clone(),
            })
        });

        let new_song = NewSong {
            title,
            artist,
            album,
            genre,
            category,
            sub_category,
            duration_secs,
            audio: codec::audio_to_storable(upload.bytes.clone(), &upload.content_type),
            artwork,
        };

        let id = songs.insert(&new_song).await?;

        let record = songs
            .find_by_id(id)
            .await?
            .ok_or_else(|| LibraryError::NotFound {
                entity_type: "Song".to_string(),
                id: id.0,
            })?;

        info!(%id, title = %record.title, artist = %record.artist, "Imported song");

        Ok(record.into_playable())
    }

    /// Optional enrichment; classifier failure leaves the song unenriched.
    async fn classify(
        &self,
        title: &str,
        artist: &str,
        genre: &str,
    ) -> (Option<String>, Option<String>) {
        let Some(classifier) = &self.classifier else {
            return (None, None);
        };

        match classifier.classify(title, artist, genre).await {
            Ok(tags) => (Some(tags.category), Some(tags.sub_category)),
            Err(e) => {
                warn!(error = %e, %title, "Genre classification failed; storing unenriched");
                (None, None)
            }
        }
    }
}
