//! Domain models for the song library
//!
//! Songs exist in two forms mirroring the codec's payload duality: the
//! persisted [`SongRecord`] (storable buffers, the source of truth) and
//! the live [`Song`] (playable payload with a fresh ephemeral media URL),
//! connected by [`SongRecord::into_playable`].

use crate::codec::{self, ArtworkImage, PlayableAudio, StoredArtwork, StoredAudio};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a song, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct SongId(pub i64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a playlist, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct PlaylistId(pub i64);

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalize a string for case-insensitive identity comparison
/// (lowercase, trimmed).
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// =============================================================================
// Songs
// =============================================================================

/// A song as persisted by the gateway.
///
/// `normalized_*` columns back the case-insensitive (title, artist, album)
/// identity; payload and artwork are immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SongRecord {
    /// Unique identifier, immutable once assigned
    pub id: SongId,
    /// Track title
    pub title: String,
    /// Normalized title for identity comparison
    pub normalized_title: String,
    /// Track artist
    pub artist: String,
    pub normalized_artist: String,
    /// Album name
    pub album: String,
    pub normalized_album: String,
    /// Free-text, user-editable genre
    pub genre: String,
    /// Broad category from the optional classifier
    pub category: Option<String>,
    /// Finer grouping from the optional classifier
    pub sub_category: Option<String>,
    /// Duration in seconds
    pub duration_secs: f64,
    /// MIME type of the audio payload
    pub content_type: String,
    /// Audio payload, storable form
    pub audio_data: Vec<u8>,
    /// Embedded artwork, storable form
    pub artwork_data: Option<Vec<u8>>,
    /// Artwork image format (MIME), present iff `artwork_data` is
    pub artwork_format: Option<String>,
    /// Timestamps (Unix epoch seconds)
    pub created_at: i64,
    pub updated_at: i64,
}

impl SongRecord {
    /// Materialize the live form: playable payload with a fresh media URL.
    ///
    /// Every call on a freshly loaded record mints a new URL; the returned
    /// [`Song`] owns it and revokes it when discarded.
    pub fn into_playable(self) -> Song {
        let audio = codec::audio_to_playable(StoredAudio {
            data: self.audio_data,
            content_type: self.content_type,
        });

        let artwork = match (self.artwork_data, self.artwork_format) {
            (Some(data), Some(format)) => {
                Some(codec::artwork_to_playable(StoredArtwork { data, format }))
            }
            _ => None,
        };

        Song {
            id: self.id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            genre: self.genre,
            category: self.category,
            sub_category: self.sub_category,
            duration_secs: self.duration_secs,
            audio,
            artwork,
        }
    }
}

/// A song materialized for playback and rendering.
///
/// Not persisted as-is: the audio payload carries an ephemeral media URL
/// that is recreated every time the record is loaded. Deliberately not
/// `Clone`; each instance owns its URL.
#[derive(Debug)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub duration_secs: f64,
    /// Playable payload, owns the media URL
    pub audio: PlayableAudio,
    /// Embedded artwork in live form
    pub artwork: Option<ArtworkImage>,
}

/// A new song ready for insertion, produced by the import pipeline after
/// validation and deduplication.
#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub duration_secs: f64,
    pub audio: StoredAudio,
    pub artwork: Option<StoredArtwork>,
}

impl NewSong {
    /// Validate before insertion
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Song title cannot be empty".to_string());
        }

        if self.audio.data.is_empty() {
            return Err("Audio payload cannot be empty".to_string());
        }

        if self.audio.content_type.trim().is_empty() {
            return Err("Audio content type cannot be empty".to_string());
        }

        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err("Duration cannot be negative".to_string());
        }

        Ok(())
    }
}

/// A partial edit of the user-editable song fields.
///
/// Payload and artwork are immutable post-creation; only the tag fields
/// can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SongEdit {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
}

impl SongEdit {
    /// Whether the edit changes anything at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.genre.is_none()
    }
}

// =============================================================================
// Playlists
// =============================================================================

/// A user-defined playlist.
///
/// Membership is an insertion-ordered collection of unique song ids.
/// Deleting a playlist never touches the referenced songs; deleting a song
/// strips its id from every membership list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Playlist {
    /// Unique identifier, immutable once assigned
    pub id: PlaylistId,
    /// Playlist name, non-empty
    pub name: String,
    /// Creation timestamp (Unix epoch seconds)
    pub created_at: i64,
    /// Member song ids, hydrated from the join table
    #[sqlx(skip)]
    pub song_ids: Vec<SongId>,
}

impl Playlist {
    /// Validate a playlist name before creation
    pub fn validate_name(name: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("Playlist name cannot be empty".to_string());
        }

        Ok(())
    }

    /// Whether the song is already a member
    pub fn contains(&self, song_id: SongId) -> bool {
        self.song_ids.contains(&song_id)
    }
}
