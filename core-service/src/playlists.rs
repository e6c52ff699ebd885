//! Playlist Management
//!
//! User-facing playlist operations over the playlist repository, plus the
//! one cross-cutting mutation: deleting a song, which must strip its id
//! from every playlist before the record itself goes away.

use crate::error::{Result, ServiceError};
use core_library::models::{Playlist, PlaylistId, SongId};
use core_library::repositories::{PlaylistRepository, SongRepository};
use core_library::{Library, LibraryError};
use tracing::{debug, info};

/// Outcome of adding songs to a playlist.
#[derive(Debug, PartialEq, Eq)]
pub enum AddSongsOutcome {
    /// At least one id was genuinely added; carries the refreshed playlist
    Added(Playlist),
    /// Every requested id was already a member; nothing changed
    AlreadyPresent,
}

/// Playlist operations bound to a library handle. Cheap to clone.
#[derive(Clone)]
pub struct PlaylistManager {
    library: Library,
}

impl PlaylistManager {
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    /// Create a playlist, trimming the name first.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidName`] when the name is empty or whitespace.
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidName(
                "Playlist name cannot be empty".to_string(),
            ));
        }

        let playlist = self.library.playlists().insert(name).await?;
        info!(id = %playlist.id, name = %playlist.name, "Created playlist");

        Ok(playlist)
    }

    /// All playlists, membership hydrated, oldest first
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.library.playlists().find_all().await?)
    }

    /// One playlist by id, membership hydrated
    pub async fn get_playlist(&self, id: PlaylistId) -> Result<Option<Playlist>> {
        Ok(self.library.playlists().find_by_id(id).await?)
    }

    /// Add songs to a playlist.
    ///
    /// Ids already in the playlist (and repeats within the request) are
    /// skipped; an all-duplicate request reports
    /// [`AddSongsOutcome::AlreadyPresent`] instead of an error.
    pub async fn add_songs(
        &self,
        id: PlaylistId,
        song_ids: &[SongId],
    ) -> Result<AddSongsOutcome> {
        match self.library.playlists().add_songs(id, song_ids).await? {
            Some(playlist) => {
                debug!(%id, members = playlist.song_ids.len(), "Playlist membership updated");
                Ok(AddSongsOutcome::Added(playlist))
            }
            None => Ok(AddSongsOutcome::AlreadyPresent),
        }
    }

    /// Delete a playlist. Member songs are untouched.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Library`] wrapping [`LibraryError::NotFound`] when
    /// no such playlist exists.
    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        if !self.library.playlists().delete(id).await? {
            return Err(ServiceError::Library(LibraryError::NotFound {
                entity_type: "Playlist".to_string(),
                id: id.0,
            }));
        }

        info!(%id, "Deleted playlist");
        Ok(())
    }

    /// Delete a song and strip its id from every playlist.
    ///
    /// Membership rows go first so no playlist is ever left holding an id
    /// with no backing record.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Library`] wrapping [`LibraryError::NotFound`] when
    /// no such song exists.
    pub async fn delete_song(&self, id: SongId) -> Result<()> {
        let removed_references = self.library.playlists().remove_song_everywhere(id).await?;

        if !self.library.songs().delete(id).await? {
            return Err(ServiceError::Library(LibraryError::NotFound {
                entity_type: "Song".to_string(),
                id: id.0,
            }));
        }

        info!(%id, removed_references, "Deleted song");
        Ok(())
    }
}
