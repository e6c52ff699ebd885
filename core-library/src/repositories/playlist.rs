//! Playlist repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{Playlist, PlaylistId, SongId};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};
use std::collections::HashSet;

/// Playlist repository interface for data access operations
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Create a playlist with the given name and return it
    ///
    /// # Errors
    /// Returns error if the name fails validation or a database error
    /// occurs.
    async fn insert(&self, name: &str) -> Result<Playlist>;

    /// Find a playlist by its ID, membership hydrated
    async fn find_by_id(&self, id: PlaylistId) -> Result<Option<Playlist>>;

    /// Fetch every playlist, membership hydrated, oldest first
    async fn find_all(&self) -> Result<Vec<Playlist>>;

    /// Delete a playlist by ID
    ///
    /// Removes the playlist and its membership rows only; referenced
    /// songs are untouched.
    ///
    /// # Returns
    /// - `Ok(true)` if the playlist was deleted
    /// - `Ok(false)` if the playlist was not found
    async fn delete(&self, id: PlaylistId) -> Result<bool>;

    /// Add songs to a playlist, de-duplicating against existing membership
    ///
    /// # Returns
    /// - `Ok(Some(playlist))` with the refreshed membership when at least
    ///   one id was genuinely added
    /// - `Ok(None)` when every requested id was already a member (no-op)
    ///
    /// # Errors
    /// Returns [`LibraryError::NotFound`] if the playlist is absent.
    async fn add_songs(&self, id: PlaylistId, song_ids: &[SongId]) -> Result<Option<Playlist>>;

    /// Member song ids of a playlist, in insertion order
    async fn song_ids(&self, id: PlaylistId) -> Result<Vec<SongId>>;

    /// Strip a song id from every playlist's membership list
    ///
    /// Required cleanup step of song deletion; returns the number of
    /// membership rows removed.
    async fn remove_song_everywhere(&self, song_id: SongId) -> Result<u64>;

    /// Count total playlists
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of PlaylistRepository
pub struct SqlitePlaylistRepository {
    pool: SqlitePool,
}

impl SqlitePlaylistRepository {
    /// Create a new SqlitePlaylistRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, mut playlist: Playlist) -> Result<Playlist> {
        playlist.song_ids = self.song_ids(playlist.id).await?;
        Ok(playlist)
    }
}

#[async_trait]
impl PlaylistRepository for SqlitePlaylistRepository {
    async fn insert(&self, name: &str) -> Result<Playlist> {
        Playlist::validate_name(name).map_err(|e| LibraryError::InvalidInput {
            field: "Playlist".to_string(),
            message: e,
        })?;

        let created_at = chrono::Utc::now().timestamp();

        let result = query("INSERT INTO playlists (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        Ok(Playlist {
            id: PlaylistId(result.last_insert_rowid()),
            name: name.to_string(),
            created_at,
            song_ids: Vec::new(),
        })
    }

    async fn find_by_id(&self, id: PlaylistId) -> Result<Option<Playlist>> {
        let playlist = query_as::<_, Playlist>("SELECT * FROM playlists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match playlist {
            Some(playlist) => Ok(Some(self.hydrate(playlist).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Playlist>> {
        let playlists = query_as::<_, Playlist>("SELECT * FROM playlists ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut hydrated = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            hydrated.push(self.hydrate(playlist).await?);
        }

        Ok(hydrated)
    }

    async fn delete(&self, id: PlaylistId) -> Result<bool> {
        // Membership rows first (foreign key), then the playlist itself,
        // atomically: a playlist must never survive without its membership.
        let mut tx = self.pool.begin().await?;

        query("DELETE FROM playlist_songs WHERE playlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_songs(&self, id: PlaylistId, song_ids: &[SongId]) -> Result<Option<Playlist>> {
        let playlist = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| LibraryError::NotFound {
                entity_type: "Playlist".to_string(),
                id: id.0,
            })?;

        // De-duplicate against existing membership and within the request
        // itself, preserving request order.
        let mut seen: HashSet<SongId> = playlist.song_ids.iter().copied().collect();
        let to_add: Vec<SongId> = song_ids
            .iter()
            .copied()
            .filter(|song_id| seen.insert(*song_id))
            .collect();

        if to_add.is_empty() {
            return Ok(None);
        }

        let added_at = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;
        for song_id in &to_add {
            query("INSERT INTO playlist_songs (playlist_id, song_id, added_at) VALUES (?, ?, ?)")
                .bind(id)
                .bind(song_id)
                .bind(added_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(Some(self.hydrate(playlist).await?))
    }

    async fn song_ids(&self, id: PlaylistId) -> Result<Vec<SongId>> {
        let rows = query_as::<_, (SongId,)>(
            "SELECT song_id FROM playlist_songs WHERE playlist_id = ? ORDER BY added_at ASC, song_id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(song_id,)| song_id).collect())
    }

    async fn remove_song_everywhere(&self, song_id: SongId) -> Result<u64> {
        let result = query("DELETE FROM playlist_songs WHERE song_id = ?")
            .bind(song_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = query_as("SELECT COUNT(*) FROM playlists")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::StoredAudio;
    use crate::db::create_test_pool;
    use crate::models::NewSong;
    use crate::repositories::{SongRepository, SqliteSongRepository};

    async fn insert_song(songs: &SqliteSongRepository, title: &str) -> SongId {
        songs
            .insert(&NewSong {
                title: title.to_string(),
                artist: "Artist X".to_string(),
                album: "Album 1".to_string(),
                genre: "Unknown Genre".to_string(),
                category: None,
                sub_category: None,
                duration_secs: 60.0,
                audio: StoredAudio {
                    data: b"payload".to_vec(),
                    content_type: "audio/mpeg".to_string(),
                },
                artwork: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find_playlist() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqlitePlaylistRepository::new(pool);

        let playlist = repo.insert("Favorites").await.unwrap();
        assert_eq!(playlist.id, PlaylistId(1));
        assert!(playlist.song_ids.is_empty());

        let found = repo.find_by_id(playlist.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Favorites");
        assert!(found.song_ids.is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqlitePlaylistRepository::new(pool);

        let result = repo.insert("   ").await;
        assert!(matches!(result, Err(LibraryError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_add_songs_and_membership_order() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool);

        let a = insert_song(&songs, "A").await;
        let b = insert_song(&songs, "B").await;
        let playlist = repo.insert("Mix").await.unwrap();

        let updated = repo.add_songs(playlist.id, &[a, b]).await.unwrap().unwrap();
        assert_eq!(updated.song_ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_add_songs_is_idempotent() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool);

        let a = insert_song(&songs, "A").await;
        let playlist = repo.insert("Mix").await.unwrap();

        let first = repo.add_songs(playlist.id, &[a]).await.unwrap();
        assert!(first.is_some(), "genuine add reports the new membership");

        // Same id again: distinct no-op outcome, membership unchanged.
        let second = repo.add_songs(playlist.id, &[a]).await.unwrap();
        assert!(second.is_none());
        assert_eq!(repo.song_ids(playlist.id).await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn test_add_songs_deduplicates_within_request() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool);

        let a = insert_song(&songs, "A").await;
        let playlist = repo.insert("Mix").await.unwrap();

        let updated = repo.add_songs(playlist.id, &[a, a, a]).await.unwrap().unwrap();
        assert_eq!(updated.song_ids, vec![a]);
    }

    #[tokio::test]
    async fn test_add_songs_partial_overlap_adds_the_rest() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool);

        let a = insert_song(&songs, "A").await;
        let b = insert_song(&songs, "B").await;
        let playlist = repo.insert("Mix").await.unwrap();

        repo.add_songs(playlist.id, &[a]).await.unwrap();
        let updated = repo.add_songs(playlist.id, &[a, b]).await.unwrap().unwrap();
        assert_eq!(updated.song_ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_add_songs_to_missing_playlist() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool);

        let a = insert_song(&songs, "A").await;
        let result = repo.add_songs(PlaylistId(7), &[a]).await;

        assert!(matches!(result, Err(LibraryError::NotFound { id: 7, .. })));
    }

    #[tokio::test]
    async fn test_delete_playlist_keeps_songs() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool);

        let a = insert_song(&songs, "A").await;
        let playlist = repo.insert("Mix").await.unwrap();
        repo.add_songs(playlist.id, &[a]).await.unwrap();

        assert!(repo.delete(playlist.id).await.unwrap());
        assert!(repo.find_by_id(playlist.id).await.unwrap().is_none());

        // Referenced song is untouched.
        assert!(songs.find_by_id(a).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_playlist_leaves_no_membership_rows() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool.clone());

        let a = insert_song(&songs, "A").await;
        let b = insert_song(&songs, "B").await;
        let playlist = repo.insert("Mix").await.unwrap();
        repo.add_songs(playlist.id, &[a, b]).await.unwrap();

        assert!(repo.delete(playlist.id).await.unwrap());

        // The playlist and its membership go together.
        let orphans: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM playlist_songs WHERE playlist_id = ?")
                .bind(playlist.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(orphans.0, 0);
    }

    #[tokio::test]
    async fn test_remove_song_everywhere() {
        let pool = create_test_pool().await.unwrap();
        let songs = SqliteSongRepository::new(pool.clone());
        let repo = SqlitePlaylistRepository::new(pool);

        let a = insert_song(&songs, "A").await;
        let b = insert_song(&songs, "B").await;

        let first = repo.insert("First").await.unwrap();
        let second = repo.insert("Second").await.unwrap();
        repo.add_songs(first.id, &[a, b]).await.unwrap();
        repo.add_songs(second.id, &[a]).await.unwrap();

        let removed = repo.remove_song_everywhere(a).await.unwrap();
        assert_eq!(removed, 2);

        assert_eq!(repo.song_ids(first.id).await.unwrap(), vec![b]);
        assert!(repo.song_ids(second.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_playlists() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqlitePlaylistRepository::new(pool);

        assert_eq!(repo.count().await.unwrap(), 0);

        for i in 1..=3 {
            repo.insert(&format!("Playlist {}", i)).await.unwrap();
        }

        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
