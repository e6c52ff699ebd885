//! Song repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{normalize, NewSong, SongEdit, SongId, SongRecord};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};

/// Song repository interface for data access operations
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Insert a new song and return its store-assigned id
    ///
    /// # Errors
    /// Returns error if:
    /// - Song validation fails
    /// - A song with the same normalized (title, artist, album) identity
    ///   already exists (unique index)
    /// - Database error occurs
    async fn insert(&self, song: &NewSong) -> Result<SongId>;

    /// Find a song by its ID
    ///
    /// # Returns
    /// - `Ok(Some(record))` if found
    /// - `Ok(None)` if not found
    async fn find_by_id(&self, id: SongId) -> Result<Option<SongRecord>>;

    /// Fetch every song in the catalog, oldest first
    async fn find_all(&self) -> Result<Vec<SongRecord>>;

    /// Look up a song by its case-insensitive (title, artist, album)
    /// identity
    async fn find_duplicate(&self, title: &str, artist: &str, album: &str)
        -> Result<Option<SongId>>;

    /// Apply a partial edit to the user-editable fields
    ///
    /// # Errors
    /// Returns [`LibraryError::NotFound`] if the id is absent.
    async fn update(&self, id: SongId, edit: &SongEdit) -> Result<()>;

    /// Delete a song by ID
    ///
    /// # Returns
    /// - `Ok(true)` if the song was deleted
    /// - `Ok(false)` if the song was not found
    async fn delete(&self, id: SongId) -> Result<bool>;

    /// Count total songs
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of SongRepository
pub struct SqliteSongRepository {
    pool: SqlitePool,
}

impl SqliteSongRepository {
    /// Create a new SqliteSongRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn insert(&self, song: &NewSong) -> Result<SongId> {
        song.validate().map_err(|e| LibraryError::InvalidInput {
            field: "Song".to_string(),
            message: e,
        })?;

        let now = chrono::Utc::now().timestamp();

        let result = query(
            r#"
            INSERT INTO songs (
                title, normalized_title, artist, normalized_artist,
                album, normalized_album, genre, category, sub_category,
                duration_secs, content_type, audio_data,
                artwork_data, artwork_format, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&song.title)
        .bind(normalize(&song.title))
        .bind(&song.artist)
        .bind(normalize(&song.artist))
        .bind(&song.album)
        .bind(normalize(&song.album))
        .bind(&song.genre)
        .bind(&song.category)
        .bind(&song.sub_category)
        .bind(song.duration_secs)
        .bind(&song.audio.content_type)
        .bind(&song.audio.data)
        .bind(song.artwork.as_ref().map(|a| a.data.as_slice()))
        .bind(song.artwork.as_ref().map(|a| a.format.as_str()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(SongId(result.last_insert_rowid()))
    }

    async fn find_by_id(&self, id: SongId) -> Result<Option<SongRecord>> {
        let record = query_as::<_, SongRecord>("SELECT * FROM songs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_all(&self) -> Result<Vec<SongRecord>> {
        let records = query_as::<_, SongRecord>("SELECT * FROM songs ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn find_duplicate(
        &self,
        title: &str,
        artist: &str,
        album: &str,
    ) -> Result<Option<SongId>> {
        let id = query_as::<_, (SongId,)>(
            r#"
            SELECT id FROM songs
            WHERE normalized_title = ? AND normalized_artist = ? AND normalized_album = ?
            "#,
        )
        .bind(normalize(title))
        .bind(normalize(artist))
        .bind(normalize(album))
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(|(id,)| id))
    }

    async fn update(&self, id: SongId, edit: &SongEdit) -> Result<()> {
        // COALESCE keeps unedited fields; normalized columns follow their
        // source field.
        let result = query(
            r#"
            UPDATE songs SET
                title = COALESCE(?, title),
                normalized_title = COALESCE(?, normalized_title),
                artist = COALESCE(?, artist),
                normalized_artist = COALESCE(?, normalized_artist),
                album = COALESCE(?, album),
                normalized_album = COALESCE(?, normalized_album),
                genre = COALESCE(?, genre),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&edit.title)
        .bind(edit.title.as_deref().map(normalize))
        .bind(&edit.artist)
        .bind(edit.artist.as_deref().map(normalize))
        .bind(&edit.album)
        .bind(edit.album.as_deref().map(normalize))
        .bind(&edit.genre)
        .bind(chrono::Utc::now().timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound {
                entity_type: "Song".to_string(),
                id: id.0,
            });
        }

        Ok(())
    }

    async fn delete(&self, id: SongId) -> Result<bool> {
        let result = query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = query_as("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{StoredArtwork, StoredAudio};
    use crate::db::create_test_pool;

    fn new_song(title: &str, artist: &str, album: &str) -> NewSong {
        NewSong {
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            genre: "Unknown Genre".to_string(),
            category: None,
            sub_category: None,
            duration_secs: 180.0,
            audio: StoredAudio {
                data: b"fake audio payload".to_vec(),
                content_type: "audio/mpeg".to_string(),
            },
            artwork: Some(StoredArtwork {
                data: b"\x89PNG artwork".to_vec(),
                format: "image/png".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_song() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        let id = repo.insert(&new_song("Song A", "Artist X", "Album 1")).await.unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.title, "Song A");
        assert_eq!(found.normalized_title, "song a");
        assert_eq!(found.content_type, "audio/mpeg");
        assert_eq!(found.audio_data, b"fake audio payload");
        assert_eq!(found.artwork_format.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_ids_are_auto_incrementing() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        let first = repo.insert(&new_song("One", "A", "X")).await.unwrap();
        let second = repo.insert(&new_song("Two", "B", "Y")).await.unwrap();

        assert_eq!(first, SongId(1));
        assert_eq!(second, SongId(2));
    }

    #[tokio::test]
    async fn test_find_duplicate_is_case_insensitive() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        let id = repo.insert(&new_song("Song A", "Artist X", "Album 1")).await.unwrap();

        let hit = repo
            .find_duplicate("  SONG a ", "artist x", "ALBUM 1")
            .await
            .unwrap();
        assert_eq!(hit, Some(id));

        let miss = repo
            .find_duplicate("Song A", "Artist X", "Album 2")
            .await
            .unwrap();
        assert_eq!(miss, None);
    }

    #[tokio::test]
    async fn test_unique_index_backstops_duplicates() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        repo.insert(&new_song("Song A", "Artist X", "Album 1")).await.unwrap();
        let result = repo.insert(&new_song("SONG A", "artist x", "album 1")).await;

        assert!(result.is_err(), "identity collision should be rejected by the store");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        let id = repo.insert(&new_song("Song A", "Artist X", "Album 1")).await.unwrap();

        repo.update(
            id,
            &SongEdit {
                genre: Some("Jazz".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.genre, "Jazz");
        assert_eq!(found.title, "Song A", "unedited fields must survive");

        repo.update(
            id,
            &SongEdit {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.title, "Renamed");
        assert_eq!(found.normalized_title, "renamed");
    }

    #[tokio::test]
    async fn test_update_missing_song_is_not_found() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        let result = repo
            .update(
                SongId(42),
                &SongEdit {
                    title: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(LibraryError::NotFound { id: 42, .. })));
    }

    #[tokio::test]
    async fn test_delete_song() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        let id = repo.insert(&new_song("Song A", "Artist X", "Album 1")).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_returns_insertion_order() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        repo.insert(&new_song("First", "A", "X")).await.unwrap();
        repo.insert(&new_song("Second", "B", "Y")).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "First");
        assert_eq!(all[1].title, "Second");
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_song() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteSongRepository::new(pool);

        let mut song = new_song("Song A", "Artist X", "Album 1");
        song.audio.data.clear();

        let result = repo.insert(&song).await;
        assert!(matches!(result, Err(LibraryError::InvalidInput { .. })));
    }
}
