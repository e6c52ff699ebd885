//! Catalog Views
//!
//! Read-side helpers for the rendering surface: load the whole catalog in
//! insertion order, group it by genre and artist, and project playlist
//! membership onto loaded songs.

use crate::error::Result;
use core_library::models::{Song, SongId};
use core_library::repositories::SongRepository;
use core_library::Library;
use std::collections::BTreeMap;
use tracing::debug;

/// Load every song in the catalog, insertion order, each materialized with
/// a fresh media URL.
pub async fn load_all(library: &Library) -> Result<Vec<Song>> {
    let records = library.songs().find_all().await?;
    debug!(count = records.len(), "Loaded catalog");

    Ok(records.into_iter().map(|r| r.into_playable()).collect())
}

/// Group loaded songs by genre, then by artist within each genre.
///
/// Songs enriched with a category are grouped under it; unenriched songs
/// fall back to their free-text genre. Keys are sorted; songs within a
/// group keep their relative order.
pub fn group_by_genre_and_artist(songs: &[Song]) -> BTreeMap<String, BTreeMap<String, Vec<&Song>>> {
    let mut groups: BTreeMap<String, BTreeMap<String, Vec<&Song>>> = BTreeMap::new();

    for song in songs {
        let genre = song.category.as_deref().unwrap_or(&song.genre);
        groups
            .entry(genre.to_string())
            .or_default()
            .entry(song.artist.clone())
            .or_default()
            .push(song);
    }

    groups
}

/// Project a playlist's member ids onto loaded songs, keeping membership
/// order. Ids with no loaded counterpart are skipped.
pub fn playlist_songs<'a>(songs: &'a [Song], member_ids: &[SongId]) -> Vec<&'a Song> {
    member_ids
        .iter()
        .filter_map(|id| songs.iter().find(|s| s.id == *id))
        .collect()
}
