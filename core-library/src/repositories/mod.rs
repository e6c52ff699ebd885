//! # Repository Pattern Implementation
//!
//! Repository traits and SQLite implementations for the two record
//! collections the gateway owns.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//! - Each mutation is a single atomic statement or transaction; there are
//!   no cross-operation transactions
//!
//! ## Available Repositories
//!
//! - `SongRepository` - Songs with inline audio/artwork payloads and
//!   case-insensitive identity lookup
//! - `PlaylistRepository` - Playlists with unique-membership management
//!   and song-deletion cleanup

pub mod playlist;
pub mod song;

pub use playlist::{PlaylistRepository, SqlitePlaylistRepository};
pub use song::{SongRepository, SqliteSongRepository};
