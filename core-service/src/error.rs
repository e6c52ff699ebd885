use collab_traits::CollabError;
use core_library::LibraryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("File is larger than the {limit_bytes} byte limit ({actual_bytes} bytes)")]
    FileTooLarge {
        actual_bytes: usize,
        limit_bytes: usize,
    },

    #[error("\"{title}\" by {artist} ({album}) is already in the library")]
    DuplicateSong {
        title: String,
        artist: String,
        album: String,
    },

    #[error("Invalid playlist name: {0}")]
    InvalidName(String),

    #[error("Invalid start parameter: {0}")]
    InvalidStartParam(String),

    #[error("Collaborator failure: {0}")]
    Collaborator(#[from] CollabError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Logging init failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
