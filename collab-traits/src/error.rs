use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollabError {
    #[error("Collaborator not available: {0}")]
    NotAvailable(String),

    #[error("Tag extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Remote file fetch failed: {0}")]
    FetchFailed(String),

    #[error("Remote file not found: {0}")]
    FileNotFound(String),

    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Classification failed: {0}")]
    ClassificationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CollabError>;
