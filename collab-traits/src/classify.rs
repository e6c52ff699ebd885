//! Genre Classification Contract
//!
//! Optional enrichment from a generative service: given the free-text
//! tags of a song, produce a coarse category and sub-category for
//! grouping. The import pipeline works without a classifier; when one is
//! configured, its failures are logged and the song is stored unenriched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Category pair produced by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreTags {
    /// Broad category (e.g. "Rock")
    pub category: String,
    /// Finer grouping within the category (e.g. "Indie Rock")
    pub sub_category: String,
}

/// Classifies songs into category/sub-category pairs.
#[async_trait]
pub trait GenreClassifier: Send + Sync {
    /// Classify a song from its free-text tags.
    async fn classify(&self, title: &str, artist: &str, genre: &str) -> Result<GenreTags>;
}
