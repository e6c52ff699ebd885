//! Service façade and bootstrap helpers.
//!
//! This crate wires collaborator implementations (tag extraction, remote
//! file fetching, chat notification, genre classification) onto the
//! library gateway and exposes the user-facing operations: importing
//! songs, managing playlists, loading catalog views, and handling chat
//! hand-offs.

pub mod catalog;
pub mod error;
pub mod handoff;
pub mod import;
pub mod logging;
pub mod playlists;

pub use error::{Result, ServiceError};
pub use handoff::{HandoffService, StartParam};
pub use import::{AudioUpload, ImportPipeline, MAX_IMPORT_BYTES};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
pub use playlists::{AddSongsOutcome, PlaylistManager};

use collab_traits::TagSource;
use core_library::Library;
use std::sync::Arc;

/// Aggregated handle over one library: import pipeline plus playlist
/// operations, sharing the same storage.
#[derive(Clone)]
pub struct LibraryService {
    library: Library,
    pipeline: ImportPipeline,
    playlists: PlaylistManager,
}

impl LibraryService {
    /// Create a service over an explicit library handle.
    pub fn new(library: Library, tags: Arc<dyn TagSource>) -> Self {
        Self {
            pipeline: ImportPipeline::new(library.clone(), tags),
            playlists: PlaylistManager::new(library.clone()),
            library,
        }
    }

    /// Create a service over the process-wide shared library, opening it
    /// on first use. Requires [`Library::configure_shared`] to have run.
    pub async fn connect_shared(tags: Arc<dyn TagSource>) -> Result<Self> {
        let library = Library::shared().await?;
        Ok(Self::new(library, tags))
    }

    /// Attach an optional genre classifier to the import pipeline.
    pub fn with_classifier(
        mut self,
        classifier: Arc<dyn collab_traits::GenreClassifier>,
    ) -> Self {
        self.pipeline = self.pipeline.with_classifier(classifier);
        self
    }

    /// The import pipeline
    pub fn imports(&self) -> &ImportPipeline {
        &self.pipeline
    }

    /// Playlist operations
    pub fn playlists(&self) -> &PlaylistManager {
        &self.playlists
    }

    /// The underlying library handle
    pub fn library(&self) -> &Library {
        &self.library
    }
}
