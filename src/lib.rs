//! Workspace placeholder crate.
//!
//! This crate exists to expose the individual workspace crates behind a
//! single dependency. Host shells can depend on `tunepocket` and reach the
//! persistence gateway (`core-library`), the import/playlist services
//! (`core-service`), and the collaborator contracts (`collab-traits`)
//! without wiring each crate individually. The `lofty-tags` feature pulls
//! in the default tag extractor from `core-metadata`.

pub use collab_traits;
pub use core_library;
#[cfg(feature = "lofty-tags")]
pub use core_metadata;
pub use core_service;
