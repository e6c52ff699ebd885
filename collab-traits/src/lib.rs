//! # Collaborator Contracts
//!
//! Narrow async contracts between the library core and its external
//! collaborators. The core never talks to a tag parser, a chat platform,
//! or a classification service directly; it only sees these traits.
//!
//! ## Traits
//!
//! - [`TagSource`](metadata::TagSource) - Extract tags and embedded
//!   pictures from an in-memory audio payload
//! - [`RemoteFileSource`](remote::RemoteFileSource) - Resolve an opaque
//!   file identifier from the chat platform into bytes
//! - [`Notifier`](notify::Notifier) - Fire-and-forget acknowledgement
//!   messages back to the chat platform
//! - [`GenreClassifier`](classify::GenreClassifier) - Optional
//!   category/sub-category enrichment from a generative service
//!
//! Every implementation applies its own timeout policy and surfaces
//! failure as [`CollabError`](error::CollabError); the core treats any
//! such failure according to the calling pipeline's rules (fatal for tag
//! extraction and remote fetch, logged-only for notification and
//! classification).

pub mod classify;
pub mod error;
pub mod metadata;
pub mod notify;
pub mod remote;

pub use classify::{GenreClassifier, GenreTags};
pub use error::{CollabError, Result};
pub use metadata::{ParsedPicture, ParsedTags, TagSource};
pub use notify::{DeliveryReceipt, Notifier};
pub use remote::{RemoteFile, RemoteFileSource};
