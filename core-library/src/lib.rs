//! # Library Persistence Core
//!
//! Single authoritative access point to the durable song/playlist store.
//!
//! ## Overview
//!
//! - [`db`] - SQLite pool configuration, embedded migrations, and the
//!   process-wide shared gateway with concurrency-safe lazy open
//! - [`models`] - Stored and live domain models with validation
//! - [`codec`] - Conversion between storable buffers and playable
//!   payloads, including the ephemeral media URL registry
//! - [`repositories`] - Per-entity repository traits and SQLite
//!   implementations
//!
//! The durable record owned by this crate is the source of truth; every
//! in-memory view is derived and reconstructible from it.

pub mod codec;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use db::{create_pool, create_test_pool, DatabaseConfig, Library};
pub use error::{LibraryError, Result};
