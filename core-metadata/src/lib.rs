//! # Audio Tag Extraction
//!
//! The shipped implementation of the [`TagSource`](collab_traits::TagSource)
//! contract, built on the `lofty` crate, plus artwork helpers.
//!
//! The import pipeline depends only on the contract; hosts that bring
//! their own extractor can skip this crate entirely.

pub mod artwork;
pub mod error;
pub mod extractor;

pub use error::{MetadataError, Result};
pub use extractor::TagReader;
