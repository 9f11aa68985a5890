//! Storage traits and error types
//!
//! This module defines the trait interface for document stores and
//! associated error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for document store implementations
///
/// The crawl controller persists every matched document through this trait.
/// Saving under an existing name replaces the previous content.
pub trait DocumentStore {
    /// Saves `bytes` as `filename` inside `directory`
    ///
    /// # Arguments
    ///
    /// * `bytes` - The document payload
    /// * `filename` - A single path component
    /// * `directory` - The run's output directory, created if missing
    ///
    /// # Returns
    ///
    /// The path the document was written to
    fn save(&mut self, bytes: &[u8], filename: &str, directory: &Path) -> StoreResult<PathBuf>;
}
