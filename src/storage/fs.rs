//! Filesystem storage implementation
//!
//! This module provides a directory-based implementation of the DocumentStore trait.

use crate::storage::traits::{DocumentStore, StoreError, StoreResult};
use std::path::{Component, Path, PathBuf};

/// Writes documents below a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`
    ///
    /// Relative output directories are resolved against the root; absolute
    /// ones are used as given.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentStore for FileStore {
    fn save(&mut self, bytes: &[u8], filename: &str, directory: &Path) -> StoreResult<PathBuf> {
        // The filename must stay inside the directory
        let mut components = Path::new(filename).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(StoreError::InvalidFilename(filename.to_string()));
        }

        let dir = self.root.join(directory);
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(filename);
        std::fs::write(&path, bytes).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}
