//! Storage module for persisting downloaded documents
//!
//! This module handles writing documents to disk:
//! - one output directory per court run, created on demand
//! - deterministic filenames, with later saves replacing earlier ones

mod fs;
mod traits;

pub use fs::FileStore;
pub use traits::{DocumentStore, StoreError, StoreResult};
