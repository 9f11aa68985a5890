//! State module for tracking crawl progress
//!
//! This module provides the per-case outcome and the per-run bookkeeping.
//!
//! # Components
//!
//! - `CrawlOutcome`: What fetching one case produced (matched, miss, failure)
//! - `CrawlRunState`: Cursor, miss streak and failed IDs for one run

mod outcome;
mod run_state;

// Re-export main types
pub use outcome::CrawlOutcome;
pub use run_state::CrawlRunState;
