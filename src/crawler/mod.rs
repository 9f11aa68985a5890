//! Crawler module for case enumeration and document retrieval
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport with a browser-like header set
//! - Retrying case fetches with exponential backoff
//! - Randomized pacing between cases
//! - The enumeration loop with its early-stop heuristic

mod controller;
mod pacing;
mod retry;
mod transport;

pub use controller::CrawlController;
pub use pacing::Pacing;
pub use retry::{RetryPolicy, RetryingFetcher};
pub use transport::{build_http_client, Transport};

use crate::config::{Config, CourtEntry};
use crate::output::RunReport;
use crate::storage::FileStore;
use crate::Result;

/// Runs the crawl loop for every configured court, one after another
///
/// Documents are written below `output_root`. Each court gets its own
/// output directory, named by the configured pattern.
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `output_root` - Root directory for saved documents
///
/// # Returns
///
/// * `Ok(Vec<RunReport>)` - One report per court, in configuration order
/// * `Err(HarvestError)` - A controller could not be built
///
/// # Example
///
/// ```no_run
/// use docket_harvest::config::load_config;
/// use docket_harvest::crawler::crawl_all;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let reports = crawl_all(&config, Path::new(".")).await?;
/// println!("{} runs", reports.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl_all(config: &Config, output_root: &std::path::Path) -> Result<Vec<RunReport>> {
    let mut reports = Vec::with_capacity(config.courts.len());
    for court in &config.courts {
        reports.push(crawl_court(config, court, output_root).await?);
    }
    Ok(reports)
}

/// Runs the crawl loop over one court's configured range
pub async fn crawl_court(
    config: &Config,
    court: &CourtEntry,
    output_root: &std::path::Path,
) -> Result<RunReport> {
    let store = FileStore::new(output_root);
    let mut controller = CrawlController::from_config(config, court, store)?;
    controller.run(court.start, court.end).await
}
