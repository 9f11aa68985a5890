//! Configuration module for Docket-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docket_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Stopping after {} misses", config.crawl.miss_threshold);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CaseConfig, Config, CourtEntry, CrawlConfig, OutputConfig, RequestConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
