//! Docket-Harvest: a polite court-docket document harvester
//!
//! This crate walks a dense range of case numbers on a court case-search site,
//! fetches each case's detail page, picks specific documents (petitions and
//! briefs) out of the page's nested grids, and saves them under deterministic
//! filenames.

pub mod case;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod page;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Docket-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

impl HarvestError {
    /// Returns true if the error is worth retrying after a backoff
    ///
    /// Timeouts, connection failures and non-2xx responses are transient.
    /// Everything else is assumed to fail the same way on the next attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Status { .. } | Self::Timeout { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] TemplateError),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Errors raised while parsing or rendering a name pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),

    #[error("unclosed placeholder in '{0}'")]
    Unclosed(String),

    #[error("stray '}}' in '{0}'")]
    StrayBrace(String),

    #[error("invalid width '{0}'")]
    InvalidWidth(String),

    #[error("placeholder '{{{0}}}' is not available here")]
    Unavailable(String),
}

/// Result type alias for Docket-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use case::{CaseCategory, CaseId, CaseTemplate};
pub use config::Config;
pub use crawler::{CrawlController, RetryingFetcher, Transport};
pub use extract::{DispositionStatus, DocumentExtractor, DocumentKind, DocumentMatch, FilerRole};
pub use state::{CrawlOutcome, CrawlRunState};
