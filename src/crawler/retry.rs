//! Retrying case fetcher
//!
//! Wraps the transport, page model and extractor for one case at a time:
//! - Fetch the detail page, retrying transient failures with backoff
//! - Parse and scan the page for documents
//! - Classify the result as a [`CrawlOutcome`]

use crate::case::CaseId;
use crate::config::CrawlConfig;
use crate::crawler::Transport;
use crate::extract::DocumentExtractor;
use crate::page::PageModel;
use crate::state::CrawlOutcome;
use crate::{ConfigError, HarvestError, Result};
use rand::Rng;
use std::time::Duration;
use url::Url;

/// Attempt limit and backoff unit for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per request, including the first
    pub max_attempts: u32,

    /// Backoff unit
    pub unit: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            unit: Duration::from_millis(config.backoff_unit_ms),
        }
    }

    /// Delay after the `failed_attempt`-th failed attempt (1-based)
    ///
    /// The delay is `unit * (2^(k-1) + r)` with `r` drawn uniformly from [0, 1).
    pub fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1).min(16) as i32;
        let jitter: f64 = rand::rng().random();
        self.unit.mul_f64(2f64.powi(exponent) + jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlConfig::default())
    }
}

/// Fetches and scans one case, retrying transient failures
#[derive(Debug)]
pub struct RetryingFetcher {
    transport: Transport,
    model: PageModel,
    extractor: DocumentExtractor,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    /// Creates a fetcher, compiling the page selectors the extractor expects
    pub fn new(
        transport: Transport,
        extractor: DocumentExtractor,
        policy: RetryPolicy,
    ) -> std::result::Result<Self, ConfigError> {
        let model = PageModel::new(&extractor.page_layout())?;
        Ok(Self {
            transport,
            model,
            extractor,
            policy,
        })
    }

    /// Fetches and scans the detail page of case `id`
    ///
    /// # Returns
    ///
    /// * `Matched` - The primary section exists (documents may be empty)
    /// * `NoTargetSection` - The page loaded without the primary section
    /// * `PermanentFailure` - Attempts exhausted, or a non-retryable error
    ///
    /// `TransientFailure` is never returned; it only describes a single
    /// failed attempt.
    pub async fn fetch_case(&self, id: &CaseId, url: &Url) -> CrawlOutcome {
        let mut attempt = 1;
        loop {
            let reason = match self.attempt_case(url).await {
                CrawlOutcome::TransientFailure { reason } => reason,
                outcome => return outcome,
            };

            if attempt >= self.policy.max_attempts {
                tracing::error!(
                    "Giving up on {} after {} attempts: {}",
                    id,
                    attempt,
                    reason
                );
                return CrawlOutcome::PermanentFailure { reason };
            }

            let delay = self.policy.backoff_delay(attempt);
            tracing::warn!(
                "Attempt {}/{} for {} failed: {} (retrying in {:?})",
                attempt,
                self.policy.max_attempts,
                id,
                reason,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Downloads a matched document with the same retry policy
    pub async fn fetch_document(&self, url: &Url) -> Result<Vec<u8>> {
        let mut attempt = 1;
        loop {
            let error = match self.transport.fetch(url).await {
                Ok((bytes, _)) => return Ok(bytes),
                Err(e) => e,
            };

            if !error.is_transient() || attempt >= self.policy.max_attempts {
                return Err(error);
            }

            let delay = self.policy.backoff_delay(attempt);
            tracing::warn!(
                "Download attempt {}/{} failed: {} (retrying in {:?})",
                attempt,
                self.policy.max_attempts,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt_case(&self, url: &Url) -> CrawlOutcome {
        match self.transport.fetch(url).await {
            Ok((bytes, _)) => self.scan(&bytes, url),
            Err(e) => failure_outcome(e),
        }
    }

    /// Parses `bytes` as the page at `url` and applies the extraction rules
    ///
    /// Parsing is synchronous; the parsed page never outlives this call.
    pub fn scan(&self, bytes: &[u8], url: &Url) -> CrawlOutcome {
        let page = self.model.parse(bytes, url.clone());
        let extraction = self.extractor.extract(&page);

        if !extraction.primary_section_found {
            if !extraction.documents.is_empty() {
                tracing::debug!(
                    "Discarding {} document(s) on {}: section '{}' not found",
                    extraction.documents.len(),
                    url,
                    self.extractor.rules().primary_section
                );
            }
            return CrawlOutcome::NoTargetSection;
        }

        CrawlOutcome::Matched {
            documents: extraction.documents,
            disposition: extraction.disposition,
        }
    }
}

fn failure_outcome(error: HarvestError) -> CrawlOutcome {
    if error.is_transient() {
        CrawlOutcome::TransientFailure {
            reason: error.to_string(),
        }
    } else {
        CrawlOutcome::PermanentFailure {
            reason: error.to_string(),
        }
    }
}
