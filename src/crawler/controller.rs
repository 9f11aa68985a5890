//! Crawl controller - the enumeration loop
//!
//! This module drives one court's sequence range:
//! - Formatting case IDs and detail URLs
//! - Fetching each case through the retrying fetcher
//! - Downloading and saving matched documents
//! - Miss-streak early stop and failed-ID bookkeeping
//! - Pacing and progress reporting

use crate::case::{detail_url, CaseCategory, CaseId, CaseTemplate, DocumentNaming};
use crate::config::{Config, CourtEntry};
use crate::crawler::{Pacing, RetryPolicy, RetryingFetcher, Transport};
use crate::extract::{DispositionStatus, DocumentExtractor, DocumentMatch};
use crate::output::{RunReport, StopReason};
use crate::state::{CrawlOutcome, CrawlRunState};
use crate::storage::DocumentStore;
use crate::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use url::Url;

/// Drives the crawl loop for one case category
pub struct CrawlController<S: DocumentStore> {
    fetcher: RetryingFetcher,
    store: S,
    pacing: Pacing,
    base_url: Url,
    case_path: String,
    template: CaseTemplate,
    category: CaseCategory,
    directory: PathBuf,
    naming: DocumentNaming,
    miss_threshold: u32,
    progress_interval: u64,
}

impl<S: DocumentStore> CrawlController<S> {
    /// Creates a controller for one configured court
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `court` - The court whose sequence range will be walked
    /// * `store` - Where matched documents are written
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlController)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client, a pattern or a selector could not be built
    pub fn from_config(config: &Config, court: &CourtEntry, store: S) -> Result<Self> {
        let transport = Transport::new(&config.request)?;
        let extractor = DocumentExtractor::new(config.rules.clone());
        let fetcher =
            RetryingFetcher::new(transport, extractor, RetryPolicy::from_config(&config.crawl))?;

        let category = config.category(court);
        let directory = PathBuf::from(category.render(&config.directory_template()?)?);

        Ok(Self {
            fetcher,
            store,
            pacing: Pacing::from_config(&config.crawl),
            base_url: config.base_url()?,
            case_path: config.site.case_path.clone(),
            template: config.case_template()?,
            category,
            directory,
            naming: config.naming(),
            miss_threshold: config.crawl.miss_threshold,
            progress_interval: config.crawl.progress_interval.max(1),
        })
    }

    /// Output directory of this run, relative to the store root
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Formats the case ID for sequence number `seq`
    pub fn case_id(&self, seq: u32) -> Result<CaseId> {
        Ok(CaseId::new(seq, &self.template, &self.category)?)
    }

    /// Builds the detail page URL of a case
    pub fn case_url(&self, id: &CaseId) -> Result<Url> {
        Ok(detail_url(&self.base_url, &self.case_path, id, &self.category)?)
    }

    /// Filename a matched document would be saved under
    pub fn filename(
        &self,
        id: &CaseId,
        document: &DocumentMatch,
        disposition: Option<DispositionStatus>,
    ) -> String {
        self.naming.filename(id, document, disposition)
    }

    /// Fetches and scans a single case without downloading anything
    pub async fn probe(&self, seq: u32) -> Result<(CaseId, CrawlOutcome)> {
        let id = self.case_id(seq)?;
        let url = self.case_url(&id)?;
        let outcome = self.fetcher.fetch_case(&id, &url).await;
        Ok((id, outcome))
    }

    /// Walks the sequence range starting at `start`
    ///
    /// The loop stops after `end` has been processed, or once `miss_threshold`
    /// consecutive cases had no primary section. A `start` past `end`
    /// processes nothing. Failed cases reset the miss
    /// streak and are listed in the report.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The run finished
    /// * `Err(HarvestError)` - A case ID or URL could not be formatted
    pub async fn run(&mut self, start: u32, end: Option<u32>) -> Result<RunReport> {
        let started_at = Utc::now();
        let mut state = CrawlRunState::new(start);

        tracing::info!(
            "Starting run for {} at {} (end: {})",
            self.directory.display(),
            start,
            end.map_or_else(|| "open".to_string(), |e| e.to_string())
        );

        let stop_reason = loop {
            let seq = state.cursor();
            if let Some(end) = end.filter(|end| seq > *end) {
                tracing::warn!("Start {} is past the end of the range ({})", seq, end);
                break StopReason::EndReached { last: end };
            }

            let id = self.case_id(seq)?;
            let url = self.case_url(&id)?;

            let outcome = self.fetcher.fetch_case(&id, &url).await;
            tracing::debug!("{}: {}", id, outcome);

            match outcome {
                CrawlOutcome::Matched {
                    documents,
                    disposition,
                } => {
                    state.record_match();
                    self.save_documents(&id, &documents, disposition, &mut state)
                        .await;
                }
                CrawlOutcome::NoTargetSection => {
                    let streak = state.record_miss();
                    if streak >= self.miss_threshold {
                        tracing::info!(
                            "Stopping after {} consecutive cases without a target section",
                            streak
                        );
                        break StopReason::MissStreak { last: seq, streak };
                    }
                }
                CrawlOutcome::TransientFailure { reason }
                | CrawlOutcome::PermanentFailure { reason } => {
                    tracing::warn!("Case {} failed: {}", id, reason);
                    state.record_failure(id);
                }
            }

            if state.processed() % self.progress_interval == 0 {
                tracing::info!(
                    "Progress: {} cases processed, {} matched, {} documents saved, {} failed (at {})",
                    state.processed(),
                    state.matched(),
                    state.documents_saved(),
                    state.failed().len(),
                    seq
                );
            }

            if end.is_some_and(|end| seq >= end) || state.advance().is_none() {
                break StopReason::EndReached { last: seq };
            }

            self.pacing.wait().await;
        };

        let report = RunReport {
            label: self.directory.display().to_string(),
            started_at,
            finished_at: Utc::now(),
            processed: state.processed(),
            matched: state.matched(),
            documents_saved: state.documents_saved(),
            stop_reason,
            failed_ids: state.into_failed(),
        };

        tracing::info!(
            "Run finished: {} cases processed, {} documents saved, {} failed; {}",
            report.processed,
            report.documents_saved,
            report.failed_ids.len(),
            report.stop_reason
        );

        Ok(report)
    }

    async fn save_documents(
        &mut self,
        id: &CaseId,
        documents: &[DocumentMatch],
        disposition: Option<DispositionStatus>,
        state: &mut CrawlRunState,
    ) {
        for document in documents {
            let filename = self.naming.filename(id, document, disposition);
            match self.download(document, &filename).await {
                Ok(path) => {
                    state.record_saved();
                    tracing::info!("Saved {}", path.display());
                }
                Err(e) => {
                    tracing::error!("Failed to save {} of {}: {}", document.kind, id, e);
                    state.record_save_failure(id);
                }
            }
        }
    }

    async fn download(&mut self, document: &DocumentMatch, filename: &str) -> Result<PathBuf> {
        let bytes = self.fetcher.fetch_document(&document.url).await?;
        Ok(self.store.save(&bytes, filename, &self.directory)?)
    }
}
