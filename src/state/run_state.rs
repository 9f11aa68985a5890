//! In-memory state of one crawl run

use crate::case::CaseId;

/// Counters and bookkeeping for one invocation of the crawl loop
///
/// Nothing here is persisted. A restarted run walks again from the start
/// sequence it is given.
#[derive(Debug, Clone)]
pub struct CrawlRunState {
    cursor: u32,
    consecutive_misses: u32,
    failed: Vec<CaseId>,
    processed: u64,
    matched: u64,
    documents_saved: u64,
}

impl CrawlRunState {
    /// Creates a run state positioned at `start`
    pub fn new(start: u32) -> Self {
        Self {
            cursor: start,
            consecutive_misses: 0,
            failed: Vec::new(),
            processed: 0,
            matched: 0,
            documents_saved: 0,
        }
    }

    /// The sequence number currently being processed
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Moves to the next sequence number
    ///
    /// Returns `None` once the sequence space is exhausted.
    pub fn advance(&mut self) -> Option<u32> {
        self.cursor = self.cursor.checked_add(1)?;
        Some(self.cursor)
    }

    /// Records a scanned page with its primary section present
    pub fn record_match(&mut self) {
        self.processed += 1;
        self.matched += 1;
        self.consecutive_misses = 0;
    }

    /// Records a page without the primary section and returns the streak length
    pub fn record_miss(&mut self) -> u32 {
        self.processed += 1;
        self.consecutive_misses += 1;
        self.consecutive_misses
    }

    /// Records a case that could not be processed
    ///
    /// A failure is not evidence of the end of the populated range, so it
    /// resets the miss streak.
    pub fn record_failure(&mut self, id: CaseId) {
        self.processed += 1;
        self.consecutive_misses = 0;
        self.failed.push(id);
    }

    /// Records a failure to persist a document of an already matched case
    pub fn record_save_failure(&mut self, id: &CaseId) {
        if self.failed.last() != Some(id) {
            self.failed.push(id.clone());
        }
    }

    pub fn record_saved(&mut self) {
        self.documents_saved += 1;
    }

    pub fn consecutive_misses(&self) -> u32 {
        self.consecutive_misses
    }

    pub fn failed(&self) -> &[CaseId] {
        &self.failed
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn matched(&self) -> u64 {
        self.matched
    }

    pub fn documents_saved(&self) -> u64 {
        self.documents_saved
    }

    /// Consumes the state, returning the failed IDs in the order they failed
    pub fn into_failed(self) -> Vec<CaseId> {
        self.failed
    }
}
