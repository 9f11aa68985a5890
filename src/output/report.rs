//! Run reports
//!
//! A [`RunReport`] summarises one pass of the crawl loop over a court's
//! sequence range and is printed once the pass finishes.

use crate::case::CaseId;
use chrono::{DateTime, Utc};
use std::fmt;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured end of the range (or of the sequence space) was reached
    ///
    /// `last` is the final sequence number of the range.
    EndReached { last: u32 },

    /// Too many consecutive cases had no primary section
    MissStreak { last: u32, streak: u32 },
}

impl StopReason {
    /// Last sequence number of the run
    pub fn last(&self) -> u32 {
        match self {
            Self::EndReached { last } | Self::MissStreak { last, .. } => *last,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndReached { last } => write!(f, "end of range reached at {}", last),
            Self::MissStreak { last, streak } => write!(
                f,
                "{} consecutive cases without a target section (last {})",
                streak, last
            ),
        }
    }
}

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Human-readable name of the run (the output directory)
    pub label: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Cases fetched, whatever their outcome
    pub processed: u64,

    /// Cases whose primary section was found
    pub matched: u64,

    pub documents_saved: u64,

    /// Cases that could not be processed, in the order they failed
    pub failed_ids: Vec<CaseId>,

    pub stop_reason: StopReason,
}

impl RunReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Returns true if every case was processed without error
    pub fn is_clean(&self) -> bool {
        self.failed_ids.is_empty()
    }
}

/// Prints a run report to stdout
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &RunReport) {
    println!("=== Run Report: {} ===\n", report.label);

    println!("Overview:");
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {}s", report.duration().num_seconds());
    println!("  Stopped: {}", report.stop_reason);
    println!("  Last sequence: {}", report.stop_reason.last());
    println!();

    let match_rate = if report.processed > 0 {
        (report.matched as f64 / report.processed as f64) * 100.0
    } else {
        0.0
    };

    println!("Cases:");
    println!("  Processed: {}", report.processed);
    println!("  Matched: {} ({:.1}%)", report.matched, match_rate);
    println!("  Documents saved: {}", report.documents_saved);
    println!();

    if report.is_clean() {
        println!("No failed cases");
    } else {
        println!("Failed Cases ({}):", report.failed_ids.len());
        for id in &report.failed_ids {
            println!("  - {} (seq {})", id, id.seq());
        }
    }
    println!();
}
