//! Output module for run reports
//!
//! This module handles:
//! - The summary of one crawl run ([`RunReport`])
//! - Why the run stopped ([`StopReason`])
//! - Printing reports to stdout

mod report;

pub use report::{print_report, RunReport, StopReason};
