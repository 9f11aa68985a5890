/// Per-case crawl outcomes
///
/// This module defines everything that can come out of fetching one case.
use crate::extract::{DispositionStatus, DocumentMatch};
use std::fmt;

/// Result of fetching and scanning one case page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    // ===== Success =====
    /// The primary section was present; `documents` may be empty
    Matched {
        documents: Vec<DocumentMatch>,
        disposition: Option<DispositionStatus>,
    },

    // ===== Miss =====
    /// The page loaded but has no primary section
    NoTargetSection,

    // ===== Failures =====
    /// A retryable error on a single attempt
    TransientFailure { reason: String },

    /// Retries exhausted, or an error that retrying cannot fix
    PermanentFailure { reason: String },
}

impl CrawlOutcome {
    /// Returns true for outcomes the controller records as failed IDs
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::TransientFailure { .. } | Self::PermanentFailure { .. }
        )
    }

    /// Returns true if the page was scanned successfully
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Short name used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched { .. } => "matched",
            Self::NoTargetSection => "no_target_section",
            Self::TransientFailure { .. } => "transient_failure",
            Self::PermanentFailure { .. } => "permanent_failure",
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched { documents, .. } => {
                write!(f, "{} ({} documents)", self.label(), documents.len())
            }
            Self::TransientFailure { reason } | Self::PermanentFailure { reason } => {
                write!(f, "{}: {}", self.label(), reason)
            }
            Self::NoTargetSection => write!(f, "{}", self.label()),
        }
    }
}
