//! Document extraction for case detail pages
//!
//! This module classifies what a case page offers for download:
//! - the petition for discretionary review, with its disposition
//! - a party's brief from the appellate briefs grid
//!
//! The rules themselves are data (see [`ExtractionRules`]).

mod extractor;
mod rules;

pub use extractor::{DocumentExtractor, Extraction};
pub use rules::{BriefRule, ExtractionRules, PetitionRule};

use serde::Deserialize;
use std::fmt;
use url::Url;

/// Kind of a downloadable document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Petition,
    Brief,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Petition => write!(f, "Petition"),
            Self::Brief => write!(f, "Brief"),
        }
    }
}

/// Party that filed a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FilerRole {
    Appellant,
    Appellee,
    State,
    Other(String),
}

impl FilerRole {
    /// Classifies a filer label, ignoring surrounding whitespace and ASCII case
    ///
    /// Only exact labels map to the named roles; "Appellant/Cross-Appellee"
    /// is `Other`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("appellant") {
            Self::Appellant
        } else if label.eq_ignore_ascii_case("appellee") {
            Self::Appellee
        } else if label.eq_ignore_ascii_case("state") {
            Self::State
        } else {
            Self::Other(label.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Appellant => "Appellant",
            Self::Appellee => "Appellee",
            Self::State => "State",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for FilerRole {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl fmt::Display for FilerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a petition for discretionary review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispositionStatus {
    Granted,
    Refused,
    Unknown,
}

impl fmt::Display for DispositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Refused => write!(f, "refused"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One extracted, downloadable document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMatch {
    /// Absolute URL of the document
    pub url: Url,

    pub kind: DocumentKind,

    /// Filing party, for briefs
    pub filer_role: Option<FilerRole>,
}
