//! Case identifiers, detail-page URLs and output names
//!
//! A [`CaseId`] is produced from a sequence number and a [`CaseCategory`]
//! by a [`CaseTemplate`]. The same identifier is used to build the detail
//! page URL and the filenames of downloaded documents.

mod naming;
mod template;

pub use naming::DocumentNaming;
pub use template::{CaseTemplate, Field, Values};

use crate::TemplateError;
use std::fmt;
use url::Url;

/// Court, year and docket-type suffix shared by every case in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseCategory {
    /// Court number (e.g. 1 for the First Court of Appeals)
    pub court: u32,

    /// Two-digit filing year
    pub year: u32,

    /// Docket-type suffix (e.g. "CR")
    pub suffix: String,

    /// Optional court code sent as the `coa` query parameter
    pub court_code: Option<String>,
}

impl CaseCategory {
    fn values(&self, seq: Option<u32>) -> Values<'_> {
        Values {
            court: Some(self.court),
            year: Some(self.year),
            seq,
            suffix: Some(&self.suffix),
        }
    }

    /// Renders a per-category pattern such as an output directory name
    pub fn render(&self, template: &CaseTemplate) -> Result<String, TemplateError> {
        template.render(&self.values(None))
    }
}

/// Formatted case identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseId {
    seq: u32,
    formatted: String,
}

impl CaseId {
    /// Formats the identifier for sequence number `seq`
    ///
    /// # Example
    ///
    /// ```
    /// use docket_harvest::case::{CaseCategory, CaseId, CaseTemplate};
    ///
    /// let template = CaseTemplate::parse("{court:02}-{year}-{seq:05}-{suffix}").unwrap();
    /// let category = CaseCategory {
    ///     court: 14,
    ///     year: 24,
    ///     suffix: "CR".to_string(),
    ///     court_code: None,
    /// };
    /// let id = CaseId::new(12, &template, &category).unwrap();
    /// assert_eq!(id.as_str(), "14-24-00012-CR");
    /// ```
    pub fn new(
        seq: u32,
        template: &CaseTemplate,
        category: &CaseCategory,
    ) -> Result<Self, TemplateError> {
        let formatted = template.render(&category.values(Some(seq)))?;
        Ok(Self { seq, formatted })
    }

    /// The sequence number this identifier was built from
    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// The formatted identifier
    pub fn as_str(&self) -> &str {
        &self.formatted
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

/// Builds the detail page URL for a case
///
/// Produces `{base}/{case_path}?cn={id}` with `&coa={court_code}` appended
/// when the category carries a court code.
pub fn detail_url(
    base: &Url,
    case_path: &str,
    id: &CaseId,
    category: &CaseCategory,
) -> Result<Url, url::ParseError> {
    // Joining against a base without a trailing slash would drop its last segment
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base.join(case_path)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("cn", id.as_str());
        if let Some(code) = &category.court_code {
            query.append_pair("coa", code);
        }
    }
    Ok(url)
}
