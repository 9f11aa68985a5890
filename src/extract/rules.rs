//! Declarative extraction rules
//!
//! Every label, role and selector the extractor looks for lives here, so the
//! petition and brief variants of a crawl differ only in configuration.

use crate::extract::FilerRole;
use serde::Deserialize;

/// The full rule table, read from the `[rules]` section of the config
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionRules {
    /// Label of the section whose absence counts toward the early stop
    pub primary_section: String,

    /// Whether section labels are matched case-sensitively
    pub case_sensitive_labels: bool,

    /// Selector for section headings
    pub heading_selector: String,

    /// Selector for a section's data grid
    pub grid_selector: String,

    /// Selector for the nested document grid inside a document cell
    pub document_grid_selector: String,

    pub petition: PetitionRule,
    pub brief: BriefRule,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            primary_section: "Case Events".to_string(),
            case_sensitive_labels: false,
            heading_selector: ".panel-heading, .panel-heading-content".to_string(),
            grid_selector: "table.rgMasterTable".to_string(),
            document_grid_selector: "table.docGrid".to_string(),
            petition: PetitionRule::default(),
            brief: BriefRule::default(),
        }
    }
}

/// Locates the petition document and the disposition of a case
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PetitionRule {
    pub enabled: bool,
    pub section: String,

    /// Substring of the nested document type that marks the petition
    pub document_type: String,

    /// Substring of the event type that marks the disposition row
    pub disposition_event: String,

    pub granted: String,
    pub refused: String,
}

impl Default for PetitionRule {
    fn default() -> Self {
        Self {
            enabled: true,
            section: "Case Events".to_string(),
            document_type: "PETITION".to_string(),
            disposition_event: "DISP".to_string(),
            granted: "Granted".to_string(),
            refused: "Refused".to_string(),
        }
    }
}

/// Locates a party's brief among the appellate briefs
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BriefRule {
    pub enabled: bool,
    pub section: String,

    /// Substring of the event type that marks a filed brief
    pub event: String,

    /// Filer roles whose briefs are collected
    pub accepted_roles: Vec<FilerRole>,

    /// Filer roles that are never collected, even if listed as accepted
    pub excluded_roles: Vec<FilerRole>,

    /// Substring the nested document type must contain
    pub document_type: String,

    /// Substring the nested document type must not contain
    pub excluded_document_type: String,
}

impl Default for BriefRule {
    fn default() -> Self {
        Self {
            enabled: true,
            section: "Appellate Briefs".to_string(),
            event: "BRIEF FILED".to_string(),
            accepted_roles: vec![FilerRole::Appellant, FilerRole::Appellee],
            excluded_roles: vec![FilerRole::State],
            document_type: "BRIEF".to_string(),
            excluded_document_type: "NOTICE".to_string(),
        }
    }
}

impl BriefRule {
    /// Returns true if briefs filed under `role` should be collected
    pub fn accepts(&self, role: &FilerRole) -> bool {
        self.accepted_roles.contains(role) && !self.excluded_roles.contains(role)
    }
}
