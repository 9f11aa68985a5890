use crate::case::CaseId;
use crate::extract::{DispositionStatus, DocumentKind, DocumentMatch};

/// Builds deterministic filenames for downloaded documents
///
/// Petitions are named `{case} {petition_label}[ ({disposition})].{ext}` and
/// briefs `{case}[ {role}] {brief_label}.{ext}`. An `Unknown` disposition is
/// left out of the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNaming {
    pub petition_label: String,
    pub brief_label: String,
    pub extension: String,
}

impl Default for DocumentNaming {
    fn default() -> Self {
        Self {
            petition_label: "PDR".to_string(),
            brief_label: "Brief".to_string(),
            extension: "pdf".to_string(),
        }
    }
}

impl DocumentNaming {
    /// Returns the filename for `document` of case `id`
    pub fn filename(
        &self,
        id: &CaseId,
        document: &DocumentMatch,
        disposition: Option<DispositionStatus>,
    ) -> String {
        let mut name = sanitize(id.as_str());

        match document.kind {
            DocumentKind::Petition => {
                name.push(' ');
                name.push_str(&self.petition_label);
                match disposition {
                    Some(DispositionStatus::Unknown) | None => {}
                    Some(status) => {
                        name.push_str(&format!(" ({})", status));
                    }
                }
            }
            DocumentKind::Brief => {
                if let Some(role) = &document.filer_role {
                    name.push(' ');
                    name.push_str(&sanitize(role.as_str()));
                }
                name.push(' ');
                name.push_str(&self.brief_label);
            }
        }

        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }
        name
    }
}

/// Replaces characters that would break a single path component
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}
