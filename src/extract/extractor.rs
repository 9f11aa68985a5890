use crate::extract::rules::{BriefRule, ExtractionRules, PetitionRule};
use crate::extract::{DispositionStatus, DocumentKind, DocumentMatch, FilerRole};
use crate::page::{contains_ignore_case, CasePage, DocumentLink, DocumentRow, PageLayout};
use std::collections::HashMap;
use url::Url;

/// Result of scanning one case page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Whether the primary section exists on the page
    pub primary_section_found: bool,

    /// Matched documents, petition first
    pub documents: Vec<DocumentMatch>,

    /// Disposition of the petition, if a disposition row was found
    pub disposition: Option<DispositionStatus>,
}

/// Applies [`ExtractionRules`] to parsed case pages
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    rules: ExtractionRules,
}

impl DocumentExtractor {
    pub fn new(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// The page layout these rules expect
    pub fn page_layout(&self) -> PageLayout<'_> {
        PageLayout {
            heading: &self.rules.heading_selector,
            grid: &self.rules.grid_selector,
            document_grid: &self.rules.document_grid_selector,
            case_sensitive: self.rules.case_sensitive_labels,
        }
    }

    /// Extracts the documents and disposition of a case page
    ///
    /// # Rules
    ///
    /// | Section | Row predicate | Nested entry predicate |
    /// |---------|---------------|------------------------|
    /// | petition | any row | type contains `PETITION` |
    /// | petition | event contains `DISP` | (disposition from description) |
    /// | brief | event contains `BRIEF FILED`, accepted filer role | type contains `BRIEF`, not `NOTICE` |
    ///
    /// Every predicate is case-insensitive and the first match wins. Entries
    /// with a missing or unusable link are skipped and the scan moves on.
    pub fn extract(&self, page: &CasePage<'_>) -> Extraction {
        let mut sections = SectionCache::new(page);
        let mut extraction = Extraction {
            primary_section_found: sections.get(&self.rules.primary_section).is_some(),
            ..Extraction::default()
        };

        let petition = &self.rules.petition;
        if petition.enabled {
            if let Some(rows) = sections.get(&petition.section) {
                extraction.disposition = find_disposition(rows, petition);
                if let Some(url) = find_petition(rows, petition, page.url()) {
                    extraction.documents.push(DocumentMatch {
                        url,
                        kind: DocumentKind::Petition,
                        filer_role: None,
                    });
                }
            }
        }

        let brief = &self.rules.brief;
        if brief.enabled {
            if let Some(rows) = sections.get(&brief.section) {
                if let Some((url, role)) = find_brief(rows, brief, page.url()) {
                    extraction.documents.push(DocumentMatch {
                        url,
                        kind: DocumentKind::Brief,
                        filer_role: Some(role),
                    });
                }
            }
        }

        extraction
    }
}

/// Looks each section label up at most once per page
struct SectionCache<'p, 'm> {
    page: &'p CasePage<'m>,
    rows: HashMap<String, Option<Vec<DocumentRow>>>,
}

impl<'p, 'm> SectionCache<'p, 'm> {
    fn new(page: &'p CasePage<'m>) -> Self {
        Self {
            page,
            rows: HashMap::new(),
        }
    }

    fn get(&mut self, label: &str) -> Option<&[DocumentRow]> {
        if !self.rows.contains_key(label) {
            let rows = self.page.find_section(label).map(|s| s.rows());
            self.rows.insert(label.to_string(), rows);
        }
        self.rows.get(label).and_then(|r| r.as_deref())
    }
}

fn find_disposition(rows: &[DocumentRow], rule: &PetitionRule) -> Option<DispositionStatus> {
    let row = rows
        .iter()
        .find(|r| contains_ignore_case(&r.event_type, &rule.disposition_event))?;

    let status = if contains_ignore_case(&row.description, &rule.granted) {
        DispositionStatus::Granted
    } else if contains_ignore_case(&row.description, &rule.refused) {
        DispositionStatus::Refused
    } else {
        DispositionStatus::Unknown
    };
    Some(status)
}

fn find_petition(rows: &[DocumentRow], rule: &PetitionRule, base: &Url) -> Option<Url> {
    rows.iter()
        .flat_map(|r| r.documents.iter())
        .filter(|d| contains_ignore_case(&d.doc_type, &rule.document_type))
        .find_map(|d| resolve_document(d, base))
}

fn find_brief(rows: &[DocumentRow], rule: &BriefRule, base: &Url) -> Option<(Url, FilerRole)> {
    for row in rows {
        if !contains_ignore_case(&row.event_type, &rule.event) {
            continue;
        }

        let role = FilerRole::from_label(&row.description);
        if !rule.accepts(&role) {
            continue;
        }

        let url = row
            .documents
            .iter()
            .filter(|d| is_brief_document(&d.doc_type, rule))
            .find_map(|d| resolve_document(d, base));

        if let Some(url) = url {
            return Some((url, role));
        }
    }
    None
}

fn is_brief_document(doc_type: &str, rule: &BriefRule) -> bool {
    contains_ignore_case(doc_type, &rule.document_type)
        && (rule.excluded_document_type.is_empty()
            || !contains_ignore_case(doc_type, &rule.excluded_document_type))
}

/// Resolves an entry's link against the page URL
///
/// Returns None for missing hrefs, unparseable targets, and anything that
/// does not resolve to an HTTP(S) URL.
fn resolve_document(link: &DocumentLink, base: &Url) -> Option<Url> {
    let href = link.href.as_deref()?;

    match base.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        Ok(url) => {
            tracing::debug!("Skipping {} link with scheme {}", link.doc_type, url.scheme());
            None
        }
        Err(e) => {
            tracing::debug!("Skipping {} link '{}': {}", link.doc_type, href, e);
            None
        }
    }
}
