//! Page model for case detail pages
//!
//! This module wraps `scraper::Html` with the few lookups the extractor needs:
//! - finding a labelled section by its panel heading
//! - walking the rows of the section's data grid
//! - reading the nested document grid inside a row's document cell
//!
//! Lookups never fail. Missing elements produce `None` or empty vectors.

use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Selectors describing the layout of a case detail page
#[derive(Debug, Clone)]
pub struct PageModel {
    heading: Selector,
    grid: Selector,
    document_grid: Selector,
    row: Selector,
    anchor: Selector,
    case_sensitive: bool,
}

/// CSS selectors used to build a [`PageModel`]
#[derive(Debug, Clone)]
pub struct PageLayout<'a> {
    /// Section headings, in either the combined or the nested class form
    pub heading: &'a str,

    /// The data grid holding a section's rows
    pub grid: &'a str,

    /// The nested grid of document links inside a document cell
    pub document_grid: &'a str,

    /// Whether section labels are matched case-sensitively
    pub case_sensitive: bool,
}

impl PageModel {
    /// Compiles the layout selectors
    pub fn new(layout: &PageLayout<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            heading: compile(layout.heading)?,
            grid: compile(layout.grid)?,
            document_grid: compile(layout.document_grid)?,
            row: compile("tr")?,
            anchor: compile("a")?,
            case_sensitive: layout.case_sensitive,
        })
    }

    /// Parses raw page bytes fetched from `url`
    ///
    /// Invalid UTF-8 is replaced and malformed markup is recovered by the
    /// HTML parser, so this never fails.
    pub fn parse(&self, bytes: &[u8], url: Url) -> CasePage<'_> {
        let html = String::from_utf8_lossy(bytes);
        CasePage {
            model: self,
            document: Html::parse_document(&html),
            url,
        }
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// A parsed case detail page
pub struct CasePage<'m> {
    model: &'m PageModel,
    document: Html,
    url: Url,
}

impl<'m> CasePage<'m> {
    /// The URL the page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Finds the section whose heading text contains `label`
    ///
    /// The first matching heading in document order wins. When headings are
    /// nested (an outer `panel-heading` around an inner `panel-heading-content`)
    /// both match, and the section panel is the first ancestor that is not a
    /// heading itself.
    pub fn find_section(&self, label: &str) -> Option<Section<'_>> {
        let heading = self
            .document
            .select(&self.model.heading)
            .find(|h| self.label_matches(&element_text(*h), label))?;

        let panel = heading
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| !self.model.heading.matches(a))?;

        Some(Section {
            model: self.model,
            label: label.to_string(),
            panel,
        })
    }

    fn label_matches(&self, text: &str, label: &str) -> bool {
        if self.model.case_sensitive {
            text.contains(label)
        } else {
            contains_ignore_case(text, label)
        }
    }
}

/// A labelled region of a case page
pub struct Section<'a> {
    model: &'a PageModel,
    label: String,
    panel: ElementRef<'a>,
}

impl<'a> Section<'a> {
    /// The label this section was found by
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the body rows of the section's data grid, top to bottom
    ///
    /// Rows belonging to nested tables, header and footer rows, and rows with
    /// fewer than three cells are skipped. A section without a grid has no rows.
    pub fn rows(&self) -> Vec<DocumentRow> {
        let Some(grid) = self.panel.select(&self.model.grid).next() else {
            tracing::trace!("Section '{}' has no data grid", self.label);
            return Vec::new();
        };

        own_rows(grid, &self.model.row)
            .filter_map(|row| self.read_row(row))
            .collect()
    }

    fn read_row(&self, row: ElementRef<'a>) -> Option<DocumentRow> {
        let cells: Vec<ElementRef<'a>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| c.value().name() == "td")
            .collect();

        if cells.len() < 3 {
            return None;
        }

        let documents = cells
            .get(3)
            .map(|cell| self.read_documents(*cell))
            .unwrap_or_default();

        Some(DocumentRow {
            date: element_text(cells[0]),
            event_type: element_text(cells[1]),
            description: element_text(cells[2]),
            documents,
        })
    }

    fn read_documents(&self, cell: ElementRef<'a>) -> Vec<DocumentLink> {
        let Some(table) = cell.select(&self.model.document_grid).next() else {
            return Vec::new();
        };

        own_rows(table, &self.model.row)
            .filter_map(|row| {
                let cells: Vec<ElementRef<'a>> = row
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|c| c.value().name() == "td")
                    .collect();

                if cells.len() < 2 {
                    return None;
                }

                let href = cells[0]
                    .select(&self.model.anchor)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string);

                Some(DocumentLink {
                    href,
                    doc_type: element_text(cells[1]),
                })
            })
            .collect()
    }
}

/// One row of a section's data grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub date: String,
    pub event_type: String,
    pub description: String,

    /// Entries of the nested document grid in the fourth cell, if any
    pub documents: Vec<DocumentLink>,
}

/// One entry of a nested document grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// Raw link target; `None` when the anchor or its href is missing
    pub href: Option<String>,

    /// Document type label (e.g. "Brief", "Notice")
    pub doc_type: String,
}

/// Rows whose nearest enclosing table is `table`, excluding thead/tfoot rows
fn own_rows<'a>(table: ElementRef<'a>, row: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
    table.select(row).filter(move |tr| {
        nearest_table(*tr) == Some(table)
            && !tr
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|p| matches!(p.value().name(), "thead" | "tfoot"))
    })
}

fn nearest_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

/// Rendered text of an element with whitespace collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// ASCII/Unicode case-insensitive substring test
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
