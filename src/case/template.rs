//! Name patterns for case numbers and output directories
//!
//! A pattern is literal text with `{field}` or `{field:0N}` placeholders,
//! where `field` is one of `court`, `year`, `seq` or `suffix` and `N` is the
//! zero-padded width for numeric fields.

use crate::TemplateError;
use std::fmt::Write;

/// A field that can appear inside a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Court,
    Year,
    Seq,
    Suffix,
}

impl Field {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        match name {
            "court" => Ok(Self::Court),
            "year" => Ok(Self::Year),
            "seq" => Ok(Self::Seq),
            "suffix" => Ok(Self::Suffix),
            other => Err(TemplateError::UnknownPlaceholder(other.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Court => "court",
            Self::Year => "year",
            Self::Seq => "seq",
            Self::Suffix => "suffix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { field: Field, width: usize },
}

/// Values substituted into a pattern
#[derive(Debug, Clone, Copy, Default)]
pub struct Values<'a> {
    pub court: Option<u32>,
    pub year: Option<u32>,
    pub seq: Option<u32>,
    pub suffix: Option<&'a str>,
}

/// A parsed name pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl CaseTemplate {
    /// Parses a pattern such as `{court:02}-{year}-{seq:05}-{suffix}`
    ///
    /// # Example
    ///
    /// ```
    /// use docket_harvest::case::CaseTemplate;
    ///
    /// let template = CaseTemplate::parse("PD-{seq:04}-{year}").unwrap();
    /// assert!(template.uses_seq());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut inner = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(pattern.to_string()));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    let (name, width) = match inner.split_once(':') {
                        Some((name, width)) => (name, parse_width(width)?),
                        None => (inner.as_str(), 0),
                    };
                    segments.push(Segment::Field {
                        field: Field::parse(name.trim())?,
                        width,
                    });
                }
                '}' => return Err(TemplateError::StrayBrace(pattern.to_string())),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Returns the original pattern text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern references the given field
    pub fn uses(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field { field: f, .. } if *f == field))
    }

    /// Returns true if the pattern references `{seq}`
    pub fn uses_seq(&self) -> bool {
        self.uses(Field::Seq)
    }

    /// Renders the pattern, failing if a referenced value is missing
    pub fn render(&self, values: &Values<'_>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len() + 8);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, width } => {
                    let missing = || TemplateError::Unavailable(field.name().to_string());
                    match field {
                        Field::Court => write_num(&mut out, values.court.ok_or_else(missing)?, *width),
                        Field::Year => write_num(&mut out, values.year.ok_or_else(missing)?, *width),
                        Field::Seq => write_num(&mut out, values.seq.ok_or_else(missing)?, *width),
                        Field::Suffix => out.push_str(values.suffix.ok_or_else(missing)?),
                    }
                }
            }
        }

        Ok(out)
    }
}

impl std::fmt::Display for CaseTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_width(spec: &str) -> Result<usize, TemplateError> {
    let digits = spec.trim().trim_start_matches('0');
    if digits.is_empty() {
        // "{seq:0}" or "{seq:}" both mean no padding
        return if spec.trim().chars().all(|c| c == '0') {
            Ok(0)
        } else {
            Err(TemplateError::InvalidWidth(spec.to_string()))
        };
    }
    digits
        .parse::<usize>()
        .ok()
        .filter(|w| *w <= 12)
        .ok_or_else(|| TemplateError::InvalidWidth(spec.to_string()))
}

fn write_num(out: &mut String, value: u32, width: usize) {
    // Writing to a String cannot fail
    let _ = write!(out, "{:0width$}", value, width = width);
}
