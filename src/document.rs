//! The report record assembled from the form.
//!
//! Field names follow the JSON contract of the receiving service, which uses the
//! Portuguese names of the form inputs. Timestamps stay as the raw strings typed
//! into the `datetime-local` inputs; the preview renderer is the only place that
//! decorates them.

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordSet;

/// Person accountable for the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsible {
    /// Full name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Role or job title.
    #[serde(rename = "cargo")]
    pub role: String,
    /// Department.
    #[serde(rename = "departamento")]
    pub department: String,
}

/// One review record attached to the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionEntry {
    /// Review timestamp as entered.
    #[serde(rename = "data")]
    pub timestamp: String,
    /// Reviewer name.
    #[serde(rename = "revisado_por")]
    pub reviewer: String,
    /// Free-text comment.
    #[serde(rename = "comentario")]
    pub comment: String,
}

/// Aggregate record used for the preview, the PDF and the submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    /// `None` when the year input does not start with an integer.
    #[serde(rename = "ano")]
    pub year: Option<i32>,
    pub status: String,
    #[serde(rename = "data_envio")]
    pub submitted_at: String,
    #[serde(rename = "responsavel")]
    pub responsible: Responsible,
    #[serde(rename = "palavras_chaves")]
    pub keywords: KeywordSet,
    #[serde(rename = "revisoes")]
    pub revisions: Vec<RevisionEntry>,
}

impl ReportDocument {
    /// Returns `true` when the title is present, the only field required for a PDF.
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}

/// Parses a year the way a lenient integer-prefix parser does.
///
/// Leading whitespace and an optional sign are accepted, then the longest run of
/// ASCII digits is read; trailing characters are ignored. Input without leading
/// digits (or out of `i32` range) yields `None`.
pub fn parse_year(input: &str) -> Option<i32> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value: i64 = rest[..digits_len].parse().ok()?;
    let value = if negative { -value } else { value };
    i32::try_from(value).ok()
}
