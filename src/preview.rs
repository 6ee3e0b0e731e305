//! MongoDB extended-JSON preview of a report.
//!
//! The preview wraps `data_envio` and every `revisoes[].data` in a
//! `{"$date": ...}` marker. The wrapping lives in borrowed mirror types so the
//! [`ReportDocument`] handed to the submission client is never modified.

use serde::Serialize;

use crate::document::{ReportDocument, Responsible, RevisionEntry};
use crate::keywords::KeywordSet;

/// Extended-JSON date marker.
#[derive(Debug, Serialize)]
pub struct DateMarker<'a> {
    #[serde(rename = "$date")]
    pub date: &'a str,
}

#[derive(Debug, Serialize)]
struct ExtendedRevision<'a> {
    data: DateMarker<'a>,
    revisado_por: &'a str,
    comentario: &'a str,
}

impl<'a> From<&'a RevisionEntry> for ExtendedRevision<'a> {
    fn from(entry: &'a RevisionEntry) -> Self {
        Self {
            data: DateMarker {
                date: &entry.timestamp,
            },
            revisado_por: &entry.reviewer,
            comentario: &entry.comment,
        }
    }
}

/// Presentation view of a [`ReportDocument`] with date markers applied.
#[derive(Debug, Serialize)]
pub struct ExtendedJsonDocument<'a> {
    titulo: &'a str,
    tipo: &'a str,
    ano: Option<i32>,
    status: &'a str,
    data_envio: DateMarker<'a>,
    responsavel: &'a Responsible,
    palavras_chaves: &'a KeywordSet,
    revisoes: Vec<ExtendedRevision<'a>>,
}

impl<'a> From<&'a ReportDocument> for ExtendedJsonDocument<'a> {
    fn from(document: &'a ReportDocument) -> Self {
        Self {
            titulo: &document.title,
            tipo: &document.kind,
            ano: document.year,
            status: &document.status,
            data_envio: DateMarker {
                date: &document.submitted_at,
            },
            responsavel: &document.responsible,
            palavras_chaves: &document.keywords,
            revisoes: document.revisions.iter().map(ExtendedRevision::from).collect(),
        }
    }
}

/// Renders the pretty-printed (two-space indented) preview text.
pub fn render_preview(document: &ReportDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ExtendedJsonDocument::from(document))
}
