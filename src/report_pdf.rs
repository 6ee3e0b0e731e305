//! PDF layout of a [`ReportDocument`].
//!
//! The layout mirrors the paper form: a centered title, the type/year and
//! status/submission lines, then the responsible person, keywords and
//! revisions sections. Revision comments wrap within the content width.

use std::path::PathBuf;

use log::info;

use crate::builder::{PdfBuildError, PdfBuilder, RenderedPdf};
use crate::datefmt;
use crate::document::ReportDocument;
use crate::error::{ComposerError, Result};
use crate::model::{Block, Column, Cover, RichParagraph, Section};
use crate::richtext::Span;

/// Font size of the title.
pub const TITLE_SIZE: u8 = 18;
/// Font size of section headings.
pub const HEADING_SIZE: u8 = 14;
/// Font size of body text.
pub const BODY_SIZE: u8 = 12;

/// Gap after the title and after each section, in millimetres.
pub const SECTION_GAP_MM: f64 = 15.0;
/// Gap between consecutive body lines, in millimetres.
pub const LINE_GAP_MM: f64 = 7.0;
/// Gap between a section heading and its first line, in millimetres.
pub const HEADING_GAP_MM: f64 = 2.0;
/// Extra gap after each revision, in millimetres.
pub const REVISION_GAP_MM: f64 = 5.0;
/// Indentation of list items, in millimetres.
pub const ITEM_INDENT_MM: f64 = 5.0;

/// Text drawn in the revisions section when the report has none.
pub const NO_REVISIONS_PLACEHOLDER: &str = "Nenhuma revisão registrada.";

/// Column weights placing the second column 100 mm into the 170 mm content width.
const COLUMN_WEIGHTS: (usize, usize) = (10, 7);

/// Cover and sections describing a report PDF.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportLayout {
    pub cover: Cover,
    pub sections: Vec<Section>,
}

impl ReportLayout {
    /// Lays `document` out; fails when the title is empty.
    pub fn from_document(document: &ReportDocument) -> Result<Self> {
        if !document.has_title() {
            return Err(ComposerError::MissingTitle);
        }

        let cover = Cover::new(document.title.clone())
            .with_title_size(TITLE_SIZE)
            .with_blocks([
                Block::gap(SECTION_GAP_MM - LINE_GAP_MM),
                two_columns(
                    format!("Tipo: {}", document.kind),
                    format!("Ano: {}", year_text(document.year)),
                ),
                two_columns(
                    format!("Status: {}", document.status),
                    format!(
                        "Data de Envio: {}",
                        datefmt::format_date_time(&document.submitted_at)
                    ),
                ),
                Block::gap(SECTION_GAP_MM - LINE_GAP_MM),
            ]);

        let sections = vec![
            responsible_section(document),
            keywords_section(document),
            revisions_section(document),
        ];

        Ok(Self { cover, sections })
    }

    /// Finds a section by title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.title() == title)
    }
}

fn year_text(year: Option<i32>) -> String {
    year.map(|value| value.to_string()).unwrap_or_default()
}

fn body(text: impl Into<String>) -> Span {
    Span::new(text).sized(BODY_SIZE)
}

fn line(text: impl Into<String>) -> Block {
    Block::paragraph(vec![body(text)])
}

fn item(text: impl Into<String>) -> Block {
    Block::Paragraph(RichParagraph::new(vec![body(text)]).with_indent_mm(ITEM_INDENT_MM))
}

fn two_columns(left: String, right: String) -> Block {
    Block::Columns(vec![
        Column::new(COLUMN_WEIGHTS.0, RichParagraph::new(vec![body(left)])),
        Column::new(COLUMN_WEIGHTS.1, RichParagraph::new(vec![body(right)])),
    ])
}

fn heading_section(title: &str) -> Section {
    Section::new(title)
        .with_heading_size(HEADING_SIZE)
        .with_block(Block::gap(HEADING_GAP_MM))
}

fn responsible_section(document: &ReportDocument) -> Section {
    let responsible = &document.responsible;
    heading_section("Responsável").with_blocks([
        item(format!("- Nome: {}", responsible.name)),
        item(format!("- Cargo: {}", responsible.role)),
        item(format!("- Departamento: {}", responsible.department)),
        Block::gap(SECTION_GAP_MM - LINE_GAP_MM),
    ])
}

fn keywords_section(document: &ReportDocument) -> Section {
    heading_section("Palavras-chave").with_blocks([
        line(document.keywords.joined()),
        Block::gap(SECTION_GAP_MM - LINE_GAP_MM),
    ])
}

fn revisions_section(document: &ReportDocument) -> Section {
    let section = heading_section("Revisões");
    if document.revisions.is_empty() {
        return section.with_block(line(NO_REVISIONS_PLACEHOLDER));
    }

    document
        .revisions
        .iter()
        .enumerate()
        .fold(section, |section, (index, revision)| {
            section.with_blocks([
                Block::Paragraph(RichParagraph::new(vec![
                    Span::new(format!("Revisão {}", index + 1))
                        .bold()
                        .sized(BODY_SIZE),
                ])),
                item(format!("Data: {}", datefmt::format_date(&revision.timestamp))),
                item(format!("Revisado por: {}", revision.reviewer)),
                item(format!("Comentário: {}", revision.comment)),
                Block::gap(REVISION_GAP_MM),
            ])
        })
}

/// Name of the downloaded file: the title with spaces replaced by underscores.
///
/// Path separators are replaced as well so the name always stays inside the
/// output directory.
pub fn file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|ch| match ch {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{}.pdf", stem)
}

/// A rendered report together with its download name.
#[derive(Clone, Debug)]
pub struct ReportPdf {
    pub file_name: String,
    pub pdf: RenderedPdf,
}

/// Rendering options for report PDFs.
#[derive(Clone, Debug, Default)]
pub struct PdfOptions {
    /// Directory searched for fonts before the defaults.
    pub fonts_dir: Option<PathBuf>,
}

/// Renders `document` to PDF bytes.
pub fn render_report(document: &ReportDocument, options: &PdfOptions) -> Result<ReportPdf> {
    let layout = ReportLayout::from_document(document)?;
    let title = document.title.clone();
    let fonts_dir = options.fonts_dir.clone();

    let pdf = PdfBuilder::new()
        .configure_document(|builder| builder.with_title(title).with_font_directory(fonts_dir))
        .with_cover(layout.cover)
        .add_sections(layout.sections)
        .render()
        .map_err(ComposerError::from)?;

    info!(
        "Rendered report '{}' ({} page(s), {} bytes)",
        document.title,
        pdf.page_count,
        pdf.bytes.len()
    );

    Ok(ReportPdf {
        file_name: file_name(&document.title),
        pdf,
    })
}

/// Returns `true` when the error means fonts are not installed.
pub fn is_font_error(err: &ComposerError) -> bool {
    matches!(err, ComposerError::Pdf(PdfBuildError::FontLoad(_)))
}
