//! Document construction and rendering on top of `genpdf`.
//!
//! [`DocumentBuilder`] prepares a `genpdf::Document` (paper size, margins,
//! footer, fonts) and [`PdfBuilder`] lays a [`Cover`] and [`Section`]s out on it.
//! Content flows onto new pages whenever the cursor reaches the bottom margin.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use genpdf::elements::{LinearLayout, PaddedElement, Paragraph, TableLayout};
use genpdf::error::{Error, ErrorKind};
use genpdf::style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position, Size};
use log::debug;
use thiserror::Error as ThisError;

use crate::elements::{mm_from_f64, VerticalGap};
use crate::fonts;
use crate::model::{Block, Column, Cover, RichParagraph, Section};

/// Errors produced while turning the content model into PDF bytes.
#[derive(ThisError, Debug)]
pub enum PdfBuildError {
    /// No usable font family could be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] Error),
    /// Laying out or writing the document failed.
    #[error("failed to render PDF: {0}")]
    Render(#[source] Error),
}

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Shared counter of pages emitted by the page decorator.
#[derive(Clone, Debug, Default)]
pub struct PageCounter(Rc<Cell<usize>>);

impl PageCounter {
    /// Number of pages decorated so far.
    pub fn get(&self) -> usize {
        self.0.get()
    }

    fn increment(&self) -> usize {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }
}

/// Builder for `genpdf::Document` instances pre-configured with the crate defaults.
#[derive(Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
    font_directory: Option<PathBuf>,
    font_size: Option<u8>,
    title: Option<String>,
    page_counter: PageCounter,
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Looks for font files in `directory` before the default search paths.
    pub fn with_font_directory(mut self, directory: impl Into<Option<PathBuf>>) -> Self {
        self.font_directory = directory.into();
        self
    }

    /// Sets the base font size in points.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns a handle that reports how many pages were rendered.
    pub fn page_counter(&self) -> PageCounter {
        self.page_counter.clone()
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> Result<genpdf::Document, PdfBuildError> {
        let font_family = fonts::font_family_from(self.font_directory.as_deref())
            .map_err(PdfBuildError::FontLoad)?;
        let mut document = genpdf::Document::new(font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }
        if let Some(title) = self.title {
            document.set_title(title);
        }

        let decorator = ConfiguredPageDecorator::new(self.margins, self.footer, self.page_counter);
        document.set_page_decorator(decorator);

        Ok(document)
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<FooterFactory>,
}

impl FooterSpec {
    /// Creates a new footer specification.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
    pages: PageCounter,
}

impl ConfiguredPageDecorator {
    fn new(margins: Option<Margins>, footer: Option<FooterSpec>, pages: PageCounter) -> Self {
        Self {
            margins,
            footer,
            pages,
        }
    }
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.pages.increment();

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

/// Rendered PDF output.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// Complete PDF file contents.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
}

/// Assembles a cover and sections into a rendered PDF.
pub struct PdfBuilder {
    document: DocumentBuilder,
    cover: Option<Cover>,
    sections: Vec<Section>,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    /// A4 pages, 20 mm side margins and a page-number footer.
    pub fn new() -> Self {
        let document = DocumentBuilder::new()
            .with_paper_size(PaperSize::A4)
            .with_margins(Margins::trbl(15, 20, 10, 20))
            .with_font_size(12)
            .with_footer(8, |page| {
                Paragraph::new(format!("Página {}", page))
                    .aligned(Alignment::Center)
                    .styled(style::Style::new().with_font_size(9))
            });

        Self::with_document(document)
    }

    /// Uses a custom document configuration.
    pub fn with_document(document: DocumentBuilder) -> Self {
        Self {
            document,
            cover: None,
            sections: Vec::new(),
        }
    }

    /// Sets the cover rendered at the top of the first page.
    pub fn with_cover(mut self, cover: Cover) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Appends multiple sections.
    pub fn add_sections<I>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = Section>,
    {
        self.sections.extend(sections);
        self
    }

    /// Applies a closure to the document configuration.
    pub fn configure_document<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(DocumentBuilder) -> DocumentBuilder,
    {
        self.document = configure(self.document);
        self
    }

    /// Renders the configured content into PDF bytes.
    pub fn render(self) -> Result<RenderedPdf, PdfBuildError> {
        let pages = self.document.page_counter();
        let mut document = self.document.build()?;

        let mut layout = LinearLayout::vertical();
        if let Some(cover) = &self.cover {
            push_cover(&mut layout, cover)?;
        }
        for section in &self.sections {
            push_section(&mut layout, section)?;
        }
        document.push(layout);

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(PdfBuildError::Render)?;
        debug!("Rendered PDF with {} page(s), {} bytes", pages.get(), bytes.len());

        Ok(RenderedPdf {
            bytes,
            page_count: pages.get(),
        })
    }
}

/// Paragraphs are always padded; a zero indent leaves the layout unchanged.
fn paragraph_element(paragraph: &RichParagraph) -> PaddedElement<Paragraph> {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        element.push(span.to_styled_string());
    }

    let indent = mm_from_f64(paragraph.indent_mm().max(0.0));
    element.padded(Margins::trbl(0, 0, 0, indent))
}

fn columns_element(columns: &[Column]) -> Result<TableLayout, PdfBuildError> {
    let weights = columns.iter().map(|column| column.weight.max(1)).collect();
    let mut table = TableLayout::new(weights);
    let mut row = table.row();
    for column in columns {
        row.push_element(paragraph_element(&column.paragraph));
    }
    row.push().map_err(PdfBuildError::Render)?;
    Ok(table)
}

fn push_blocks(layout: &mut LinearLayout, blocks: &[Block]) -> Result<(), PdfBuildError> {
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => layout.push(paragraph_element(paragraph)),
            Block::Columns(columns) if columns.is_empty() => {}
            Block::Columns(columns) => layout.push(columns_element(columns)?),
            Block::Gap(height) => layout.push(VerticalGap::new(*height)),
        }
    }
    Ok(())
}

fn push_cover(layout: &mut LinearLayout, cover: &Cover) -> Result<(), PdfBuildError> {
    layout.push(
        Paragraph::new(cover.title())
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(cover.title_size())),
    );
    push_blocks(layout, cover.blocks())
}

fn push_section(layout: &mut LinearLayout, section: &Section) -> Result<(), PdfBuildError> {
    layout.push(
        Paragraph::new(section.title())
            .styled(style::Style::new().with_font_size(section.heading_size())),
    );
    push_blocks(layout, section.blocks())
}
