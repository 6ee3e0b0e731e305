//! Data structures describing the logical content of a PDF report.
//!
//! The types in this module form a renderer-independent model: a [`Cover`]
//! block stack followed by titled [`Section`]s. They avoid referencing the
//! rendering crate so layouts can be built and inspected in tests without
//! loading fonts; [`crate::builder::PdfBuilder`] maps them onto `genpdf`.

use crate::richtext::{plain_text, Span};

/// Paragraph made of styled spans, wrapped to the available width when rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    indent_mm: f64,
}

impl RichParagraph {
    /// Creates a paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Left indentation in millimetres.
    pub fn indent_mm(&self) -> f64 {
        self.indent_mm
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        plain_text(&self.spans)
    }

    /// Sets the left indentation and returns the updated paragraph.
    pub fn with_indent_mm(mut self, indent_mm: f64) -> Self {
        self.indent_mm = indent_mm;
        self
    }
}

/// A paragraph placed in a weighted column of a [`Block::Columns`] row.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Relative width of the column.
    pub weight: usize,
    /// Column content.
    pub paragraph: RichParagraph,
}

impl Column {
    /// Creates a column with the given relative width.
    pub fn new(weight: usize, paragraph: RichParagraph) -> Self {
        Self { weight, paragraph }
    }
}

/// Individual content blocks that make up sections and the cover.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// A single row of side-by-side paragraphs.
    Columns(Vec<Column>),
    /// Fixed vertical gap in millimetres.
    Gap(f64),
}

impl Block {
    /// Convenience helper for building a paragraph block.
    pub fn paragraph(spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(spans))
    }

    /// Convenience helper for a gap block.
    pub fn gap(height_mm: f64) -> Self {
        Self::Gap(height_mm)
    }

    /// Text of the block for inspection, columns joined by a tab.
    pub fn text(&self) -> Option<String> {
        match self {
            Block::Paragraph(paragraph) => Some(paragraph.text()),
            Block::Columns(columns) => Some(
                columns
                    .iter()
                    .map(|column| column.paragraph.text())
                    .collect::<Vec<_>>()
                    .join("\t"),
            ),
            Block::Gap(_) => None,
        }
    }
}

/// Opening blocks of the document, led by a centered title.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    title: String,
    title_size: u8,
    blocks: Vec<Block>,
}

impl Cover {
    /// Default font size of the cover title.
    pub const DEFAULT_TITLE_SIZE: u8 = 18;

    /// Creates a new cover with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_size: Self::DEFAULT_TITLE_SIZE,
            blocks: Vec::new(),
        }
    }

    /// Returns the title shown at the top of the first page.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Font size of the title in points.
    pub fn title_size(&self) -> u8 {
        self.title_size
    }

    /// Returns the blocks rendered after the title.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sets the title font size and returns the updated cover.
    pub fn with_title_size(mut self, title_size: u8) -> Self {
        self.title_size = title_size;
        self
    }

    /// Appends a block to the cover and returns the updated instance.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Extends the cover with multiple blocks and returns the updated instance.
    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }
}

/// Logical representation of a document section.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    title: String,
    heading_size: u8,
    blocks: Vec<Block>,
}

impl Section {
    /// Default font size of section headings.
    pub const DEFAULT_HEADING_SIZE: u8 = 14;

    /// Creates a new section with the provided title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            heading_size: Self::DEFAULT_HEADING_SIZE,
            blocks: Vec::new(),
        }
    }

    /// Returns the title of the section.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Font size of the heading in points.
    pub fn heading_size(&self) -> u8 {
        self.heading_size
    }

    /// Returns the blocks contained in the section.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sets the heading font size and returns the updated section.
    pub fn with_heading_size(mut self, heading_size: u8) -> Self {
        self.heading_size = heading_size;
        self
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Extends the section with additional blocks and returns the updated instance.
    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Texts of all paragraph and column blocks, in order.
    pub fn texts(&self) -> Vec<String> {
        self.blocks.iter().filter_map(Block::text).collect()
    }
}
