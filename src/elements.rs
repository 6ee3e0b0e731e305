//! Element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` only offers line-based breaks; the report layout needs gaps measured in
//! millimetres so the vertical rhythm does not depend on the current font size.

use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Element, Mm, RenderResult, Size};

/// Converts a millimetre value into the `genpdf` unit type.
pub fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Empty element that advances the vertical cursor by a fixed distance.
///
/// When less space than requested is left on the page the gap consumes the
/// remainder and the next element starts on a fresh page.
#[derive(Clone, Copy, Debug)]
pub struct VerticalGap {
    height: Mm,
}

impl VerticalGap {
    /// Creates a gap of `height_mm` millimetres.
    pub fn new(height_mm: f64) -> Self {
        Self {
            height: mm_from_f64(height_mm.max(0.0)),
        }
    }

    /// Height of the gap.
    pub fn height(&self) -> Mm {
        self.height
    }
}

impl Element for VerticalGap {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };

        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}
