//! Text-shaping contracts and shaped-run data.
//!
//! Shaping itself is delegated to the host's text-shaping service. The
//! service is parameterized by font family and weight at construction
//! ([`ShapingEngine::shaper`]); the resulting [`TextShaper`] turns text plus
//! size/space/alignment/padding into an ordered run of positioned glyph
//! advances.

use crate::layout::geometry::{Point, Size, Thickness};
use std::rc::Rc;

/// A numeric font weight (CSS scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Everything a shaper needs for one run besides family and weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRequest<'a> {
    pub text: &'a str,
    pub font_size: f64,
    /// Space available to the cell's content; may be unbounded.
    pub available: Size,
    pub h_align: HorizontalAlign,
    pub v_align: VerticalAlign,
    pub padding: Thickness,
}

/// One glyph of a shaped run: id, offset from the run origin, and the
/// horizontal advance it contributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    pub glyph_id: u32,
    pub offset: Point,
    pub advance: f64,
}

/// The positioned-glyph result of shaping one string.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRun {
    glyphs: Vec<PositionedGlyph>,
    width: f64,
}

impl ShapedRun {
    /// Build a run from ordered glyphs; the total advance width is the sum
    /// of the per-glyph advances.
    pub fn new(glyphs: Vec<PositionedGlyph>) -> Self {
        let width = glyphs.iter().map(|glyph| glyph.advance).sum();
        Self { glyphs, width }
    }

    pub fn glyphs(&self) -> &[PositionedGlyph] {
        &self.glyphs
    }

    /// Total advance width of the run.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// A shaping context fixed to one font family and weight.
pub trait TextShaper {
    /// Shape `request.text`. Returns `None` when there is nothing to shape
    /// (empty text); that is not an error, just nothing to draw.
    fn shape(&self, request: &ShapeRequest<'_>) -> Option<ShapedRun>;
}

/// The host's text-shaping service.
///
/// An explicitly constructed, owned engine is passed to cells at
/// construction; changing family or weight means asking the engine for a
/// fresh shaper, never mutating an existing one.
pub trait ShapingEngine {
    fn shaper(&self, family: &str, weight: FontWeight) -> Rc<dyn TextShaper>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    fn glyph(id: u32, advance: f64) -> PositionedGlyph {
        PositionedGlyph {
            glyph_id: id,
            offset: Point::default(),
            advance,
        }
    }

    #[test]
    fn run_width_is_sum_of_advances() {
        let run = ShapedRun::new(vec![glyph(1, 4.0), glyph(2, 6.5), glyph(3, 2.5)]);
        assert_eq!(run.width(), 13.0);
        assert_eq!(run.glyphs().len(), 3);
    }

    #[test]
    fn empty_run_has_zero_width() {
        let run = ShapedRun::new(Vec::new());
        assert!(run.is_empty());
        assert_eq!(run.width(), 0.0);
    }
}
