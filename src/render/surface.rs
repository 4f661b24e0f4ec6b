//! Host-framework rendering contracts.
//!
//! The core never draws directly; it talks to the host through these traits.
//! `RenderSurface` is the clipped-drawing target for a row-draw pass and
//! `VisualElement` is the per-cell visual the host framework owns
//! (measurement, visibility, clip storage).

use crate::layout::geometry::{Point, Rect, Size};
use crate::render::text::ShapedRun;

/// An RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Visibility state of a cell visual.
///
/// `Hidden` elements keep their layout slot; `Collapsed` elements occupy
/// no layout space at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapsed,
}

/// A host-framework visual element hosting one cell.
pub trait VisualElement {
    /// Measured size from the last layout pass, if the element has been
    /// measured.
    fn desired_size(&self) -> Option<Size>;

    fn visibility(&self) -> Visibility;

    fn set_visibility(&mut self, visibility: Visibility);

    /// The clip rectangle currently applied to the element.
    fn clip(&self) -> Option<Rect>;

    fn set_clip(&mut self, clip: Option<Rect>);
}

/// A rendering target capable of clipped drawing of rectangles and shaped
/// text runs.
///
/// Clip regions form a stack: every `push_clip` must be balanced by a
/// `pop_clip`. Use [`crate::layout::clip::ClipScope`] rather than pairing
/// the calls by hand.
pub trait RenderSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a pre-shaped text run with its origin at `origin`.
    fn draw_run(&mut self, run: &ShapedRun, origin: Point, color: Color);

    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_constructors() {
        assert_eq!(Color::rgb(1, 2, 3), Color::new(1, 2, 3, 255));
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(0).a, 0);
        assert_eq!(Color::TRANSPARENT.a, 0);
    }
}
