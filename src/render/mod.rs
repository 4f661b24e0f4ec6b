//! Drawing contracts and per-cell text layout.

pub mod cell_text;
pub mod surface;
pub mod text;

pub use cell_text::CellTextLayout;
pub use surface::{Color, RenderSurface, Visibility, VisualElement};
pub use text::{
    FontWeight, HorizontalAlign, PositionedGlyph, ShapeRequest, ShapedRun, ShapingEngine,
    TextShaper, VerticalAlign,
};
