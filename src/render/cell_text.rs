//! Per-cell shaped-text memo.
//!
//! Each cell instance holds at most one cached shaped run. Any setter that
//! touches a shaping-relevant field drops the run; the next access re-shapes
//! lazily, at most once per invalidation. This is deliberately not a shared
//! keyed cache — the cell is the cache, and the current field values are
//! the key.

use crate::layout::geometry::{Point, Size, Thickness};
use crate::render::surface::{Color, RenderSurface};
use crate::render::text::{
    FontWeight, HorizontalAlign, ShapeRequest, ShapedRun, ShapingEngine, TextShaper, VerticalAlign,
};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Shaped-text state for one cell.
pub struct CellTextLayout {
    engine: Rc<dyn ShapingEngine>,
    shaper: Rc<dyn TextShaper>,
    font_family: String,
    font_weight: FontWeight,
    text: String,
    font_size: f64,
    available: Size,
    h_align: HorizontalAlign,
    v_align: VerticalAlign,
    padding: Thickness,
    run: Option<Rc<ShapedRun>>,
    dirty: bool,
}

impl CellTextLayout {
    /// Create an empty layout shaping with the given family and weight.
    pub fn new(engine: Rc<dyn ShapingEngine>, font_family: &str, font_weight: FontWeight) -> Self {
        let shaper = engine.shaper(font_family, font_weight);
        Self {
            engine,
            shaper,
            font_family: font_family.to_string(),
            font_weight,
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            available: Size::UNBOUNDED,
            h_align: HorizontalAlign::default(),
            v_align: VerticalAlign::default(),
            padding: Thickness::default(),
            run: None,
            dirty: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.invalidate();
        }
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        if self.font_size.total_cmp(&font_size) != Ordering::Equal {
            self.font_size = font_size;
            self.invalidate();
        }
    }

    /// Set the space available to the content (used by alignment and by
    /// the shaper's own fitting).
    pub fn set_available(&mut self, available: Size) {
        if self.available != available {
            self.available = available;
            self.invalidate();
        }
    }

    pub fn set_alignment(&mut self, h_align: HorizontalAlign, v_align: VerticalAlign) {
        if self.h_align != h_align || self.v_align != v_align {
            self.h_align = h_align;
            self.v_align = v_align;
            self.invalidate();
        }
    }

    pub fn set_padding(&mut self, padding: Thickness) {
        if self.padding != padding {
            self.padding = padding;
            self.invalidate();
        }
    }

    /// Change font family and/or weight.
    ///
    /// The shaping context is parameterized by family and weight at
    /// construction, so this rebuilds the shaper itself, not just the run.
    pub fn set_font(&mut self, font_family: &str, font_weight: FontWeight) {
        if self.font_family == font_family && self.font_weight == font_weight {
            return;
        }
        self.font_family.clear();
        self.font_family.push_str(font_family);
        self.font_weight = font_weight;
        self.shaper = self.engine.shaper(&self.font_family, font_weight);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.run = None;
        self.dirty = true;
    }

    /// The shaped run for the current field values, shaping lazily on the
    /// first access after an invalidation.
    ///
    /// Empty text yields `None`: nothing to shape, nothing to draw.
    pub fn run(&mut self) -> Option<&ShapedRun> {
        if self.dirty {
            self.run = if self.text.is_empty() {
                None
            } else {
                let request = ShapeRequest {
                    text: &self.text,
                    font_size: self.font_size,
                    available: self.available,
                    h_align: self.h_align,
                    v_align: self.v_align,
                    padding: self.padding,
                };
                self.shaper.shape(&request).map(Rc::new)
            };
            self.dirty = false;
        }
        self.run.as_deref()
    }

    /// Total advance width of the shaped run; `0` when there is no run.
    pub fn width(&mut self) -> f64 {
        self.run().map_or(0.0, ShapedRun::width)
    }

    /// Minimum width the cell needs to show the text without clipping.
    pub fn min_width(&mut self) -> f64 {
        let width = self.width();
        if width > 0.0 {
            width + self.padding.horizontal()
        } else {
            0.0
        }
    }

    /// X offset of the run origin within the cell, honoring alignment when
    /// the available width is finite.
    fn run_x(&mut self) -> f64 {
        let width = self.width();
        let inner = self.available.width - self.padding.horizontal();
        match self.h_align {
            HorizontalAlign::Center if inner.is_finite() => {
                self.padding.left + ((inner - width) / 2.0).max(0.0)
            }
            HorizontalAlign::Right if inner.is_finite() => {
                self.padding.left + (inner - width).max(0.0)
            }
            _ => self.padding.left,
        }
    }

    /// Y offset of the run origin, treating the font size as the line box
    /// height.
    fn run_y(&mut self) -> f64 {
        let inner = self.available.height - self.padding.vertical();
        let line = self.font_size;
        match self.v_align {
            VerticalAlign::Center if inner.is_finite() => {
                self.padding.top + ((inner - line) / 2.0).max(0.0)
            }
            VerticalAlign::Bottom if inner.is_finite() => self.padding.top + (inner - line).max(0.0),
            _ => self.padding.top,
        }
    }

    /// Whether `point` (in cell-local coordinates) is over the laid-out
    /// text, for interactive cells.
    pub fn hit_test(&mut self, point: Point) -> bool {
        let width = self.width();
        if width <= 0.0 {
            return false;
        }
        let x = self.run_x();
        let y = self.run_y();
        point.x >= x && point.x <= x + width && point.y >= y && point.y <= y + self.font_size
    }

    /// Draw the shaped run at the cell origin. No run means no draw call.
    pub fn draw(&mut self, surface: &mut dyn RenderSurface, cell_origin: Point, color: Color) {
        let x = self.run_x();
        let y = self.run_y();
        if let Some(run) = self.run() {
            surface.draw_run(run, Point::new(cell_origin.x + x, cell_origin.y + y), color);
        }
    }
}

impl fmt::Debug for CellTextLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellTextLayout")
            .field("text", &self.text)
            .field("font_family", &self.font_family)
            .field("font_weight", &self.font_weight)
            .field("font_size", &self.font_size)
            .field("shaped", &self.run.is_some())
            .finish()
    }
}
