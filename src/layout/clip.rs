//! Clip-rectangle computation for cells scrolled partially out of view.
//!
//! A cell needs a clip when its content overflows the column width, or when
//! the column itself is scrolled partially under the viewport's left edge
//! (`unclipped_left < left`). Content that fits an unobscured column draws
//! without a clip at all, which keeps the common case cheap.

use crate::layout::geometry::{CellGeometry, ColumnGeometry, Rect, RowProvider, Size};
use crate::render::surface::{RenderSurface, VisualElement, Visibility};
use std::ops::{Deref, DerefMut};

/// Compute the clip rectangle for one cell, if one is needed.
///
/// Returns `Some` when `content.width > width` or `unclipped_left < left`;
/// the clip spans from `left` to the column's visible right edge
/// (`width - left + unclipped_left` wide) over the full row height.
/// Returns `None` when the content fits and the column is not scrolled off
/// the left edge.
pub fn compute_clip(
    content: Size,
    row_height: f64,
    left: f64,
    unclipped_left: f64,
    width: f64,
) -> Option<Rect> {
    if content.width > width || unclipped_left < left {
        Some(Rect::new(left, 0.0, width - left + unclipped_left, row_height))
    } else {
        None
    }
}

/// [`compute_clip`] over a visual element's measured size.
///
/// A missing size (element not yet measured) is treated as zero-size
/// content, which never overflows on its own.
pub fn compute_clip_for_measured(
    measured: Option<Size>,
    row_height: f64,
    left: f64,
    unclipped_left: f64,
    width: f64,
) -> Option<Rect> {
    compute_clip(
        measured.unwrap_or(Size::ZERO),
        row_height,
        left,
        unclipped_left,
        width,
    )
}

/// Cell-local clip for a (row, column-geometry) pairing.
///
/// Uses the element-local rule: the cell's own origin is `x = 0`, and the
/// scrolled-off amount carries over as a negative `unclipped_left`.
pub fn clip_for_cell<P, C>(
    rows: &P,
    cell: &CellGeometry<P::Row, C>,
    content: Size,
) -> Option<Rect>
where
    P: RowProvider + ?Sized,
{
    let geometry = &cell.geometry;
    compute_clip(
        content,
        rows.row_height(cell.row),
        0.0,
        geometry.unclipped_left - geometry.left,
        geometry.width(),
    )
}

/// A pushed clip region that pops itself when the scope ends.
///
/// The pop runs on every exit path, including unwinds out of the drawing
/// code, so a failed draw cannot leak a pushed clip into subsequent draws.
pub struct ClipScope<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: RenderSurface + ?Sized> ClipScope<'a, S> {
    /// Push `rect` as a clip region on `surface` for the scope's lifetime.
    pub fn new(surface: &'a mut S, rect: Rect) -> Self {
        surface.push_clip(rect);
        Self { surface }
    }
}

impl<S: RenderSurface + ?Sized> Drop for ClipScope<'_, S> {
    fn drop(&mut self) {
        self.surface.pop_clip();
    }
}

impl<S: RenderSurface + ?Sized> Deref for ClipScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> DerefMut for ClipScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

/// Run `draw` with `rect` pushed as a clip region.
///
/// The clip is released when `draw` returns or unwinds.
pub fn with_clip<S, T>(surface: &mut S, rect: Rect, draw: impl FnOnce(&mut S) -> T) -> T
where
    S: RenderSurface + ?Sized,
{
    let mut scope = ClipScope::new(surface, rect);
    draw(&mut *scope)
}

/// Synchronize a cell visual's visibility and clip with its column geometry.
///
/// With no geometry the element is collapsed (it must not occupy layout
/// space, not merely be invisible). Otherwise it is made visible and its
/// clip recomputed in cell-local coordinates; the element's clip object is
/// only replaced when the rectangle actually changed, so unchanged cells do
/// not get invalidated.
pub fn update_cell_clip<V, C>(
    element: &mut V,
    geometry: Option<&ColumnGeometry<C>>,
    row_height: f64,
) where
    V: VisualElement + ?Sized,
{
    let Some(geometry) = geometry else {
        element.set_visibility(Visibility::Collapsed);
        return;
    };
    element.set_visibility(Visibility::Visible);

    let clip = compute_clip_for_measured(
        element.desired_size(),
        row_height,
        0.0,
        geometry.unclipped_left - geometry.left,
        geometry.width(),
    );
    if clip != element.clip() {
        element.set_clip(clip);
    }
}
