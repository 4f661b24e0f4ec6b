//! Per-pass cell geometry and clip computation.

pub mod clip;
pub mod geometry;

pub use clip::{
    clip_for_cell, compute_clip, compute_clip_for_measured, update_cell_clip, with_clip, ClipScope,
};
pub use geometry::{CellGeometry, ColumnGeometry, Point, Rect, RowProvider, Size, Thickness};
