//! gridcore - rendering and coordination core for a virtualized data grid
//!
//! The pieces a virtualized tabular grid control needs around its host
//! framework:
//! - Per-column horizontal geometry and clip rectangles for cells scrolled
//!   partially out of view
//! - A per-cell shaped-text memo so text is re-shaped only when a shaping
//!   parameter actually changes
//! - Multi-column sort state with click-driven toggling and a composite
//!   comparator builder with a guaranteed primary-key tie-break
//! - A live filter pipeline combining per-column predicates into immutable
//!   snapshot predicates
//!
//! The visual-element framework, text shaping, and row virtualization stay
//! on the host side behind the traits in [`render`] and [`layout`]. All
//! state is driven from a single owning thread; the predicate and
//! comparator snapshots it produces are immutable and freely usable from
//! other threads.
//!
//! # Usage
//!
//! ```
//! use gridcore::column::{Column, ColumnCollection};
//! use gridcore::sort::ColumnSortManager;
//! use std::cmp::Ordering;
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! #[derive(Clone, Copy, PartialEq, Eq)]
//! enum Key { Name, Price }
//!
//! struct Item { name: &'static str, price: f64 }
//!
//! let columns: Rc<ColumnCollection<Key, Item>> = Rc::new(ColumnCollection::new());
//! columns.insert(Column::new("name", Key::Name))?;
//! let price = columns.insert(Column::new("price", Key::Price))?;
//!
//! let sorting = ColumnSortManager::new(Rc::clone(&columns), "name");
//! sorting.on_column_click(&price, false);
//!
//! let comparator = sorting.build_comparator(|key| {
//!     let comparer: gridcore::sort::ColumnComparer<Item> = match key {
//!         Key::Name => Arc::new(|a: &Item, b: &Item| a.name.cmp(b.name)),
//!         Key::Price => Arc::new(|a: &Item, b: &Item| a.price.total_cmp(&b.price)),
//!     };
//!     Some(comparer)
//! });
//! let cheap = Item { name: "b", price: 1.0 };
//! let pricey = Item { name: "a", price: 9.0 };
//! assert_eq!(comparator.compare(&cheap, &pricey), Ordering::Less);
//! # Ok::<(), gridcore::error::GridError>(())
//! ```

pub mod column;
pub mod error;
pub mod event;
pub mod filter;
pub mod layout;
pub mod render;
pub mod settings;
pub mod sort;

pub use column::{Column, ColumnCollection, SortDirection};
pub use error::{GridError, Result};
pub use filter::{ColumnFilter, FilterCriteria, RowPredicate};
pub use layout::{compute_clip, update_cell_clip, CellGeometry, ClipScope, ColumnGeometry};
pub use render::{CellTextLayout, RenderSurface, ShapedRun, VisualElement};
pub use settings::{FilterBinding, GridSettings};
pub use sort::{ColumnSortManager, RowComparator, SortingCriteria};
