//! Column model and the ordered column collection.
//!
//! Columns expose explicit mutable fields plus explicit change events;
//! consumers subscribe directly. All mutation happens on the owning thread.
//!
//! `K` is the host's typed column key (used for programmatic comparer
//! lookup); `R` is the row type filters and comparers operate on.

use crate::error::{GridError, Result};
use crate::event::{Event, HandlerId};
use crate::filter::ColumnFilter;
use crate::render::text::FontWeight;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Direction of one column's participation in sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// The direction a header click moves to: an unsorted or descending
    /// column becomes ascending, an ascending column becomes descending.
    /// There is no click path back to "unsorted".
    pub fn toggled(prior: Option<Self>) -> Self {
        match prior {
            Some(Self::Ascending) => Self::Descending,
            _ => Self::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == Self::Ascending
    }
}

/// Per-column font overrides; unset fields fall back to grid-level values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontSettings {
    pub family: Option<String>,
    pub weight: Option<FontWeight>,
    pub size: Option<f64>,
}

/// Grid-level font values a column falls back to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    pub family: String,
    pub weight: FontWeight,
    pub size: f64,
}

impl FontSettings {
    /// Resolve against grid defaults.
    pub fn resolve(&self, defaults: &ResolvedFont) -> ResolvedFont {
        ResolvedFont {
            family: self
                .family
                .clone()
                .unwrap_or_else(|| defaults.family.clone()),
            weight: self.weight.unwrap_or(defaults.weight),
            size: self.size.unwrap_or(defaults.size),
        }
    }
}

struct FilterSlot<R> {
    filter: Rc<ColumnFilter<R>>,
    hook: HandlerId,
}

/// One grid column.
///
/// Identity is the user-assigned `id`, unique within the owning collection.
/// The typed `key` is what comparer factories dispatch on.
pub struct Column<K, R> {
    id: String,
    key: K,
    label: RefCell<String>,
    sort_direction: Cell<Option<SortDirection>>,
    visible: Cell<bool>,
    font: RefCell<FontSettings>,
    filter: RefCell<Option<FilterSlot<R>>>,
    /// Fires when the column's filter is replaced or when the current
    /// filter's criteria change.
    filter_changed: Event<()>,
}

impl<K, R> Column<K, R> {
    pub fn new(id: impl Into<String>, key: K) -> Self {
        let id = id.into();
        let label = id.clone();
        Self {
            id,
            key,
            label: RefCell::new(label),
            sort_direction: Cell::new(None),
            visible: Cell::new(true),
            font: RefCell::new(FontSettings::default()),
            filter: RefCell::new(None),
            filter_changed: Event::new(),
        }
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        *self.label.borrow_mut() = label.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        *self.label.borrow_mut() = label.into();
    }

    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort_direction.get()
    }

    pub fn set_sort_direction(&self, direction: Option<SortDirection>) {
        self.sort_direction.set(direction);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub fn font(&self) -> FontSettings {
        self.font.borrow().clone()
    }

    pub fn set_font(&self, font: FontSettings) {
        *self.font.borrow_mut() = font;
    }

    pub fn filter(&self) -> Option<Rc<ColumnFilter<R>>> {
        self.filter.borrow().as_ref().map(|slot| Rc::clone(&slot.filter))
    }

    /// Event raised on filter replacement and on criteria changes of the
    /// current filter.
    pub fn filter_changed(&self) -> &Event<()> {
        &self.filter_changed
    }

    /// Attach or remove the column's filter.
    ///
    /// Change notifications from the new filter are forwarded into
    /// [`Self::filter_changed`]; the hook on the old filter is detached.
    pub fn set_filter(self: &Rc<Self>, filter: Option<Rc<ColumnFilter<R>>>)
    where
        K: 'static,
        R: 'static,
    {
        if let Some(slot) = self.filter.borrow_mut().take() {
            slot.filter.changed().unsubscribe(slot.hook);
        }
        if let Some(filter) = filter {
            let weak = Rc::downgrade(self);
            let hook = filter.changed().subscribe(move |_| {
                if let Some(column) = weak.upgrade() {
                    column.filter_changed.emit(&());
                }
            });
            *self.filter.borrow_mut() = Some(FilterSlot { filter, hook });
        }
        self.filter_changed.emit(&());
    }
}

impl<K, R> PartialEq for Column<K, R> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K, R> Eq for Column<K, R> {}

impl<K: fmt::Debug, R> fmt::Debug for Column<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("sort_direction", &self.sort_direction.get())
            .field("visible", &self.visible.get())
            .field("has_filter", &self.filter.borrow().is_some())
            .finish()
    }
}

/// Change notification raised by [`ColumnCollection`].
#[derive(Debug)]
pub enum CollectionChange<K, R> {
    Added(Rc<Column<K, R>>),
    Removed(Rc<Column<K, R>>),
}

/// The ordered, mutable set of columns owned by the grid.
pub struct ColumnCollection<K, R> {
    columns: RefCell<Vec<Rc<Column<K, R>>>>,
    changed: Event<CollectionChange<K, R>>,
}

impl<K, R> ColumnCollection<K, R> {
    pub fn new() -> Self {
        Self {
            columns: RefCell::new(Vec::new()),
            changed: Event::new(),
        }
    }

    /// Append a column. Ids must be unique within the collection.
    pub fn insert(&self, column: Column<K, R>) -> Result<Rc<Column<K, R>>> {
        if self.by_id(column.id()).is_some() {
            return Err(GridError::DuplicateColumn(column.id().to_string()));
        }
        let column = Rc::new(column);
        self.columns.borrow_mut().push(Rc::clone(&column));
        self.changed.emit(&CollectionChange::Added(Rc::clone(&column)));
        Ok(column)
    }

    /// Remove a column by id, returning it if present.
    pub fn remove(&self, id: &str) -> Option<Rc<Column<K, R>>> {
        let removed = {
            let mut columns = self.columns.borrow_mut();
            let index = columns.iter().position(|column| column.id() == id)?;
            columns.remove(index)
        };
        self.changed
            .emit(&CollectionChange::Removed(Rc::clone(&removed)));
        Some(removed)
    }

    pub fn by_id(&self, id: &str) -> Option<Rc<Column<K, R>>> {
        self.columns
            .borrow()
            .iter()
            .find(|column| column.id() == id)
            .map(Rc::clone)
    }

    /// Snapshot of the columns in declaration order.
    pub fn columns(&self) -> Vec<Rc<Column<K, R>>> {
        self.columns.borrow().clone()
    }

    /// Snapshot of the currently visible columns in declaration order.
    pub fn visible_columns(&self) -> Vec<Rc<Column<K, R>>> {
        self.columns
            .borrow()
            .iter()
            .filter(|column| column.is_visible())
            .map(Rc::clone)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.borrow().is_empty()
    }

    /// Add/remove notifications.
    pub fn changed(&self) -> &Event<CollectionChange<K, R>> {
        &self.changed
    }
}

impl<K, R> Default for ColumnCollection<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, R> fmt::Debug for ColumnCollection<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnCollection")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestColumn = Column<&'static str, ()>;
    type TestCollection = ColumnCollection<&'static str, ()>;

    #[test]
    fn toggle_cycle_never_returns_to_none() {
        let mut direction = None;
        let expected = [
            SortDirection::Ascending,
            SortDirection::Descending,
            SortDirection::Ascending,
            SortDirection::Descending,
        ];
        for want in expected {
            let next = SortDirection::toggled(direction);
            assert_eq!(next, want);
            direction = Some(next);
        }
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let collection = TestCollection::new();
        collection.insert(TestColumn::new("price", "price")).ok();
        let err = collection.insert(TestColumn::new("price", "price2"));
        assert!(matches!(err, Err(GridError::DuplicateColumn(id)) if id == "price"));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn collection_raises_add_and_remove() {
        let collection = Rc::new(TestCollection::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&log);
        collection.changed().subscribe(move |change| {
            let entry = match change {
                CollectionChange::Added(c) => format!("+{}", c.id()),
                CollectionChange::Removed(c) => format!("-{}", c.id()),
            };
            sink.borrow_mut().push(entry);
        });

        collection.insert(TestColumn::new("a", "a")).ok();
        collection.insert(TestColumn::new("b", "b")).ok();
        collection.remove("a");
        assert!(collection.remove("missing").is_none());

        assert_eq!(*log.borrow(), vec!["+a", "+b", "-a"]);
    }

    #[test]
    fn font_overrides_fall_back_to_grid_defaults() {
        let defaults = ResolvedFont {
            family: "Sans".to_string(),
            weight: FontWeight::NORMAL,
            size: 12.0,
        };
        let partial = FontSettings {
            family: None,
            weight: Some(FontWeight::BOLD),
            size: None,
        };
        let resolved = partial.resolve(&defaults);
        assert_eq!(resolved.family, "Sans");
        assert_eq!(resolved.weight, FontWeight::BOLD);
        assert_eq!(resolved.size.total_cmp(&12.0), std::cmp::Ordering::Equal);
    }
}
