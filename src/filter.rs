//! Per-column filters and the combined row-predicate pipeline.
//!
//! Each column may own one [`ColumnFilter`]. The manager side
//! ([`watch`]) observes a column collection, tracks which filters are
//! currently active, and republishes an immutable combined predicate
//! snapshot ([`RowPredicate`]) whenever any column's filter activity or
//! criteria change. Consumers only ever hold frozen snapshots; mutation
//! after a broadcast cannot alter a predicate that was already issued.

use crate::column::{CollectionChange, Column, ColumnCollection};
use crate::event::{Event, HandlerId};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// A row predicate frozen into a snapshot.
pub type FilterFn<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Extracts the filtered value from a row for one column.
pub type ValueFn<R> = Arc<dyn Fn(&R) -> FilterValue + Send + Sync>;

/// A cell value as seen by filter criteria.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl FilterValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Empty => None,
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Comparison operator for condition criteria.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// One comparison condition.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub operator: ComparisonOperator,
    pub value: String,
}

impl Condition {
    /// Numeric comparison when both sides parse as numbers, otherwise
    /// case-insensitive string comparison.
    fn matches(&self, value: &FilterValue) -> bool {
        let ordering = match (value.as_number(), self.value.trim().parse::<f64>().ok()) {
            (Some(left), Some(right)) => left.total_cmp(&right),
            _ => value
                .display()
                .to_lowercase()
                .cmp(&self.value.to_lowercase()),
        };
        match self.operator {
            ComparisonOperator::Equal => ordering == Ordering::Equal,
            ComparisonOperator::NotEqual => ordering != Ordering::Equal,
            ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
            ComparisonOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            ComparisonOperator::LessThan => ordering == Ordering::Less,
            ComparisonOperator::LessThanOrEqual => ordering != Ordering::Greater,
        }
    }
}

/// Persistable criteria for one column's filter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum FilterCriteria {
    /// Keep rows whose value is one of the listed display strings.
    Values(Vec<String>),
    /// Keep rows matching the conditions; `all` selects AND over OR.
    Conditions { conditions: Vec<Condition>, all: bool },
}

impl FilterCriteria {
    /// Whether a row with `value` in the filtered column passes.
    pub fn matches(&self, value: &FilterValue) -> bool {
        match self {
            Self::Values(values) => {
                let display = value.display();
                values.iter().any(|v| *v == display)
            }
            Self::Conditions { conditions, all } => {
                if *all {
                    conditions.iter().all(|c| c.matches(value))
                } else {
                    conditions.iter().any(|c| c.matches(value))
                }
            }
        }
    }

    /// True when the criteria cannot exclude any row (vacuous), e.g. an
    /// AND over zero conditions. Such criteria leave the filter inert.
    pub fn accepts_everything(&self) -> bool {
        match self {
            Self::Values(_) => false,
            Self::Conditions { conditions, all } => *all && conditions.is_empty(),
        }
    }
}

struct FilterState {
    active: Option<bool>,
    criteria: Option<FilterCriteria>,
}

/// One column's filter: tri-state activity, criteria, and a row predicate.
///
/// `active` is `Some(true)` only when the current criteria would exclude at
/// least one conceivable row — criteria that are merely present but vacuous
/// leave the filter inert. Filters are owned by their column; managers only
/// observe them.
pub struct ColumnFilter<R> {
    property_name: String,
    value_of: ValueFn<R>,
    state: RefCell<FilterState>,
    predicate: RefCell<FilterFn<R>>,
    changed: Event<()>,
}

impl<R> ColumnFilter<R> {
    /// Create an inert filter for the settings property `property_name`,
    /// reading row values through `value_of`.
    pub fn new(property_name: impl Into<String>, value_of: ValueFn<R>) -> Self {
        Self {
            property_name: property_name.into(),
            value_of,
            state: RefCell::new(FilterState {
                active: None,
                criteria: None,
            }),
            predicate: RefCell::new(Arc::new(|_| true)),
            changed: Event::new(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Tri-state activity: `Some(true)` when the criteria constrain rows,
    /// `Some(false)` when explicitly inert, `None` when never configured.
    pub fn is_active(&self) -> Option<bool> {
        self.state.borrow().active
    }

    pub fn criteria(&self) -> Option<FilterCriteria> {
        self.state.borrow().criteria.clone()
    }

    /// The current predicate, cloneable into snapshots.
    pub fn predicate(&self) -> FilterFn<R> {
        Arc::clone(&self.predicate.borrow())
    }

    pub fn accepts(&self, row: &R) -> bool {
        (self.predicate())(row)
    }

    /// Change notifications; the owning column forwards these into its
    /// `filter_changed` event.
    pub fn changed(&self) -> &Event<()> {
        &self.changed
    }

    /// Replace the criteria; the predicate and activity are derived.
    pub fn set_criteria(&self, criteria: Option<FilterCriteria>)
    where
        R: 'static,
    {
        let (active, predicate): (Option<bool>, FilterFn<R>) = match &criteria {
            None => (Some(false), Arc::new(|_| true)),
            Some(c) => {
                let criteria = c.clone();
                let value_of = Arc::clone(&self.value_of);
                (
                    Some(!c.accepts_everything()),
                    Arc::new(move |row: &R| criteria.matches(&value_of(row))),
                )
            }
        };
        {
            let mut state = self.state.borrow_mut();
            state.active = active;
            state.criteria = criteria;
            *self.predicate.borrow_mut() = predicate;
        }
        self.changed.emit(&());
    }

    /// Install a host-supplied predicate with an explicit activity flag.
    /// No structured criteria remain, so nothing is persisted for it.
    pub fn set_custom(&self, active: Option<bool>, predicate: FilterFn<R>) {
        {
            let mut state = self.state.borrow_mut();
            state.active = active;
            state.criteria = None;
            *self.predicate.borrow_mut() = predicate;
        }
        self.changed.emit(&());
    }
}

impl<R> fmt::Debug for ColumnFilter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ColumnFilter")
            .field("property_name", &self.property_name)
            .field("active", &state.active)
            .field("criteria", &state.criteria)
            .finish()
    }
}

/// An immutable combined-predicate snapshot.
///
/// Captured at broadcast time; safe to use from any thread after the fact
/// even if filters change later. Zero active filters accept every row.
pub struct RowPredicate<R> {
    filters: Arc<[FilterFn<R>]>,
}

impl<R> RowPredicate<R> {
    /// The empty snapshot.
    pub fn accept_all() -> Self {
        Self {
            filters: Arc::from(Vec::new()),
        }
    }

    fn from_filters(filters: Vec<FilterFn<R>>) -> Self {
        Self {
            filters: Arc::from(filters),
        }
    }

    /// AND over the frozen filter list.
    pub fn accepts(&self, row: &R) -> bool {
        self.filters.iter().all(|filter| filter(row))
    }

    /// Number of filters frozen into this snapshot.
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }
}

impl<R> Clone for RowPredicate<R> {
    fn clone(&self) -> Self {
        Self {
            filters: Arc::clone(&self.filters),
        }
    }
}

impl<R> fmt::Debug for RowPredicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowPredicate")
            .field("filter_count", &self.filter_count())
            .finish()
    }
}

struct ColumnHook<K, R> {
    column: Weak<Column<K, R>>,
    hook: HandlerId,
}

struct WatchState<K, R> {
    collection: Weak<ColumnCollection<K, R>>,
    collection_hook: Option<HandlerId>,
    hooks: Vec<ColumnHook<K, R>>,
    /// Only columns whose filter is currently active.
    active: HashMap<String, Rc<ColumnFilter<R>>>,
    current: RowPredicate<R>,
    sink: Rc<dyn Fn(&RowPredicate<R>)>,
    disposed: bool,
}

impl<K, R> WatchState<K, R> {
    fn snapshot(&self) -> RowPredicate<R> {
        RowPredicate::from_filters(
            self.active
                .values()
                .map(|filter| filter.predicate())
                .collect(),
        )
    }
}

/// Live subscription produced by [`watch`]. Dropping it (or calling
/// [`Self::dispose`]) detaches every hook.
pub struct FilterSubscription<K, R> {
    state: Rc<RefCell<WatchState<K, R>>>,
}

impl<K, R> FilterSubscription<K, R> {
    /// The most recently published combined predicate.
    pub fn current(&self) -> RowPredicate<R> {
        self.state.borrow().current.clone()
    }

    /// Number of columns whose filter is currently active.
    pub fn active_filter_count(&self) -> usize {
        self.state.borrow().active.len()
    }

    /// Detach all hooks. Hooks go first, then state: callbacks firing
    /// mid-teardown find the subscription disposed and are ignored.
    pub fn dispose(&self) {
        let (collection, collection_hook, hooks) = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
            (
                state.collection.upgrade(),
                state.collection_hook.take(),
                std::mem::take(&mut state.hooks),
            )
        };
        if let (Some(collection), Some(hook)) = (collection, collection_hook) {
            collection.changed().unsubscribe(hook);
        }
        for hook in hooks {
            if let Some(column) = hook.column.upgrade() {
                column.filter_changed().unsubscribe(hook.hook);
            }
        }
        self.state.borrow_mut().active.clear();
    }
}

impl<K, R> Drop for FilterSubscription<K, R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<K, R> fmt::Debug for FilterSubscription<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FilterSubscription")
            .field("active_filters", &state.active.len())
            .field("disposed", &state.disposed)
            .finish()
    }
}

fn column_is_active<K, R>(column: &Column<K, R>) -> Option<Rc<ColumnFilter<R>>> {
    let filter = column.filter()?;
    (filter.is_active() == Some(true)).then_some(filter)
}

fn attach_column<K: 'static, R: 'static>(
    state: &Rc<RefCell<WatchState<K, R>>>,
    column: &Rc<Column<K, R>>,
) {
    let weak_state = Rc::downgrade(state);
    let weak_column = Rc::downgrade(column);
    let hook = column.filter_changed().subscribe(move |_| {
        let (Some(state), Some(column)) = (weak_state.upgrade(), weak_column.upgrade()) else {
            return;
        };
        reevaluate(&state, &column);
    });
    state.borrow_mut().hooks.push(ColumnHook {
        column: Rc::downgrade(column),
        hook,
    });
}

fn detach_column<K, R>(state: &Rc<RefCell<WatchState<K, R>>>, column: &Rc<Column<K, R>>) {
    let hook = {
        let mut state = state.borrow_mut();
        let index = state
            .hooks
            .iter()
            .position(|hook| hook.column.as_ptr() == Rc::as_ptr(column));
        index.map(|index| state.hooks.remove(index))
    };
    if let Some(hook) = hook {
        column.filter_changed().unsubscribe(hook.hook);
    }
}

/// Re-evaluate one column's activity, update the active map, freeze a new
/// snapshot, and broadcast it.
fn reevaluate<K, R>(state: &Rc<RefCell<WatchState<K, R>>>, column: &Rc<Column<K, R>>) {
    let (predicate, sink) = {
        let mut guard = state.borrow_mut();
        if guard.disposed {
            return;
        }
        match column_is_active(column) {
            Some(filter) => {
                guard.active.insert(column.id().to_string(), filter);
            }
            None => {
                guard.active.remove(column.id());
            }
        }
        guard.current = guard.snapshot();
        trace!(
            "filter change on column {:?}: {} active filter(s)",
            column.id(),
            guard.active.len()
        );
        (guard.current.clone(), Rc::clone(&guard.sink))
    };
    // Borrow released before the sink runs; it may re-enter `current()`.
    sink(&predicate);
}

/// Observe `collection` and republish a combined row predicate through
/// `sink` on every filter activity or criteria change.
///
/// The map of active filters is seeded from the collection's current state;
/// the seed does not broadcast (read [`FilterSubscription::current`] for
/// the initial predicate). Columns added later are hooked, removed columns
/// are unhooked and leave the active map.
pub fn watch<K: 'static, R: 'static>(
    collection: &Rc<ColumnCollection<K, R>>,
    sink: impl Fn(&RowPredicate<R>) + 'static,
) -> FilterSubscription<K, R> {
    let state = Rc::new(RefCell::new(WatchState {
        collection: Rc::downgrade(collection),
        collection_hook: None,
        hooks: Vec::new(),
        active: HashMap::new(),
        current: RowPredicate::accept_all(),
        sink: Rc::new(sink),
        disposed: false,
    }));

    // Seed from currently-active filterable columns.
    for column in collection.columns() {
        attach_column(&state, &column);
        if let Some(filter) = column_is_active(&column) {
            state
                .borrow_mut()
                .active
                .insert(column.id().to_string(), filter);
        }
    }
    {
        let mut guard = state.borrow_mut();
        guard.current = guard.snapshot();
        debug!("filter watch seeded with {} active filter(s)", guard.active.len());
    }

    let weak_state = Rc::downgrade(&state);
    let hook = collection.changed().subscribe(move |change| {
        let Some(state) = weak_state.upgrade() else {
            return;
        };
        if state.borrow().disposed {
            return;
        }
        match change {
            CollectionChange::Added(column) => {
                attach_column(&state, column);
                if column.filter().is_some() {
                    reevaluate(&state, column);
                }
            }
            CollectionChange::Removed(column) => {
                detach_column(&state, column);
                let (removed, predicate, sink) = {
                    let mut guard = state.borrow_mut();
                    let removed = guard.active.remove(column.id()).is_some();
                    if removed {
                        guard.current = guard.snapshot();
                    }
                    (removed, guard.current.clone(), Rc::clone(&guard.sink))
                };
                if removed {
                    sink(&predicate);
                }
            }
        }
    });
    state.borrow_mut().collection_hook = Some(hook);

    FilterSubscription { state }
}
