//! Multi-column sort state and composite comparator construction.
//!
//! Sort participation is click-ordered, not column-declaration-ordered: the
//! manager keeps the columns the user activated in the order they activated
//! them, and guarantees a deterministic total row order by appending the
//! grid's primary-key column as the final tie-break whenever it is not
//! already part of the sequence.

use crate::column::{Column, ColumnCollection, SortDirection};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Persistable snapshot of one column's participation in sort order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortingCriteria {
    pub column_id: String,
    pub ascending: bool,
}

/// A type-specific comparer for one column key.
pub type ColumnComparer<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// An immutable chain of column comparers; first non-equal result wins.
///
/// Built by [`ColumnSortManager::build_comparator`] and safe to use from
/// any thread after the fact.
pub struct RowComparator<R> {
    chain: Arc<[(ColumnComparer<R>, bool)]>,
}

impl<R> RowComparator<R> {
    /// Lexicographic composite comparison over the chained comparers;
    /// descending entries invert the comparison sign.
    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        for (comparer, ascending) in self.chain.iter() {
            let ordering = comparer(a, b);
            let ordering = if *ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    pub fn key_count(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl<R> Clone for RowComparator<R> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<R> fmt::Debug for RowComparator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowComparator")
            .field("key_count", &self.key_count())
            .finish()
    }
}

/// Stateful controller over a column collection's sort participation.
pub struct ColumnSortManager<K, R> {
    columns: Rc<ColumnCollection<K, R>>,
    /// Active sort columns in click order.
    visible_sorting: RefCell<Vec<Rc<Column<K, R>>>>,
    primary_key: String,
}

impl<K, R> ColumnSortManager<K, R> {
    /// `primary_key` names the column guaranteed to participate as the
    /// final tie-break even with no explicit user sort.
    pub fn new(columns: Rc<ColumnCollection<K, R>>, primary_key: impl Into<String>) -> Self {
        Self {
            columns,
            visible_sorting: RefCell::new(Vec::new()),
            primary_key: primary_key.into(),
        }
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// The columns participating in sort, in click order, with the
    /// primary-key column appended as the implicit final tie-break when no
    /// entry already carries its id.
    pub fn effective_sort_sequence(&self) -> Vec<Rc<Column<K, R>>> {
        let mut sequence = self.visible_sorting.borrow().clone();
        if !sequence.iter().any(|column| column.id() == self.primary_key) {
            if let Some(primary) = self.columns.by_id(&self.primary_key) {
                sequence.push(primary);
            }
        }
        sequence
    }

    /// Handle a header click.
    ///
    /// Without the multi-select modifier the clicked column becomes the
    /// sole sort column, toggled from its prior direction. With the
    /// modifier its direction toggles in place; it joins the end of the
    /// click order only on first activation and never leaves it via
    /// clicking (no path back to "unsorted").
    pub fn on_column_click(&self, column: &Rc<Column<K, R>>, multi_select: bool) {
        let prior = column.sort_direction();
        if multi_select {
            column.set_sort_direction(Some(SortDirection::toggled(prior)));
            if prior.is_none() {
                self.visible_sorting.borrow_mut().push(Rc::clone(column));
            }
        } else {
            for other in self.columns.columns() {
                other.set_sort_direction(None);
            }
            let mut visible = self.visible_sorting.borrow_mut();
            visible.clear();
            column.set_sort_direction(Some(SortDirection::toggled(prior)));
            visible.push(Rc::clone(column));
        }
        debug!(
            "sort click on {:?} (multi: {multi_select}) -> {:?}",
            column.id(),
            column.sort_direction()
        );
    }

    /// One entry per visible-sorting column that currently has a
    /// direction, in click order.
    pub fn sorting_criteria(&self) -> Vec<SortingCriteria> {
        self.visible_sorting
            .borrow()
            .iter()
            .filter_map(|column| {
                column.sort_direction().map(|direction| SortingCriteria {
                    column_id: column.id().to_string(),
                    ascending: direction.is_ascending(),
                })
            })
            .collect()
    }

    /// Restore persisted sort state.
    ///
    /// Clears all current state, then applies the criteria in supplied
    /// order. Ids not present in the collection are skipped silently so
    /// stale persisted state referencing removed columns keeps loading.
    pub fn set_sorting_criteria(&self, criteria: &[SortingCriteria]) {
        for column in self.columns.columns() {
            column.set_sort_direction(None);
        }
        let mut visible = self.visible_sorting.borrow_mut();
        visible.clear();
        for criterion in criteria {
            let Some(column) = self.columns.by_id(&criterion.column_id) else {
                debug!(
                    "skipping persisted sort entry for unknown column {:?}",
                    criterion.column_id
                );
                continue;
            };
            column.set_sort_direction(Some(if criterion.ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            }));
            visible.push(column);
        }
    }

    /// Build the composite row comparator for the effective sequence.
    ///
    /// `comparers` maps a column key to its type-specific comparer; keys
    /// without one contribute nothing. The implicitly-appended primary-key
    /// fallback compares ascending when it carries no direction of its
    /// own, keeping the composite order total at all times.
    pub fn build_comparator(
        &self,
        comparers: impl Fn(&K) -> Option<ColumnComparer<R>>,
    ) -> RowComparator<R> {
        let mut chain = Vec::new();
        for column in self.effective_sort_sequence() {
            let direction = column.sort_direction().or_else(|| {
                (column.id() == self.primary_key).then_some(SortDirection::Ascending)
            });
            let Some(direction) = direction else {
                continue;
            };
            let Some(comparer) = comparers(column.key()) else {
                continue;
            };
            chain.push((comparer, direction.is_ascending()));
        }
        RowComparator {
            chain: chain.into(),
        }
    }
}

impl<K, R> fmt::Debug for ColumnSortManager<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSortManager")
            .field("primary_key", &self.primary_key)
            .field("visible_sorting", &self.visible_sorting.borrow().len())
            .finish()
    }
}
