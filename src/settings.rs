//! Persistable grid settings and the column-to-settings association.
//!
//! The persisted shape is deliberately plain: an ordered list of sorting
//! criteria plus per-property filter criteria. The mapping from a column id
//! to its settings property is an explicit table resolved once at setup
//! ([`FilterBinding`]), not discovered per access.

use crate::column::ColumnCollection;
use crate::error::{GridError, Result};
use crate::filter::{ColumnFilter, FilterCriteria};
use crate::sort::SortingCriteria;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A display label readable from a non-owning thread.
///
/// The owning thread replaces the whole `Arc<str>` on every change;
/// readers clone the current one out. Single writer, copy-on-write reads —
/// the persistence thread never re-enters owning-thread state.
#[derive(Debug, Clone)]
pub struct SharedLabel {
    inner: Arc<RwLock<Arc<str>>>,
}

impl SharedLabel {
    pub fn new(label: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::from(label))),
        }
    }

    /// Replace the label (owning thread only).
    pub fn set(&self, label: &str) {
        *self.inner.write() = Arc::from(label);
    }

    /// Snapshot the current label (any thread).
    pub fn get(&self) -> Arc<str> {
        Arc::clone(&self.inner.read())
    }
}

impl Default for SharedLabel {
    fn default() -> Self {
        Self::new("")
    }
}

/// Persistable grid settings.
///
/// The display label is mirrored into a [`SharedLabel`] whenever it changes
/// on the owning thread, so persistence code on another thread can read it
/// without touching this structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    label: String,
    /// Sort participation in click order.
    pub sorting: Vec<SortingCriteria>,
    /// Filter criteria keyed by settings property name.
    pub filters: HashMap<String, FilterCriteria>,
    #[serde(skip)]
    mirror: Mirror,
}

#[derive(Debug, Clone, Default)]
struct Mirror(SharedLabel);

impl PartialEq for Mirror {
    fn eq(&self, _other: &Self) -> bool {
        // The mirror follows `label`; it carries no identity of its own.
        true
    }
}

impl GridSettings {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the display label and republish the cross-thread mirror.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.mirror.0.set(&self.label);
    }

    /// Handle for reading the label from a non-owning thread.
    pub fn shared_label(&self) -> SharedLabel {
        self.mirror.0.clone()
    }

    /// Republish all mirrored summary fields, e.g. after deserializing.
    pub fn publish_summary(&self) {
        self.mirror.0.set(&self.label);
    }
}

struct BindingEntry<R> {
    column_id: String,
    property: String,
    filter: Rc<ColumnFilter<R>>,
}

/// The column-id-to-settings-property association, resolved once at setup.
///
/// Construction fails fast when a filterable column has no associated
/// property: that is a mismatched schema between grid and settings, not a
/// condition to tolerate at access time.
pub struct FilterBinding<R> {
    entries: Vec<BindingEntry<R>>,
}

impl<R> FilterBinding<R> {
    /// Resolve the association table against `columns`.
    ///
    /// `associations` maps column id to settings property name. Every
    /// column that currently owns a filter must have an entry; extra
    /// associations for columns the grid no longer has are ignored.
    pub fn new<K>(
        columns: &ColumnCollection<K, R>,
        associations: &[(&str, &str)],
    ) -> Result<Self> {
        let mut entries = Vec::new();
        for column in columns.columns() {
            let Some(filter) = column.filter() else {
                continue;
            };
            let property = associations
                .iter()
                .find(|(column_id, _)| *column_id == column.id())
                .map(|(_, property)| (*property).to_string())
                .ok_or_else(|| GridError::SettingsBinding(column.id().to_string()))?;
            entries.push(BindingEntry {
                column_id: column.id().to_string(),
                property,
                filter,
            });
        }
        Ok(Self { entries })
    }

    /// Number of bound filterable columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push persisted criteria into the bound filters.
    pub fn apply(&self, settings: &GridSettings)
    where
        R: 'static,
    {
        for entry in &self.entries {
            entry
                .filter
                .set_criteria(settings.filters.get(&entry.property).cloned());
        }
    }

    /// Capture the bound filters' criteria into `settings`.
    ///
    /// Filters without structured criteria clear their property, so stale
    /// persisted criteria do not outlive the filter state they came from.
    pub fn capture(&self, settings: &mut GridSettings) {
        for entry in &self.entries {
            match entry.filter.criteria() {
                Some(criteria) => {
                    settings.filters.insert(entry.property.clone(), criteria);
                }
                None => {
                    settings.filters.remove(&entry.property);
                }
            }
        }
    }

    /// The property name bound to `column_id`, if any.
    pub fn property_for(&self, column_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.column_id == column_id)
            .map(|entry| entry.property.as_str())
    }
}

impl<R> fmt::Debug for FilterBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBinding")
            .field("entries", &self.entries.len())
            .finish()
    }
}
