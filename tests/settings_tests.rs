//! Persisted settings shape and filter-binding tests.
//!
//! The persisted state is an ordered sorting-criteria list plus filter
//! criteria keyed by settings property name. The column-to-property
//! association is resolved once at setup and fails fast on a schema
//! mismatch.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::indexing_slicing
)]

use gridcore::column::{Column, ColumnCollection};
use gridcore::error::GridError;
use gridcore::filter::{
    ColumnFilter, ComparisonOperator, Condition, FilterCriteria, FilterValue,
};
use gridcore::settings::{FilterBinding, GridSettings, SharedLabel};
use gridcore::sort::{ColumnSortManager, SortingCriteria};
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Name,
    Price,
}

#[derive(Debug, Clone)]
struct Row {
    name: &'static str,
    price: f64,
}

fn collection_with_filters() -> Rc<ColumnCollection<Key, Row>> {
    let columns = Rc::new(ColumnCollection::new());
    let price = columns.insert(Column::new("price", Key::Price)).unwrap();
    let name = columns.insert(Column::new("name", Key::Name)).unwrap();
    price.set_filter(Some(Rc::new(ColumnFilter::new(
        "priceFilter",
        Arc::new(|row: &Row| FilterValue::Number(row.price)),
    ))));
    name.set_filter(Some(Rc::new(ColumnFilter::new(
        "nameFilter",
        Arc::new(|row: &Row| FilterValue::Text(row.name.to_string())),
    ))));
    columns
}

fn price_above(value: &str) -> FilterCriteria {
    FilterCriteria::Conditions {
        conditions: vec![Condition {
            operator: ComparisonOperator::GreaterThan,
            value: value.to_string(),
        }],
        all: true,
    }
}

// ============================================================================
// Binding setup
// ============================================================================

#[test]
fn binding_resolves_every_filterable_column() {
    let columns = collection_with_filters();
    let binding = FilterBinding::new(
        &columns,
        &[("price", "priceFilter"), ("name", "nameFilter")],
    )
    .unwrap();

    assert_eq!(binding.len(), 2);
    assert_eq!(binding.property_for("price"), Some("priceFilter"));
    assert_eq!(binding.property_for("missing"), None);
}

#[test]
fn missing_association_fails_fast() {
    let columns = collection_with_filters();
    let err = FilterBinding::new(&columns, &[("price", "priceFilter")]);
    assert!(matches!(err, Err(GridError::SettingsBinding(id)) if id == "name"));
}

#[test]
fn stale_associations_for_removed_columns_are_ignored() {
    let columns = collection_with_filters();
    let binding = FilterBinding::new(
        &columns,
        &[
            ("price", "priceFilter"),
            ("name", "nameFilter"),
            ("removed", "removedFilter"),
        ],
    )
    .unwrap();
    assert_eq!(binding.len(), 2);
}

#[test]
fn columns_without_filters_need_no_association() {
    let columns: Rc<ColumnCollection<Key, Row>> = Rc::new(ColumnCollection::new());
    columns.insert(Column::new("price", Key::Price)).unwrap();
    let binding = FilterBinding::new(&columns, &[]).unwrap();
    assert!(binding.is_empty());
}

// ============================================================================
// Apply / capture round trip
// ============================================================================

#[test]
fn apply_pushes_criteria_into_the_bound_filters() {
    let columns = collection_with_filters();
    let binding = FilterBinding::new(
        &columns,
        &[("price", "priceFilter"), ("name", "nameFilter")],
    )
    .unwrap();

    let mut settings = GridSettings::default();
    settings
        .filters
        .insert("priceFilter".to_string(), price_above("10"));
    binding.apply(&settings);

    let filter = columns.by_id("price").unwrap().filter().unwrap();
    assert_eq!(filter.is_active(), Some(true));
    assert!(!filter.accepts(&Row {
        name: "x",
        price: 5.0
    }));

    // The name filter had no persisted criteria and stays inert.
    let name_filter = columns.by_id("name").unwrap().filter().unwrap();
    assert_eq!(name_filter.is_active(), Some(false));
}

#[test]
fn capture_round_trips_criteria() {
    let columns = collection_with_filters();
    let binding = FilterBinding::new(
        &columns,
        &[("price", "priceFilter"), ("name", "nameFilter")],
    )
    .unwrap();

    let filter = columns.by_id("price").unwrap().filter().unwrap();
    filter.set_criteria(Some(price_above("10")));

    let mut settings = GridSettings::default();
    binding.capture(&mut settings);
    assert_eq!(settings.filters.get("priceFilter"), Some(&price_above("10")));
    assert!(!settings.filters.contains_key("nameFilter"));

    // Clearing the filter clears its property on the next capture.
    filter.set_criteria(None);
    binding.capture(&mut settings);
    assert!(!settings.filters.contains_key("priceFilter"));
}

// ============================================================================
// Persisted wire shape
// ============================================================================

#[test]
fn sorting_criteria_serialize_camel_case() {
    let criteria = SortingCriteria {
        column_id: "price".to_string(),
        ascending: false,
    };
    let json = serde_json::to_string(&criteria).unwrap();
    assert_eq!(json, r#"{"columnId":"price","ascending":false}"#);

    let back: SortingCriteria = serde_json::from_str(&json).unwrap();
    assert_eq!(back, criteria);
}

#[test]
fn settings_round_trip_through_json() {
    let mut settings = GridSettings::default();
    settings.set_label("Orders");
    settings.sorting = vec![SortingCriteria {
        column_id: "price".to_string(),
        ascending: true,
    }];
    settings
        .filters
        .insert("priceFilter".to_string(), price_above("10"));

    let json = serde_json::to_string(&settings).unwrap();
    let back: GridSettings = serde_json::from_str(&json).unwrap();

    assert_eq!(back, settings);
    assert_eq!(back.label(), "Orders");
}

#[test]
fn persisted_sort_state_survives_a_removed_column() {
    let columns = collection_with_filters();
    let manager = ColumnSortManager::new(Rc::clone(&columns), "name");

    // Persisted state written when a "quantity" column still existed.
    let persisted = vec![
        SortingCriteria {
            column_id: "quantity".to_string(),
            ascending: true,
        },
        SortingCriteria {
            column_id: "price".to_string(),
            ascending: false,
        },
    ];
    manager.set_sorting_criteria(&persisted);
    assert_eq!(
        manager.sorting_criteria(),
        vec![SortingCriteria {
            column_id: "price".to_string(),
            ascending: false
        }]
    );
}

// ============================================================================
// Cross-thread label mirror
// ============================================================================

#[test]
fn shared_label_reads_from_another_thread() {
    let mut settings = GridSettings::default();
    settings.set_label("Orders");
    let shared = settings.shared_label();

    let handle = std::thread::spawn(move || shared.get().to_string());
    assert_eq!(handle.join().unwrap(), "Orders");
}

#[test]
fn mirror_follows_every_label_change() {
    let mut settings = GridSettings::default();
    let shared = settings.shared_label();
    assert_eq!(&*shared.get(), "");

    settings.set_label("Orders");
    assert_eq!(&*shared.get(), "Orders");

    settings.set_label("Trades");
    assert_eq!(&*shared.get(), "Trades");
}

#[test]
fn publish_summary_refreshes_the_mirror_after_deserializing() {
    let mut settings = GridSettings::default();
    settings.set_label("Orders");
    let json = serde_json::to_string(&settings).unwrap();

    let restored: GridSettings = serde_json::from_str(&json).unwrap();
    restored.publish_summary();
    assert_eq!(&*restored.shared_label().get(), "Orders");
}

#[test]
fn standalone_shared_label() {
    let label = SharedLabel::new("a");
    label.set("b");
    assert_eq!(&*label.get(), "b");
}
