//! Benchmarks for the per-frame hot paths: clip computation over a row of
//! columns and composite row comparison.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridcore::column::{Column, ColumnCollection};
use gridcore::layout::clip::compute_clip;
use gridcore::layout::geometry::Size;
use gridcore::sort::{ColumnComparer, ColumnSortManager};
use std::rc::Rc;
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Key {
    Id,
    Name,
    Price,
}

#[derive(Clone)]
struct Row {
    id: u32,
    name: String,
    price: f64,
}

fn comparers(key: &Key) -> Option<ColumnComparer<Row>> {
    let comparer: ColumnComparer<Row> = match key {
        Key::Id => Arc::new(|a: &Row, b: &Row| a.id.cmp(&b.id)),
        Key::Name => Arc::new(|a: &Row, b: &Row| a.name.cmp(&b.name)),
        Key::Price => Arc::new(|a: &Row, b: &Row| a.price.total_cmp(&b.price)),
    };
    Some(comparer)
}

fn bench_compute_clip(c: &mut Criterion) {
    // 64 columns, a quarter of them overflowing, first one scrolled under
    // the viewport edge.
    let columns: Vec<(f64, f64, f64, f64)> = (0..64)
        .map(|i| {
            let left = f64::from(i) * 80.0;
            let unclipped_left = if i == 0 { left - 30.0 } else { left };
            let content = if i % 4 == 0 { 120.0 } else { 60.0 };
            (content, left, unclipped_left, 80.0)
        })
        .collect();

    c.bench_function("compute_clip_row_of_64", |b| {
        b.iter(|| {
            let mut clipped = 0_u32;
            for &(content, left, unclipped_left, width) in &columns {
                if compute_clip(
                    black_box(Size::new(content, 16.0)),
                    20.0,
                    left,
                    unclipped_left,
                    width,
                )
                .is_some()
                {
                    clipped += 1;
                }
            }
            clipped
        });
    });
}

fn bench_composite_sort(c: &mut Criterion) {
    let columns: Rc<ColumnCollection<Key, Row>> = Rc::new(ColumnCollection::new());
    columns.insert(Column::new("id", Key::Id)).unwrap();
    let name = columns.insert(Column::new("name", Key::Name)).unwrap();
    let price = columns.insert(Column::new("price", Key::Price)).unwrap();

    let manager = ColumnSortManager::new(Rc::clone(&columns), "id");
    manager.on_column_click(&name, true);
    manager.on_column_click(&price, true);
    let comparator = manager.build_comparator(comparers);

    let rows: Vec<Row> = (0..10_000)
        .map(|i| Row {
            id: i,
            name: format!("item-{}", i % 100),
            price: f64::from(i % 37),
        })
        .collect();

    c.bench_function("composite_sort_10k_rows", |b| {
        b.iter(|| {
            let mut rows = rows.clone();
            rows.sort_by(|a, b| comparator.compare(a, b));
            rows.len()
        });
    });
}

criterion_group!(benches, bench_compute_clip, bench_composite_sort);
criterion_main!(benches);
