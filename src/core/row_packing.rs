//! Greedy interval partitioning of items into non-overlapping rows.
//!
//! Items are placed in start order into the lowest-indexed row whose last
//! item ends at or before the new item's start. The number of rows produced
//! equals the maximum number of items overlapping at any instant.

use crate::core::row_slot_tree::RowSlotTree;
use crate::core::{Item, TimeRange};

/// Anything with a half-open `[start, end)` extent.
pub trait PackInterval {
    fn start(&self) -> f64;
    fn end(&self) -> f64;
}

impl PackInterval for Item {
    fn start(&self) -> f64 {
        self.start_time
    }

    fn end(&self) -> f64 {
        self.end_time
    }
}

impl PackInterval for TimeRange {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Swaps one committed entry for a provisional one while filtering.
///
/// Used during interactive drags so the committed dataset is never touched.
/// `include` is only packed when it overlaps the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackOverride<T> {
    pub exclude: Option<T>,
    pub include: Option<T>,
}

fn filter_and_sort<T, I>(
    items: I,
    window_min: f64,
    window_max: f64,
    pack_override: Option<PackOverride<T>>,
) -> Vec<T>
where
    T: PackInterval + Copy + PartialEq,
    I: IntoIterator<Item = T>,
{
    let overlaps = |item: &T| item.start() < window_max && item.end() > window_min;
    let exclude = pack_override.and_then(|value| value.exclude);
    let include = pack_override.and_then(|value| value.include);

    let mut filtered: Vec<T> = items
        .into_iter()
        .filter(|item| overlaps(item) && exclude.is_none_or(|excluded| excluded != *item))
        .collect();
    if let Some(include) = include.filter(overlaps) {
        filtered.push(include);
    }
    // Stable: equal starts keep input order.
    filtered.sort_by(|left, right| left.start().total_cmp(&right.start()));
    filtered
}

/// Packs the items overlapping `[window_min, window_max)` into rows.
///
/// Runs in `O(n log n)`: the free-row lookup is a segment tree descent.
#[must_use]
pub fn pack_rows<T, I>(
    items: I,
    window_min: f64,
    window_max: f64,
    pack_override: Option<PackOverride<T>>,
) -> Vec<Vec<T>>
where
    T: PackInterval + Copy + PartialEq,
    I: IntoIterator<Item = T>,
{
    let sorted = filter_and_sort(items, window_min, window_max, pack_override);
    let mut rows: Vec<Vec<T>> = Vec::new();
    let mut slots = RowSlotTree::with_capacity(16);

    for item in sorted {
        match slots.leftmost_free(item.start()) {
            Some(row) => {
                rows[row].push(item);
                slots.set(row, item.end());
            }
            None => {
                slots.open(item.end());
                rows.push(vec![item]);
                debug_assert_eq!(slots.len(), rows.len());
            }
        }
    }
    rows
}

/// Linear-scan packer with the same placement policy as [`pack_rows`].
///
/// `O(n * rows)`; kept as the behavioral reference.
#[must_use]
pub fn pack_rows_reference<T, I>(
    items: I,
    window_min: f64,
    window_max: f64,
    pack_override: Option<PackOverride<T>>,
) -> Vec<Vec<T>>
where
    T: PackInterval + Copy + PartialEq,
    I: IntoIterator<Item = T>,
{
    let sorted = filter_and_sort(items, window_min, window_max, pack_override);
    let mut rows: Vec<Vec<T>> = Vec::new();

    for item in sorted {
        let free = rows.iter().position(|row| {
            row.last()
                .is_some_and(|last: &T| last.end() <= item.start())
        });
        match free {
            Some(row) => rows[row].push(item),
            None => rows.push(vec![item]),
        }
    }
    rows
}

/// Packs full items, optionally replacing `original` with `replacement`.
#[must_use]
pub fn pack_items(
    items: &[Item],
    window_min: f64,
    window_max: f64,
    dragged: Option<(&Item, &Item)>,
) -> Vec<Vec<Item>> {
    let pack_override = dragged.map(|(original, replacement)| PackOverride {
        exclude: Some(*original),
        include: Some(*replacement),
    });
    pack_rows(items.iter().copied(), window_min, window_max, pack_override)
}

#[cfg(test)]
mod tests {
    use super::{PackOverride, pack_rows, pack_rows_reference};
    use crate::core::TimeRange;

    fn ranges(pairs: &[(f64, f64)]) -> Vec<TimeRange> {
        pairs
            .iter()
            .map(|&(start, end)| TimeRange::new(start, end))
            .collect()
    }

    #[test]
    fn adjacent_intervals_share_a_row() {
        let rows = pack_rows(ranges(&[(0.0, 5.0), (5.0, 10.0)]), 0.0, 10.0, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn window_filter_is_half_open() {
        let items = ranges(&[(0.0, 5.0), (10.0, 15.0), (4.0, 11.0)]);
        let rows = pack_rows(items, 5.0, 10.0, None);
        assert_eq!(rows, vec![ranges(&[(4.0, 11.0)])]);
    }

    #[test]
    fn override_swaps_excluded_entry() {
        let items = ranges(&[(0.0, 10.0), (20.0, 30.0)]);
        let pack_override = PackOverride {
            exclude: Some(TimeRange::new(20.0, 30.0)),
            include: Some(TimeRange::new(5.0, 15.0)),
        };
        let rows = pack_rows(items.clone(), 0.0, 40.0, Some(pack_override));
        assert_eq!(
            rows,
            vec![ranges(&[(0.0, 10.0)]), ranges(&[(5.0, 15.0)])]
        );
        assert_eq!(
            rows,
            pack_rows_reference(items, 0.0, 40.0, Some(pack_override))
        );
    }

    #[test]
    fn override_outside_window_is_dropped() {
        let items = ranges(&[(0.0, 10.0)]);
        let pack_override = PackOverride {
            exclude: Some(TimeRange::new(0.0, 10.0)),
            include: Some(TimeRange::new(100.0, 110.0)),
        };
        assert!(pack_rows(items, 0.0, 50.0, Some(pack_override)).is_empty());
    }

    #[test]
    fn optimized_matches_reference_on_dense_input() {
        let items: Vec<TimeRange> = (0..500)
            .map(|i| {
                let start = ((i * 37) % 211) as f64;
                TimeRange::new(start, start + ((i * 13) % 29 + 1) as f64)
            })
            .collect();
        assert_eq!(
            pack_rows(items.clone(), 0.0, 300.0, None),
            pack_rows_reference(items, 0.0, 300.0, None)
        );
    }
}
