use timeline_rs::core::{
    GroupId, Item, ItemId, PackOverride, TimeRange, pack_items, pack_rows, pack_rows_reference,
};

fn ranges(pairs: &[(f64, f64)]) -> Vec<TimeRange> {
    pairs
        .iter()
        .map(|&(start, end)| TimeRange::new(start, end))
        .collect()
}

#[test]
fn earliest_free_row_packing_matches_reference_layout() {
    let items = ranges(&[(0.0, 10.0), (5.0, 15.0), (12.0, 20.0)]);

    let rows = pack_rows(items.clone(), 0.0, 20.0, None);

    assert_eq!(
        rows,
        vec![
            ranges(&[(0.0, 10.0), (12.0, 20.0)]),
            ranges(&[(5.0, 15.0)]),
        ]
    );
    assert_eq!(rows, pack_rows_reference(items, 0.0, 20.0, None));
}

#[test]
fn empty_input_packs_to_no_rows() {
    assert!(pack_rows(Vec::<TimeRange>::new(), 0.0, 100.0, None).is_empty());
    assert!(pack_rows_reference(Vec::<TimeRange>::new(), 0.0, 100.0, None).is_empty());
}

#[test]
fn touching_intervals_share_a_row() {
    let rows = pack_rows(ranges(&[(0.0, 10.0), (10.0, 20.0), (20.0, 30.0)]), 0.0, 30.0, None);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 3);
}

#[test]
fn items_outside_the_window_are_dropped() {
    let rows = pack_rows(
        ranges(&[(-20.0, -10.0), (-5.0, 0.0), (0.0, 5.0), (50.0, 60.0), (100.0, 110.0)]),
        0.0,
        100.0,
        None,
    );
    assert_eq!(rows, vec![ranges(&[(0.0, 5.0), (50.0, 60.0)])]);
}

#[test]
fn unsorted_input_is_packed_in_start_order() {
    let rows = pack_rows(ranges(&[(12.0, 20.0), (5.0, 15.0), (0.0, 10.0)]), 0.0, 20.0, None);
    assert_eq!(rows[0], ranges(&[(0.0, 10.0), (12.0, 20.0)]));
    assert_eq!(rows[1], ranges(&[(5.0, 15.0)]));
}

#[test]
fn override_swaps_the_original_for_its_replacement() {
    let items = ranges(&[(0.0, 10.0), (5.0, 15.0)]);
    let pack_override = PackOverride {
        exclude: Some(TimeRange::new(5.0, 15.0)),
        include: Some(TimeRange::new(10.0, 20.0)),
    };

    let rows = pack_rows(items.clone(), 0.0, 100.0, Some(pack_override));

    assert_eq!(rows, vec![ranges(&[(0.0, 10.0), (10.0, 20.0)])]);
    assert_eq!(items.len(), 2, "committed input is untouched");
}

#[test]
fn override_replacement_outside_the_window_is_not_packed() {
    let pack_override = PackOverride {
        exclude: Some(TimeRange::new(5.0, 15.0)),
        include: Some(TimeRange::new(500.0, 510.0)),
    };
    let rows = pack_rows(
        ranges(&[(0.0, 10.0), (5.0, 15.0)]),
        0.0,
        100.0,
        Some(pack_override),
    );
    assert_eq!(rows, vec![ranges(&[(0.0, 10.0)])]);
}

#[test]
fn row_count_grows_past_the_initial_slot_capacity() {
    let nested: Vec<TimeRange> = (0..40)
        .map(|i| TimeRange::new(f64::from(i), 100.0))
        .collect();
    let rows = pack_rows(nested.clone(), 0.0, 100.0, None);
    assert_eq!(rows.len(), 40);
    assert_eq!(rows, pack_rows_reference(nested, 0.0, 100.0, None));
}

#[test]
fn pack_items_replaces_the_dragged_item() {
    let group = GroupId::new(1);
    let first = Item::new(ItemId::new(1), group, 0.0, 10.0);
    let second = Item::new(ItemId::new(2), group, 5.0, 15.0);
    let moved = second.with_range(TimeRange::new(20.0, 30.0));

    let rows = pack_items(&[first, second], 0.0, 100.0, Some((&second, &moved)));

    assert_eq!(rows, vec![vec![first, moved]]);
}
