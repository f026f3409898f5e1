use timeline_rs::core::{Group, GroupId, Item, ItemId};
use timeline_rs::{TimelineConfig, TimelineError, VirtualizationIndex};

fn config() -> TimelineConfig {
    TimelineConfig::new(0.0, 1_000.0)
        .with_window(0.0, 100.0)
        .with_viewport(1_000.0, 100.0)
        .with_default_line_size(10.0)
        .with_horizontal_overdraw_ratio(0.0)
        .with_vertical_overdraw_px(0.0)
}

fn groups(count: u64) -> Vec<Group> {
    (0..count).map(|id| Group::new(GroupId::new(id))).collect()
}

fn index_with(config: TimelineConfig, groups: Vec<Group>, items: Vec<Item>) -> VirtualizationIndex {
    let mut index = VirtualizationIndex::new(config).expect("valid config");
    index.set_groups(groups).expect("valid groups");
    index.set_items(items);
    index.rebuild_group_index_now();
    index
}

fn back_to_back_items(count: u64) -> Vec<Item> {
    (0..count)
        .map(|i| {
            let start = (i * 10) as f64;
            Item::new(ItemId::new(i), GroupId::new(0), start, start + 10.0)
        })
        .collect()
}

#[test]
fn visible_groups_follow_the_vertical_window() {
    let items = (0..20)
        .map(|id| Item::new(ItemId::new(id), GroupId::new(id), 10.0, 20.0))
        .collect();
    let mut index = index_with(config(), groups(20), items);

    assert_eq!(index.visible_groups(), 0..10);
    assert_eq!(index.content_size(), 200.0);

    index.set_vertical_window_start(50.0).expect("scroll down");
    assert_eq!(index.visible_groups(), 5..15);
    assert_eq!(index.visible_group_lines(5), 0..1);
    assert_eq!(index.visible_group_lines(19), 0..0);
}

#[test]
fn overlapping_items_stack_into_lines() {
    let items = vec![
        Item::new(ItemId::new(1), GroupId::new(0), 0.0, 10.0),
        Item::new(ItemId::new(2), GroupId::new(0), 5.0, 15.0),
        Item::new(ItemId::new(3), GroupId::new(0), 12.0, 20.0),
    ];
    let mut index = index_with(config(), groups(3), items);

    assert_eq!(index.group_line_count(0).expect("group 0"), 2);
    assert_eq!(index.group_size(0).expect("group 0"), 20.0);
    assert_eq!(index.group_position(1).expect("group 1"), 20.0);
    assert_eq!(index.line_position(0, 1).expect("line 1"), 10.0);

    let second_line = index.line_item(0, 1, 0).expect("line item");
    assert_eq!(second_line.map(|item| item.id), Some(ItemId::new(2)));
    assert_eq!(index.line_item(0, 1, 1).expect("past the line"), None);
}

#[test]
fn empty_groups_keep_one_line() {
    let mut index = index_with(config(), groups(2), Vec::new());
    assert_eq!(index.group_line_count(1).expect("group 1"), 1);
    assert_eq!(index.content_size(), 20.0);
}

#[test]
fn only_items_in_the_time_window_are_packed() {
    let mut index = index_with(config(), groups(1), back_to_back_items(100));
    index.set_time_window(200.0, 300.0).expect("window");

    assert_eq!(index.visible_line_items(0, 0), 0..10);
    let first = index.line_item(0, 0, 0).expect("line item");
    assert_eq!(first.map(|item| item.start_time), Some(200.0));
}

#[test]
fn layouts_survive_small_pans_inside_the_overdraw() {
    let mut index = index_with(
        config().with_horizontal_overdraw_ratio(0.5),
        groups(1),
        back_to_back_items(100),
    );
    index.set_time_window(200.0, 300.0).expect("window");

    assert_eq!(index.visible_line_items(0, 0), 5..25);
    let packed = index.snapshot().packed_time_range;
    assert_eq!(packed, Some((100.0, 400.0)));

    index.set_time_window(210.0, 310.0).expect("pan");
    assert_eq!(index.snapshot().packed_time_range, packed);
    assert_eq!(index.visible_line_items(0, 0), 6..26);
}

#[test]
fn visible_items_keep_the_trailing_overdraw_after_a_pan() {
    let mut index = index_with(
        config().with_horizontal_overdraw_ratio(0.5),
        groups(1),
        back_to_back_items(100),
    );
    index.set_time_window(200.0, 300.0).expect("window");
    assert_eq!(index.visible_line_items(0, 0), 5..25);

    index.set_time_window(250.0, 350.0).expect("pan to the packed edge");
    let visible = index.visible_line_items(0, 0);
    assert_eq!(visible, 10..30);
    let last = index.line_item(0, 0, visible.end - 1).expect("line item");
    assert_eq!(last.map(|item| item.start_time), Some(390.0));

    index.set_time_window(260.0, 360.0).expect("pan past the packed edge");
    assert_eq!(index.snapshot().packed_time_range, Some((160.0, 460.0)));
    let visible = index.visible_line_items(0, 0);
    assert_eq!(visible, 5..25);
    let first = index.line_item(0, 0, visible.start).expect("line item");
    let last = index.line_item(0, 0, visible.end - 1).expect("line item");
    assert_eq!(first.map(|item| item.start_time), Some(210.0));
    assert_eq!(last.map(|item| item.start_time), Some(400.0));
}

#[test]
fn zooming_repacks_rows() {
    let mut index = index_with(config(), groups(1), back_to_back_items(100));
    index.set_time_window(200.0, 300.0).expect("window");
    assert_eq!(index.visible_line_items(0, 0), 0..10);

    index.set_time_window(200.0, 250.0).expect("zoom in");
    assert_eq!(index.visible_line_items(0, 0), 0..5);
    assert_eq!(index.snapshot().packed_time_range, Some((200.0, 250.0)));
}

#[test]
fn item_position_uses_scroll_pixels() {
    let index = index_with(config(), groups(1), Vec::new());
    let item = Item::new(ItemId::new(1), GroupId::new(0), 200.0, 210.0);

    let (x, width) = index.item_position(&item);

    assert!((x - 2_000.0).abs() < 1e-9);
    assert!((width - 100.0).abs() < 1e-9);
}

#[test]
fn group_line_size_override_moves_later_groups() {
    let mut index = index_with(config(), groups(4), Vec::new());
    assert_eq!(index.group_position(3).expect("group 3"), 30.0);

    index
        .set_group_line_size(GroupId::new(1), Some(25.0))
        .expect("override");

    assert_eq!(index.line_size(1).expect("group 1"), 25.0);
    assert_eq!(index.group_position(1).expect("group 1"), 10.0);
    assert_eq!(index.group_position(3).expect("group 3"), 45.0);
    assert_eq!(index.group_position(4).expect("content end"), 55.0);

    assert!(matches!(
        index.set_group_line_size(GroupId::new(42), Some(5.0)),
        Err(TimelineError::UnknownGroup(42))
    ));
}

#[test]
fn default_line_size_change_recomputes_positions() {
    let mut index = index_with(config(), groups(3), Vec::new());
    assert_eq!(index.content_size(), 30.0);

    index.set_default_line_size(20.0).expect("line size");

    assert_eq!(index.content_size(), 60.0);
}

#[test]
fn out_of_range_group_queries_are_rejected() {
    let mut index = index_with(config(), groups(2), Vec::new());

    assert!(index.group_position(2).is_ok());
    assert!(matches!(
        index.group_position(3),
        Err(TimelineError::PositionRange { .. })
    ));
    assert!(matches!(
        index.group_size(2),
        Err(TimelineError::PositionRange { .. })
    ));
    assert!(matches!(
        index.line_position(0, 1),
        Err(TimelineError::PositionRange { .. })
    ));
    assert_eq!(index.visible_line_items(7, 0), 0..0);
    assert_eq!(index.visible_group_lines(7), 0..0);
}

#[test]
fn no_groups_means_nothing_visible() {
    let mut index = index_with(config(), Vec::new(), Vec::new());
    assert_eq!(index.visible_groups(), 0..0);
    assert_eq!(index.content_size(), 0.0);
}
