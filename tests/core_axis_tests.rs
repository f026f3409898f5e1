use approx::assert_relative_eq;
use timeline_rs::TimelineError;
use timeline_rs::core::{Axis, AxisChange, AxisConfig};

fn million_axis() -> Axis {
    Axis::new(AxisConfig::new(0.0, 1_000_000.0).with_window_size(100.0)).expect("valid axis")
}

#[test]
fn window_maps_values_to_scroll_pixels() {
    let mut axis = million_axis();
    axis.set_window_extrema(0.0, 1_000.0).expect("set window");

    assert_relative_eq!(axis.get_pos(500.0), 50.0, epsilon = 1e-9);
    assert_relative_eq!(axis.pixel_per_unit(), 0.1, epsilon = 1e-9);
    assert_relative_eq!(axis.get_value(50.0), 500.0, epsilon = 1e-9);
}

#[test]
fn unchanged_window_reports_no_change() {
    let mut axis = million_axis();
    let first = axis.set_window_extrema(0.0, 1_000.0).expect("first");
    assert!(first.contains(AxisChange::Window));

    let before = axis.state();
    let second = axis.set_window_extrema(0.0, 1_000.0).expect("second");
    assert!(second.is_none());
    assert_eq!(axis.state(), before);
}

#[test]
fn invalid_window_is_rejected() {
    let mut axis = million_axis();
    assert!(matches!(
        axis.set_window_extrema(10.0, 10.0),
        Err(TimelineError::IntervalExtrema { .. })
    ));
    assert!(matches!(
        axis.set_window_extrema(f64::NAN, 10.0),
        Err(TimelineError::NotAPosition { .. })
    ));
    assert!(matches!(
        axis.set_window_size(-1.0),
        Err(TimelineError::SizeRange { .. })
    ));
}

#[test]
fn window_is_clamped_into_extrema_preserving_range() {
    let mut axis = million_axis();
    axis.set_window_extrema(-300.0, 700.0).expect("shift");
    assert_eq!((axis.window_min(), axis.window_max()), (0.0, 1_000.0));

    axis.set_window_extrema(999_500.0, 1_000_500.0).expect("shift past max");
    assert_eq!(
        (axis.window_min(), axis.window_max()),
        (999_000.0, 1_000_000.0)
    );

    axis.set_window_extrema(-10.0, 2_000_000.0).expect("wider than extrema");
    assert_eq!((axis.window_min(), axis.window_max()), (0.0, 1_000_000.0));
}

#[test]
fn long_ranges_materialize_a_bounded_region() {
    let axis = Axis::new(
        AxisConfig::new(0.0, 1_000_000_000.0)
            .with_window(500_000_000.0, 500_001_000.0)
            .with_window_size(1_000.0),
    )
    .expect("valid axis");

    // One pixel per unit; the full range would be 1e9 pixels.
    assert_eq!(axis.scroll_size(), 10_000_000.0);
    assert!(!axis.is_min_terminal());
    assert!(!axis.is_max_terminal());
    assert_eq!(axis.scroll_pos(), 4_999_500.0);
    assert_relative_eq!(axis.get_pos(axis.window_min()), axis.scroll_pos(), epsilon = 1e-9);
    assert_relative_eq!(axis.get_window_pos(500_000_500.0), 500.0, epsilon = 1e-9);
}

#[test]
fn region_touching_an_extremum_becomes_terminal() {
    let axis = Axis::new(
        AxisConfig::new(0.0, 1_000_000_000.0)
            .with_window(0.0, 1_000.0)
            .with_window_size(1_000.0),
    )
    .expect("valid axis");

    assert!(axis.is_min_terminal());
    assert!(!axis.is_max_terminal());
    assert_eq!(axis.scroll_origin(), 0.0);
    assert_eq!(axis.scroll_pos(), 0.0);
}

#[test]
fn small_shift_moves_scroll_pos_without_resync() {
    let mut axis = Axis::new(
        AxisConfig::new(0.0, 1_000_000_000.0)
            .with_window(500_000_000.0, 500_001_000.0)
            .with_window_size(1_000.0),
    )
    .expect("valid axis");
    let origin = axis.scroll_origin();

    let changes = axis
        .set_window_extrema(500_000_010.0, 500_001_010.0)
        .expect("shift");

    assert!(changes.contains(AxisChange::ScrollPos));
    assert!(!changes.contains(AxisChange::ScrollSize));
    assert_eq!(axis.scroll_origin(), origin);
    assert_eq!(axis.scroll_pos(), 4_999_510.0);
}

#[test]
fn approaching_a_non_terminal_edge_resyncs() {
    let mut axis = Axis::new(
        AxisConfig::new(0.0, 1_000_000_000.0)
            .with_window(500_000_000.0, 500_001_000.0)
            .with_window_size(1_000.0),
    )
    .expect("valid axis");
    let origin = axis.scroll_origin();

    // Within 1000px of the region's leading edge.
    axis.set_scroll_pos(500.0).expect("scroll");

    assert_ne!(axis.scroll_origin(), origin);
    assert_eq!(axis.scroll_pos(), 4_999_500.0);
    assert_relative_eq!(axis.window_min(), origin + 500.0, epsilon = 1e-9);
}

#[test]
fn scroll_pos_is_clamped_to_the_scroll_range() {
    let mut axis = million_axis();
    axis.set_window_extrema(0.0, 1_000.0).expect("window");

    axis.set_scroll_pos(-50.0).expect("below zero");
    assert_eq!(axis.scroll_pos(), 0.0);

    axis.set_scroll_pos(1.0e12).expect("beyond end");
    assert_eq!(axis.scroll_pos(), axis.scroll_size() - axis.window_size());
    assert_relative_eq!(axis.window_max(), 1_000_000.0, epsilon = 1e-9);
}

#[test]
fn window_size_change_keeps_the_value_range() {
    let mut axis = million_axis();
    axis.set_window_extrema(0.0, 1_000.0).expect("window");

    let changes = axis.set_window_size(200.0).expect("resize");

    assert!(changes.contains(AxisChange::WindowSize));
    assert!(changes.contains(AxisChange::Scale));
    assert_eq!((axis.window_min(), axis.window_max()), (0.0, 1_000.0));
    assert_relative_eq!(axis.get_pos(500.0), 100.0, epsilon = 1e-9);
}

#[test]
fn extrema_change_reclamps_the_window() {
    let mut axis = million_axis();
    axis.set_window_extrema(5_000.0, 6_000.0).expect("window");

    let changes = axis.set_extrema(0.0, 5_500.0).expect("shrink extrema");

    assert!(changes.contains(AxisChange::Extrema));
    assert!(changes.contains(AxisChange::Window));
    assert_eq!((axis.window_min(), axis.window_max()), (4_500.0, 5_500.0));
}

#[test]
fn zero_window_size_maps_everything_to_zero() {
    let axis = Axis::new(AxisConfig::new(0.0, 100.0)).expect("valid axis");
    assert_eq!(axis.pixel_per_unit(), 0.0);
    assert_eq!(axis.unit_per_pixel(), 0.0);
    assert_eq!(axis.scroll_size(), 0.0);
    assert_eq!(axis.get_pos(50.0), 0.0);
}

#[test]
fn pan_and_zoom_go_through_window_extrema() {
    let mut axis = million_axis();
    axis.set_window_extrema(1_000.0, 2_000.0).expect("window");

    axis.pan_window(500.0).expect("pan");
    assert_eq!((axis.window_min(), axis.window_max()), (1_500.0, 2_500.0));

    axis.zoom_window(2_000.0, 2.0).expect("zoom");
    assert_relative_eq!(axis.window_min(), 1_750.0, epsilon = 1e-9);
    assert_relative_eq!(axis.window_max(), 2_250.0, epsilon = 1e-9);

    assert!(matches!(
        axis.zoom_window(2_000.0, 0.0),
        Err(TimelineError::SizeRange { .. })
    ));
}
