pub mod axis;
pub mod bars;
pub mod row_packing;
pub(crate) mod row_slot_tree;
pub mod types;
pub mod validation;

pub use axis::{
    Axis, AxisChange, AxisChanges, AxisConfig, AxisState, DEFAULT_MAX_ELEMENT_SIZE,
    DEFAULT_RESYNC_THRESHOLD_SIZE,
};
pub use bars::{
    BarAllocator, BarConstraints, BarResizeContext, BarResizeStrategy, BarSide, BarSizes,
    BarState, ResizeStrategyKind, SideResize, SideResizeStrategy, SideResizeStrategyKind,
    clamp_max_wins, fit_bars,
};
pub use row_packing::{PackInterval, PackOverride, pack_items, pack_rows, pack_rows_reference};
pub use types::{AxisKind, Group, GroupId, Item, ItemId, TimeRange};
