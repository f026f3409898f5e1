use std::collections::HashMap;

use crate::core::{Axis, Group, GroupId, Item};
use crate::extensions::TimelineObserver;
use crate::interaction::{DragValidator, ItemChangeState, ResizeValidator};

use super::TimelineConfig;
use super::group_index_rebuild::{GroupIndexRebuild, GroupItemIndex};
use super::layout_cache::LayoutCache;

/// Internal state behind the public facade (`VirtualizationIndex`).
pub(super) struct IndexCore {
    pub(super) config: TimelineConfig,
    pub(super) horizontal: Axis,
    pub(super) vertical: Axis,
    pub(super) model: IndexModel,
    pub(super) layout: LayoutCache,
    pub(super) interaction: IndexInteraction,
    pub(super) runtime: IndexRuntime,
}

/// Committed groups and items plus their derived lookups.
#[derive(Default)]
pub(super) struct IndexModel {
    pub(super) items: Vec<Item>,
    pub(super) groups: Vec<Group>,
    pub(super) group_slots: HashMap<GroupId, usize>,
    pub(super) group_index: GroupItemIndex,
    pub(super) group_index_ready: bool,
}

#[derive(Default)]
pub(super) struct IndexInteraction {
    pub(super) change: Option<ItemChangeState>,
    pub(super) drag_validator: Option<Box<dyn DragValidator>>,
    pub(super) resize_validator: Option<Box<dyn ResizeValidator>>,
}

#[derive(Default)]
pub(super) struct IndexRuntime {
    pub(super) observers: Vec<Box<dyn TimelineObserver>>,
    pub(super) rebuild: Option<GroupIndexRebuild>,
    pub(super) rebuild_generation: u64,
}
