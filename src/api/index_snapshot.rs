use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::AxisState;
use crate::error::{TimelineError, TimelineResult};
use crate::interaction::{InteractionMode, ItemChange};

use super::VirtualizationIndex;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub horizontal: AxisState,
    pub vertical: AxisState,
    pub groups_len: usize,
    pub items_len: usize,
    pub group_index_ready: bool,
    pub rebuild_generation: u64,
    /// Item count per group id, in first-seen order.
    pub group_item_counts: IndexMap<u64, usize>,
    pub packed_time_range: Option<(f64, f64)>,
    pub cached_positions: usize,
    pub visible_groups: (usize, usize),
    pub interaction_mode: InteractionMode,
    pub item_change: Option<ItemChange>,
}

impl IndexSnapshot {
    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::Serialization(format!("failed to serialize index snapshot: {e}"))
        })
    }
}

impl VirtualizationIndex {
    /// Captures the index state. Resolves the visible group range first, so
    /// the position cache may grow.
    pub fn snapshot(&mut self) -> IndexSnapshot {
        let visible = self.visible_groups();
        IndexSnapshot {
            horizontal: self.core.horizontal.state(),
            vertical: self.core.vertical.state(),
            groups_len: self.core.model.groups.len(),
            items_len: self.core.model.items.len(),
            group_index_ready: self.core.model.group_index_ready,
            rebuild_generation: self.core.runtime.rebuild_generation,
            group_item_counts: self
                .core
                .model
                .group_index
                .group_item_counts()
                .map(|(group_id, count)| (group_id.raw(), count))
                .collect(),
            packed_time_range: self.core.layout.packed_range,
            cached_positions: self.core.layout.cached_positions(),
            visible_groups: (visible.start, visible.end),
            interaction_mode: self.interaction_mode(),
            item_change: self
                .core
                .interaction
                .change
                .map(|state| state.into_change()),
        }
    }

    pub fn snapshot_json_pretty(&mut self) -> TimelineResult<String> {
        self.snapshot().to_json_pretty()
    }
}
