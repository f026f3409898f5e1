use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::validation::validate_size;
use crate::core::{GroupId, Item, PackInterval, PackOverride, pack_rows};
use crate::error::{Bounds, TimelineError, TimelineResult};

use super::VirtualizationIndex;

const PACKED_RANGE_EPSILON: f64 = 1e-9;

/// One packed item: its slot in the item list and the extent it was packed
/// with (the provisional extent for an item being changed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackedEntry {
    pub item_index: usize,
    pub start: f64,
    pub end: f64,
}

impl PackedEntry {
    #[must_use]
    fn from_item(item_index: usize, item: &Item) -> Self {
        Self {
            item_index,
            start: item.start_time,
            end: item.end_time,
        }
    }
}

impl PackInterval for PackedEntry {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Packed rows of one group. Always holds at least one (possibly empty) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLayout {
    rows: Vec<Vec<PackedEntry>>,
}

impl GroupLayout {
    #[must_use]
    fn from_rows(mut rows: Vec<Vec<PackedEntry>>) -> Self {
        if rows.is_empty() {
            rows.push(Vec::new());
        }
        Self { rows }
    }

    #[must_use]
    fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn line(&self, line: usize) -> &[PackedEntry] {
        self.rows.get(line).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<PackedEntry>] {
        &self.rows
    }
}

/// Row layouts and the group position prefix sum.
///
/// `positions[i]` is the top of group `i`; the vector always holds at least
/// the entry for group 0 and grows on demand.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct LayoutCache {
    pub(super) layouts: Vec<Option<GroupLayout>>,
    pub(super) positions: Vec<f64>,
    pub(super) packed_range: Option<(f64, f64)>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self {
            layouts: Vec::new(),
            positions: vec![0.0],
            packed_range: None,
        }
    }
}

impl LayoutCache {
    /// Drops everything and sizes the layout slots for `groups_len` groups.
    pub(super) fn reset(&mut self, groups_len: usize) {
        self.layouts.clear();
        self.layouts.resize_with(groups_len, || None);
        self.positions.truncate(1);
        self.packed_range = None;
    }

    pub(super) fn invalidate_layouts(&mut self) {
        self.layouts.iter_mut().for_each(|layout| *layout = None);
        self.positions.truncate(1);
    }

    /// Drops one group's rows and every position after it.
    pub(super) fn invalidate_group(&mut self, slot: usize) {
        if let Some(layout) = self.layouts.get_mut(slot) {
            *layout = None;
        }
        self.truncate_positions(slot + 1);
    }

    pub(super) fn truncate_positions(&mut self, len: usize) {
        self.positions.truncate(len.max(1));
    }

    #[must_use]
    pub(super) fn cached_positions(&self) -> usize {
        self.positions.len()
    }
}

impl VirtualizationIndex {
    /// Top of group `group_index` in content pixels.
    ///
    /// `group_index == groups_len()` yields the total content height.
    pub fn group_position(&mut self, group_index: usize) -> TimelineResult<f64> {
        let groups_len = self.core.model.groups.len();
        if group_index > groups_len {
            return Err(group_index_error(group_index, groups_len));
        }
        Ok(self.position_at(group_index))
    }

    pub fn group_size(&mut self, group_index: usize) -> TimelineResult<f64> {
        self.check_group_index(group_index)?;
        Ok(self.group_size_at(group_index))
    }

    pub fn group_line_count(&mut self, group_index: usize) -> TimelineResult<usize> {
        self.check_group_index(group_index)?;
        Ok(self.group_layout_at(group_index).line_count())
    }

    pub fn line_size(&self, group_index: usize) -> TimelineResult<f64> {
        self.check_group_index(group_index)?;
        Ok(self.line_size_at(group_index))
    }

    /// Top of one line in content pixels.
    pub fn line_position(&mut self, group_index: usize, line_index: usize) -> TimelineResult<f64> {
        let line_count = self.group_line_count(group_index)?;
        if line_index >= line_count {
            return Err(TimelineError::PositionRange {
                name: "line_index".to_owned(),
                value: line_index as f64,
                bounds: Bounds::inclusive(0.0, line_count.saturating_sub(1) as f64),
            });
        }
        Ok(self.position_at(group_index) + line_index as f64 * self.line_size_at(group_index))
    }

    pub fn group_layout(&mut self, group_index: usize) -> TimelineResult<&GroupLayout> {
        self.check_group_index(group_index)?;
        Ok(self.group_layout_at(group_index))
    }

    /// Item at position `item_index` of a packed line, with provisional
    /// times while it is being dragged or resized.
    pub fn line_item(
        &mut self,
        group_index: usize,
        line_index: usize,
        item_index: usize,
    ) -> TimelineResult<Option<Item>> {
        self.check_group_index(group_index)?;
        let entry = self
            .group_layout_at(group_index)
            .line(line_index)
            .get(item_index)
            .copied();
        Ok(entry.and_then(|entry| self.resolve_entry(entry)))
    }

    /// Horizontal scroll-content pixel span of `item` as `(x, width)`.
    #[must_use]
    pub fn item_position(&self, item: &Item) -> (f64, f64) {
        let axis = &self.core.horizontal;
        let x = axis.get_pos(item.start_time);
        (x, axis.get_pos(item.end_time) - x)
    }

    /// Total content height; also widens or shrinks the vertical extrema to
    /// match it.
    pub fn content_size(&mut self) -> f64 {
        let total = self.position_at(self.core.model.groups.len());
        if let Err(err) = self.sync_vertical_extrema() {
            warn!(error = %err, "skipping vertical extrema sync");
        }
        total
    }

    /// Overrides one group's line size. Positions after it are recomputed.
    pub fn set_group_line_size(
        &mut self,
        group_id: GroupId,
        line_size: Option<f64>,
    ) -> TimelineResult<()> {
        if let Some(size) = line_size {
            validate_size("line_size", size, Bounds::non_negative())?;
        }
        let slot = self
            .core
            .model
            .group_slots
            .get(&group_id)
            .copied()
            .ok_or(TimelineError::UnknownGroup(group_id.raw()))?;
        if self.core.model.groups[slot].line_size == line_size {
            return Ok(());
        }
        self.core.model.groups[slot].line_size = line_size;
        self.core.layout.truncate_positions(slot + 1);
        self.emit_render_request();
        Ok(())
    }

    pub(super) fn check_group_index(&self, group_index: usize) -> TimelineResult<()> {
        let groups_len = self.core.model.groups.len();
        if group_index >= groups_len {
            return Err(group_index_error(group_index, groups_len.saturating_sub(1)));
        }
        Ok(())
    }

    pub(super) fn line_size_at(&self, slot: usize) -> f64 {
        self.core.model.groups[slot]
            .line_size
            .unwrap_or(self.core.config.default_line_size)
    }

    pub(super) fn group_size_at(&mut self, slot: usize) -> f64 {
        self.group_layout_at(slot).line_count() as f64 * self.line_size_at(slot)
    }

    /// Extends the prefix sum from the last cached index up to `slot`.
    pub(super) fn position_at(&mut self, slot: usize) -> f64 {
        let slot = slot.min(self.core.model.groups.len());
        while self.core.layout.positions.len() <= slot {
            let last = self.core.layout.positions.len() - 1;
            let next = self.core.layout.positions[last] + self.group_size_at(last);
            self.core.layout.positions.push(next);
        }
        self.core.layout.positions[slot]
    }

    /// Index of the group whose band contains `pos`, clamped to the first and
    /// last group.
    pub(super) fn group_slot_at_pos(&mut self, pos: f64) -> Option<usize> {
        let groups_len = self.core.model.groups.len();
        if groups_len == 0 {
            return None;
        }
        self.extend_positions_past(pos, |top, target| top <= target);
        let above = self
            .core
            .layout
            .positions
            .partition_point(|&top| top <= pos);
        Some(above.saturating_sub(1).min(groups_len - 1))
    }

    /// Grows the prefix sum until its last entry fails `keep_going` or every
    /// group is cached.
    pub(super) fn extend_positions_past(&mut self, target: f64, keep_going: fn(f64, f64) -> bool) {
        let groups_len = self.core.model.groups.len();
        loop {
            let cached = self.core.layout.positions.len();
            let last = self.core.layout.positions[cached - 1];
            if cached > groups_len || !keep_going(last, target) {
                break;
            }
            self.position_at(cached);
        }
    }

    pub(super) fn group_layout_at(&mut self, slot: usize) -> &GroupLayout {
        let fresh = if self.core.layout.layouts[slot].is_none() {
            let range = self.ensure_packed_range();
            Some(self.pack_group(slot, range))
        } else {
            None
        };
        let entry = &mut self.core.layout.layouts[slot];
        if let Some(fresh) = fresh {
            *entry = Some(fresh);
        }
        entry.get_or_insert_with(GroupLayout::empty)
    }

    pub(super) fn resolve_entry(&self, entry: PackedEntry) -> Option<Item> {
        match self.core.interaction.change {
            Some(state) if state.item_index() == entry.item_index => Some(state.provisional()),
            _ => self.core.model.items.get(entry.item_index).copied(),
        }
    }

    /// Horizontal window widened by the overdraw ratio on each side.
    pub(super) fn overdrawn_time_window(&self) -> (f64, f64) {
        self.widened_time_window(self.core.config.horizontal_overdraw_ratio)
    }

    /// Range rows are packed for: twice the overdraw on each side, so pans
    /// within one overdraw margin reuse the cached rows.
    fn packing_time_window(&self) -> (f64, f64) {
        self.widened_time_window(2.0 * self.core.config.horizontal_overdraw_ratio)
    }

    fn widened_time_window(&self, ratio: f64) -> (f64, f64) {
        let axis = &self.core.horizontal;
        let margin = axis.window_range() * ratio;
        (axis.window_min() - margin, axis.window_max() + margin)
    }

    fn ensure_packed_range(&mut self) -> (f64, f64) {
        match self.core.layout.packed_range {
            Some(range) => range,
            None => {
                let range = self.packing_time_window();
                self.core.layout.packed_range = Some(range);
                range
            }
        }
    }

    /// Keeps cached rows while the overdrawn window stays inside the packed
    /// range at the same zoom; otherwise drops every layout.
    pub(super) fn refresh_packed_range(&mut self) {
        let Some((packed_min, packed_max)) = self.core.layout.packed_range else {
            return;
        };
        let (visible_min, visible_max) = self.overdrawn_time_window();
        let (wanted_min, wanted_max) = self.packing_time_window();
        let inside = visible_min >= packed_min && visible_max <= packed_max;
        let packed_width = packed_max - packed_min;
        let same_zoom = ((wanted_max - wanted_min) - packed_width).abs()
            <= PACKED_RANGE_EPSILON * packed_width.abs().max(1.0);
        if inside && same_zoom {
            return;
        }
        trace!(
            packed_min,
            packed_max,
            wanted_min,
            wanted_max,
            "repacking group rows for new time window"
        );
        self.core.layout.packed_range = None;
        self.core.layout.invalidate_layouts();
    }

    pub(super) fn invalidate_group_id(&mut self, group_id: GroupId) {
        if let Some(slot) = self.core.model.group_slots.get(&group_id).copied() {
            self.core.layout.invalidate_group(slot);
        }
    }

    fn pack_group(&self, slot: usize, (window_min, window_max): (f64, f64)) -> GroupLayout {
        let group_id = self.core.model.groups[slot].id;
        let items = &self.core.model.items;
        let entries = self
            .core
            .model
            .group_index
            .items_in(group_id)
            .iter()
            .filter_map(|&index| {
                items
                    .get(index)
                    .map(|item| PackedEntry::from_item(index, item))
            });
        let pack_override = self.core.interaction.change.map(|state| {
            let original = state.original();
            let provisional = state.provisional();
            PackOverride {
                exclude: (original.group_id == group_id)
                    .then(|| PackedEntry::from_item(state.item_index(), &original)),
                include: (provisional.group_id == group_id)
                    .then(|| PackedEntry::from_item(state.item_index(), &provisional)),
            }
        });
        GroupLayout::from_rows(pack_rows(entries, window_min, window_max, pack_override))
    }
}

fn group_index_error(group_index: usize, max_index: usize) -> TimelineError {
    TimelineError::PositionRange {
        name: "group_index".to_owned(),
        value: group_index as f64,
        bounds: Bounds::inclusive(0.0, max_index as f64),
    }
}
