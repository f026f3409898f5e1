use smallvec::SmallVec;
use tracing::trace;

use crate::core::{Axis, AxisChange, AxisChanges, AxisKind, AxisState};
use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;

use super::VirtualizationIndex;
use super::timeline_config::vertical_window_range;

impl VirtualizationIndex {
    #[must_use]
    pub fn horizontal_axis(&self) -> &Axis {
        &self.core.horizontal
    }

    /// Vertical axis; values are content pixels.
    #[must_use]
    pub fn vertical_axis(&self) -> &Axis {
        &self.core.vertical
    }

    #[must_use]
    pub fn axis(&self, kind: AxisKind) -> &Axis {
        match kind {
            AxisKind::Horizontal => &self.core.horizontal,
            AxisKind::Vertical => &self.core.vertical,
        }
    }

    pub fn set_time_extrema(&mut self, min: f64, max: f64) -> TimelineResult<AxisChanges> {
        self.update_axis(AxisKind::Horizontal, |axis| axis.set_extrema(min, max))
    }

    pub fn set_time_window(
        &mut self,
        window_min: f64,
        window_max: f64,
    ) -> TimelineResult<AxisChanges> {
        self.update_axis(AxisKind::Horizontal, |axis| {
            axis.set_window_extrema(window_min, window_max)
        })
    }

    /// Shifts the time window by `delta` time units.
    pub fn pan_time_window(&mut self, delta: f64) -> TimelineResult<AxisChanges> {
        self.update_axis(AxisKind::Horizontal, |axis| axis.pan_window(delta))
    }

    /// Zooms the time window around `anchor`; `factor > 1.0` zooms in.
    pub fn zoom_time_window(&mut self, anchor: f64, factor: f64) -> TimelineResult<AxisChanges> {
        self.update_axis(AxisKind::Horizontal, |axis| axis.zoom_window(anchor, factor))
    }

    pub fn set_horizontal_window_size(&mut self, window_size: f64) -> TimelineResult<AxisChanges> {
        self.update_axis(AxisKind::Horizontal, |axis| axis.set_window_size(window_size))
    }

    pub fn set_horizontal_scroll_pos(&mut self, scroll_pos: f64) -> TimelineResult<AxisChanges> {
        self.update_axis(AxisKind::Horizontal, |axis| axis.set_scroll_pos(scroll_pos))
    }

    /// Resizes the viewport height. The vertical window keeps its top edge
    /// and spans exactly `window_size` content pixels.
    pub fn set_vertical_window_size(&mut self, window_size: f64) -> TimelineResult<AxisChanges> {
        let resized =
            self.update_axis(AxisKind::Vertical, |axis| axis.set_window_size(window_size))?;
        let synced = self.sync_vertical_extrema()?;
        let top = self.core.vertical.window_min();
        let range = vertical_window_range(window_size);
        let moved = self.update_axis(AxisKind::Vertical, |axis| {
            axis.set_window_extrema(top, top + range)
        })?;
        Ok(resized.union(synced).union(moved))
    }

    pub fn set_vertical_scroll_pos(&mut self, scroll_pos: f64) -> TimelineResult<AxisChanges> {
        let synced = self.sync_vertical_extrema()?;
        let scrolled =
            self.update_axis(AxisKind::Vertical, |axis| axis.set_scroll_pos(scroll_pos))?;
        Ok(synced.union(scrolled))
    }

    /// Scrolls so the vertical window starts at content pixel `top`.
    pub fn set_vertical_window_start(&mut self, top: f64) -> TimelineResult<AxisChanges> {
        let synced = self.sync_vertical_extrema()?;
        let range = self.core.vertical.window_range();
        let moved = self.update_axis(AxisKind::Vertical, |axis| {
            axis.set_window_extrema(top, top + range)
        })?;
        Ok(synced.union(moved))
    }

    /// Applies a new element size ceiling to both axes.
    pub fn set_max_element_size(&mut self, max_element_size: f64) -> TimelineResult<AxisChanges> {
        let horizontal = self.update_axis(AxisKind::Horizontal, |axis| {
            axis.set_max_element_size(max_element_size)
        })?;
        let vertical = self.update_axis(AxisKind::Vertical, |axis| {
            axis.set_max_element_size(max_element_size)
        })?;
        self.core.config.max_element_size = max_element_size;
        Ok(horizontal.union(vertical))
    }

    /// Applies a new resync threshold to both axes.
    pub fn set_resync_threshold_size(
        &mut self,
        resync_threshold_size: f64,
    ) -> TimelineResult<AxisChanges> {
        let horizontal = self.update_axis(AxisKind::Horizontal, |axis| {
            axis.set_resync_threshold_size(resync_threshold_size)
        })?;
        let vertical = self.update_axis(AxisKind::Vertical, |axis| {
            axis.set_resync_threshold_size(resync_threshold_size)
        })?;
        self.core.config.resync_threshold_size = resync_threshold_size;
        Ok(horizontal.union(vertical))
    }

    /// Keeps the vertical extrema at `[0, max(content height, window)]`.
    pub(super) fn sync_vertical_extrema(&mut self) -> TimelineResult<AxisChanges> {
        let content = self.position_at(self.core.model.groups.len());
        let window = vertical_window_range(self.core.vertical.window_size());
        let max = content.max(window);
        self.update_axis(AxisKind::Vertical, |axis| axis.set_extrema(0.0, max))
    }

    /// Runs one axis mutation, then emits the matching events and refreshes
    /// caches derived from that axis.
    pub(super) fn update_axis(
        &mut self,
        kind: AxisKind,
        mutate: impl FnOnce(&mut Axis) -> TimelineResult<AxisChanges>,
    ) -> TimelineResult<AxisChanges> {
        let axis = match kind {
            AxisKind::Horizontal => &mut self.core.horizontal,
            AxisKind::Vertical => &mut self.core.vertical,
        };
        let before = axis.state();
        let changes = mutate(axis)?;
        if changes.is_none() {
            return Ok(changes);
        }
        let after = axis.state();
        trace!(?kind, ?changes, "axis updated");

        if kind == AxisKind::Horizontal && changes.affects_layout() {
            self.refresh_packed_range();
        }
        for event in axis_events(kind, &before, &after, changes) {
            self.emit_event(event);
        }
        self.emit_render_request();
        Ok(changes)
    }
}

fn axis_events(
    axis: AxisKind,
    before: &AxisState,
    after: &AxisState,
    changes: AxisChanges,
) -> SmallVec<[TimelineEvent; 4]> {
    let mut events = SmallVec::new();
    if changes.contains(AxisChange::Window) {
        events.push(TimelineEvent::WindowChange {
            axis,
            previous: (before.window_min, before.window_max),
            current: (after.window_min, after.window_max),
        });
    }
    if changes.contains(AxisChange::WindowSize) {
        events.push(TimelineEvent::WindowSizeChange {
            axis,
            previous: before.window_size,
            current: after.window_size,
        });
    }
    if changes.contains(AxisChange::ScrollPos) && before.scroll_pos != after.scroll_pos {
        events.push(TimelineEvent::ScrollPosChange {
            axis,
            previous: before.scroll_pos,
            current: after.scroll_pos,
        });
    }
    if changes.contains(AxisChange::ScrollSize) && before.scroll_size != after.scroll_size {
        events.push(TimelineEvent::ScrollSizeChange {
            axis,
            previous: before.scroll_size,
            current: after.scroll_size,
        });
    }
    events
}
