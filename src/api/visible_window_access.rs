use std::ops::Range;

use super::VirtualizationIndex;

impl VirtualizationIndex {
    /// Vertical window widened by the vertical overdraw.
    #[must_use]
    pub fn overdrawn_content_window(&self) -> (f64, f64) {
        let axis = &self.core.vertical;
        let overdraw = self.core.config.vertical_overdraw_px;
        (axis.window_min() - overdraw, axis.window_max() + overdraw)
    }

    /// Group indices intersecting the vertical window plus overdraw.
    pub fn visible_groups(&mut self) -> Range<usize> {
        let groups_len = self.core.model.groups.len();
        if groups_len == 0 {
            return 0..0;
        }
        let (top, bottom) = self.overdrawn_content_window();

        self.extend_positions_past(top, |position, target| position <= target);
        let first = self.core.layout.positions[1..].partition_point(|&end| end <= top);

        self.extend_positions_past(bottom, |position, target| position < target);
        let last = self
            .core
            .layout
            .positions
            .partition_point(|&position| position < bottom)
            .min(groups_len);

        first..last.max(first)
    }

    /// Line indices of `group_index` intersecting the vertical window plus
    /// overdraw. Empty for an unknown group.
    pub fn visible_group_lines(&mut self, group_index: usize) -> Range<usize> {
        if group_index >= self.core.model.groups.len() {
            return 0..0;
        }
        let line_count = self.group_layout_at(group_index).line_count();
        let line_size = self.line_size_at(group_index);
        if line_size <= 0.0 {
            return 0..line_count;
        }
        let group_top = self.position_at(group_index);
        let (top, bottom) = self.overdrawn_content_window();
        let first = (((top - group_top) / line_size).floor().max(0.0) as usize).min(line_count);
        let last = (((bottom - group_top) / line_size).ceil().max(0.0) as usize).min(line_count);
        first..last.max(first)
    }

    /// Positions within one packed line of the items intersecting the time
    /// window plus overdraw. Empty for an unknown group or line.
    pub fn visible_line_items(&mut self, group_index: usize, line_index: usize) -> Range<usize> {
        if group_index >= self.core.model.groups.len() {
            return 0..0;
        }
        let (window_min, window_max) = self.overdrawn_time_window();
        let line = self.group_layout_at(group_index).line(line_index);
        let first = line.partition_point(|entry| entry.end <= window_min);
        let last = line.partition_point(|entry| entry.start < window_max);
        first..last.max(first)
    }
}
