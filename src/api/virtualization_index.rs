use tracing::debug;

use crate::core::Axis;
use crate::error::TimelineResult;

use super::TimelineConfig;
use super::index_core::{IndexCore, IndexInteraction, IndexModel, IndexRuntime};
use super::layout_cache::LayoutCache;

/// Main orchestration facade consumed by host applications.
///
/// `VirtualizationIndex` owns groups and items, both axes, the group index,
/// packed row layouts, the group position cache, the drag/resize state
/// machine and registered observers. Geometry queries extend caches lazily,
/// which is why most of them take `&mut self`.
pub struct VirtualizationIndex {
    pub(super) core: IndexCore,
}

impl VirtualizationIndex {
    pub fn new(config: TimelineConfig) -> TimelineResult<Self> {
        config.validate()?;
        let horizontal = Axis::new(config.horizontal_axis_config())?;
        let vertical = Axis::new(config.vertical_axis_config())?;
        debug!(
            window_min = horizontal.window_min(),
            window_max = horizontal.window_max(),
            horizontal_window_size = config.horizontal_window_size,
            vertical_window_size = config.vertical_window_size,
            "virtualization index created"
        );

        Ok(Self {
            core: IndexCore {
                config,
                horizontal,
                vertical,
                model: IndexModel::default(),
                layout: LayoutCache::default(),
                interaction: IndexInteraction::default(),
                runtime: IndexRuntime::default(),
            },
        })
    }

    #[must_use]
    pub fn config(&self) -> TimelineConfig {
        self.core.config
    }

    #[must_use]
    pub fn time_snap(&self) -> Option<f64> {
        self.core.config.time_snap
    }

    /// Snaps dragged and resized times to multiples of `snap`, or disables
    /// snapping with `None`.
    pub fn set_time_snap(&mut self, snap: Option<f64>) -> TimelineResult<()> {
        TimelineConfig {
            time_snap: snap,
            ..self.core.config
        }
        .validate()?;
        self.core.config.time_snap = snap;
        Ok(())
    }

    pub fn set_horizontal_overdraw_ratio(&mut self, ratio: f64) -> TimelineResult<()> {
        TimelineConfig {
            horizontal_overdraw_ratio: ratio,
            ..self.core.config
        }
        .validate()?;
        self.core.config.horizontal_overdraw_ratio = ratio;
        self.refresh_packed_range();
        self.emit_render_request();
        Ok(())
    }

    pub fn set_vertical_overdraw_px(&mut self, overdraw_px: f64) -> TimelineResult<()> {
        TimelineConfig {
            vertical_overdraw_px: overdraw_px,
            ..self.core.config
        }
        .validate()?;
        self.core.config.vertical_overdraw_px = overdraw_px;
        self.emit_render_request();
        Ok(())
    }

    /// Line size for groups without their own; every cached position is
    /// recomputed.
    pub fn set_default_line_size(&mut self, line_size: f64) -> TimelineResult<()> {
        TimelineConfig {
            default_line_size: line_size,
            ..self.core.config
        }
        .validate()?;
        self.core.config.default_line_size = line_size;
        self.core.layout.truncate_positions(1);
        self.emit_render_request();
        Ok(())
    }

    pub fn set_index_chunk_size(&mut self, chunk_size: usize) -> TimelineResult<()> {
        TimelineConfig {
            index_chunk_size: chunk_size,
            ..self.core.config
        }
        .validate()?;
        self.core.config.index_chunk_size = chunk_size;
        Ok(())
    }
}
