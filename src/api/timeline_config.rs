use serde::{Deserialize, Serialize};

use crate::core::validation::{validate_interval, validate_size};
use crate::core::{AxisConfig, DEFAULT_MAX_ELEMENT_SIZE, DEFAULT_RESYNC_THRESHOLD_SIZE};
use crate::error::{Bounds, TimelineError, TimelineResult};

pub const DEFAULT_LINE_SIZE: f64 = 24.0;
pub const DEFAULT_HORIZONTAL_OVERDRAW_RATIO: f64 = 0.5;
pub const DEFAULT_VERTICAL_OVERDRAW_PX: f64 = 200.0;
pub const DEFAULT_INDEX_CHUNK_SIZE: usize = 50_000;

/// Public index bootstrap configuration.
///
/// Serializable so hosts can persist timeline setup next to their own
/// settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub time_min: f64,
    pub time_max: f64,
    pub window_min: f64,
    pub window_max: f64,
    /// Viewport width in pixels.
    pub horizontal_window_size: f64,
    /// Viewport height in pixels.
    pub vertical_window_size: f64,
    #[serde(default = "default_line_size")]
    pub default_line_size: f64,
    /// Rows are packed for the window widened by this fraction of its range
    /// on each side.
    #[serde(default = "default_horizontal_overdraw_ratio")]
    pub horizontal_overdraw_ratio: f64,
    #[serde(default = "default_vertical_overdraw_px")]
    pub vertical_overdraw_px: f64,
    #[serde(default)]
    pub time_snap: Option<f64>,
    #[serde(default = "default_index_chunk_size")]
    pub index_chunk_size: usize,
    #[serde(default = "default_max_element_size")]
    pub max_element_size: f64,
    #[serde(default = "default_resync_threshold_size")]
    pub resync_threshold_size: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            time_min: 0.0,
            time_max: 1.0,
            window_min: 0.0,
            window_max: 1.0,
            horizontal_window_size: 0.0,
            vertical_window_size: 0.0,
            default_line_size: DEFAULT_LINE_SIZE,
            horizontal_overdraw_ratio: DEFAULT_HORIZONTAL_OVERDRAW_RATIO,
            vertical_overdraw_px: DEFAULT_VERTICAL_OVERDRAW_PX,
            time_snap: None,
            index_chunk_size: DEFAULT_INDEX_CHUNK_SIZE,
            max_element_size: DEFAULT_MAX_ELEMENT_SIZE,
            resync_threshold_size: DEFAULT_RESYNC_THRESHOLD_SIZE,
        }
    }
}

impl TimelineConfig {
    /// Creates a config showing the whole `[time_min, time_max]` range.
    #[must_use]
    pub fn new(time_min: f64, time_max: f64) -> Self {
        Self {
            time_min,
            time_max,
            window_min: time_min,
            window_max: time_max,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_window(mut self, window_min: f64, window_max: f64) -> Self {
        self.window_min = window_min;
        self.window_max = window_max;
        self
    }

    /// Sets the viewport size in pixels.
    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.horizontal_window_size = width;
        self.vertical_window_size = height;
        self
    }

    #[must_use]
    pub fn with_default_line_size(mut self, line_size: f64) -> Self {
        self.default_line_size = line_size;
        self
    }

    #[must_use]
    pub fn with_horizontal_overdraw_ratio(mut self, ratio: f64) -> Self {
        self.horizontal_overdraw_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_vertical_overdraw_px(mut self, overdraw_px: f64) -> Self {
        self.vertical_overdraw_px = overdraw_px;
        self
    }

    /// Snaps dragged and resized times to multiples of `snap`.
    #[must_use]
    pub fn with_time_snap(mut self, snap: f64) -> Self {
        self.time_snap = Some(snap);
        self
    }

    /// Sets how many items one `poll_group_index` call may process.
    #[must_use]
    pub fn with_index_chunk_size(mut self, chunk_size: usize) -> Self {
        self.index_chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_max_element_size(mut self, max_element_size: f64) -> Self {
        self.max_element_size = max_element_size;
        self
    }

    #[must_use]
    pub fn with_resync_threshold_size(mut self, resync_threshold_size: f64) -> Self {
        self.resync_threshold_size = resync_threshold_size;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        validate_interval("time extrema", self.time_min, self.time_max)?;
        validate_interval("window", self.window_min, self.window_max)?;
        validate_size(
            "horizontal_window_size",
            self.horizontal_window_size,
            Bounds::non_negative(),
        )?;
        validate_size(
            "vertical_window_size",
            self.vertical_window_size,
            Bounds::non_negative(),
        )?;
        validate_size(
            "default_line_size",
            self.default_line_size,
            Bounds::non_negative(),
        )?;
        validate_size(
            "horizontal_overdraw_ratio",
            self.horizontal_overdraw_ratio,
            Bounds::non_negative(),
        )?;
        validate_size(
            "vertical_overdraw_px",
            self.vertical_overdraw_px,
            Bounds::non_negative(),
        )?;
        if let Some(snap) = self.time_snap {
            validate_size("time_snap", snap, Bounds::positive())?;
        }
        if self.index_chunk_size == 0 {
            return Err(TimelineError::SizeRange {
                name: "index_chunk_size".to_owned(),
                value: 0.0,
                bounds: Bounds::positive(),
            });
        }
        validate_size(
            "max_element_size",
            self.max_element_size,
            Bounds::positive(),
        )?;
        validate_size(
            "resync_threshold_size",
            self.resync_threshold_size,
            Bounds::non_negative(),
        )?;
        Ok(())
    }

    pub(super) fn horizontal_axis_config(&self) -> AxisConfig {
        AxisConfig::new(self.time_min, self.time_max)
            .with_window(self.window_min, self.window_max)
            .with_window_size(self.horizontal_window_size)
            .with_max_element_size(self.max_element_size)
            .with_resync_threshold_size(self.resync_threshold_size)
    }

    /// Vertical values are content pixels mapped 1:1 while the viewport has
    /// a height.
    pub(super) fn vertical_axis_config(&self) -> AxisConfig {
        let range = vertical_window_range(self.vertical_window_size);
        AxisConfig::new(0.0, range)
            .with_window_size(self.vertical_window_size)
            .with_max_element_size(self.max_element_size)
            .with_resync_threshold_size(self.resync_threshold_size)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> TimelineResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| TimelineError::Serialization(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON and validates it.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| TimelineError::Serialization(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

/// Value range of the vertical window; a zero-height viewport still keeps a
/// one-pixel window so the axis interval stays valid.
pub(super) fn vertical_window_range(window_size: f64) -> f64 {
    if window_size > 0.0 { window_size } else { 1.0 }
}

fn default_line_size() -> f64 {
    DEFAULT_LINE_SIZE
}

fn default_horizontal_overdraw_ratio() -> f64 {
    DEFAULT_HORIZONTAL_OVERDRAW_RATIO
}

fn default_vertical_overdraw_px() -> f64 {
    DEFAULT_VERTICAL_OVERDRAW_PX
}

fn default_index_chunk_size() -> usize {
    DEFAULT_INDEX_CHUNK_SIZE
}

fn default_max_element_size() -> f64 {
    DEFAULT_MAX_ELEMENT_SIZE
}

fn default_resync_threshold_size() -> f64 {
    DEFAULT_RESYNC_THRESHOLD_SIZE
}
