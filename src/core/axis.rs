use serde::{Deserialize, Serialize};

use crate::core::validation::{validate_interval, validate_position, validate_size};
use crate::error::{Bounds, TimelineError, TimelineResult};

/// Largest element size, in pixels, the axis will ask a host to materialize.
pub const DEFAULT_MAX_ELEMENT_SIZE: f64 = 10_000_000.0;
/// Distance, in pixels, from a non-terminal edge that triggers a resync.
pub const DEFAULT_RESYNC_THRESHOLD_SIZE: f64 = 1_000.0;

const INTEGRAL_TOLERANCE_PX: f64 = 1e-6;

/// Derived quantity of an [`Axis`] that a mutation can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisChange {
    Extrema,
    Window,
    WindowSize,
    Scale,
    ScrollPos,
    ScrollSize,
}

impl AxisChange {
    const fn bit(self) -> u8 {
        match self {
            Self::Extrema => 1 << 0,
            Self::Window => 1 << 1,
            Self::WindowSize => 1 << 2,
            Self::Scale => 1 << 3,
            Self::ScrollPos => 1 << 4,
            Self::ScrollSize => 1 << 5,
        }
    }
}

/// Bitmask returned by every axis mutator listing what actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisChanges {
    bits: u8,
}

impl AxisChanges {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_change(change: AxisChange) -> Self {
        Self { bits: change.bit() }
    }

    #[must_use]
    pub const fn with_change(self, change: AxisChange) -> Self {
        Self {
            bits: self.bits | change.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains(self, change: AxisChange) -> bool {
        (self.bits & change.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    /// True when cached pixel geometry derived from the axis is stale.
    #[must_use]
    pub const fn affects_layout(self) -> bool {
        self.contains(AxisChange::Extrema)
            || self.contains(AxisChange::Window)
            || self.contains(AxisChange::WindowSize)
            || self.contains(AxisChange::Scale)
    }
}

/// Construction parameters for [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub min: f64,
    pub max: f64,
    pub window_min: f64,
    pub window_max: f64,
    pub window_size: f64,
    pub max_element_size: f64,
    pub resync_threshold_size: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            window_min: 0.0,
            window_max: 1.0,
            window_size: 0.0,
            max_element_size: DEFAULT_MAX_ELEMENT_SIZE,
            resync_threshold_size: DEFAULT_RESYNC_THRESHOLD_SIZE,
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            window_min: min,
            window_max: max,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_window(mut self, window_min: f64, window_max: f64) -> Self {
        self.window_min = window_min;
        self.window_max = window_max;
        self
    }

    #[must_use]
    pub fn with_window_size(mut self, window_size: f64) -> Self {
        self.window_size = window_size;
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
}

/// Read-only copy of every axis field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    pub min: f64,
    pub max: f64,
    pub window_min: f64,
    pub window_max: f64,
    pub window_size: f64,
    pub scroll_origin: f64,
    pub scroll_pos: f64,
    pub scroll_size: f64,
    pub pixel_per_unit: f64,
    pub unit_per_pixel: f64,
    pub max_element_size: f64,
    pub resync_threshold_size: f64,
    pub is_min_terminal: bool,
    pub is_max_terminal: bool,
}

/// Maps a value range onto a bounded scrollable pixel range.
///
/// Only a region of at most `max(max_element_size, window_size + 2 *
/// resync_threshold_size)` pixels is ever materialized. That region starts at
/// the value `scroll_origin` and is re-centred around the window (a resync)
/// whenever the window comes within `resync_threshold_size` pixels of a
/// region edge that is not also an extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    min: f64,
    max: f64,
    window_min: f64,
    window_max: f64,
    window_size: f64,
    max_element_size: f64,
    resync_threshold_size: f64,
    scroll_origin: f64,
    scroll_pos: f64,
    scroll_size: f64,
    pixel_per_unit: f64,
    unit_per_pixel: f64,
    is_min_terminal: bool,
    is_max_terminal: bool,
}

impl Axis {
    pub fn new(config: AxisConfig) -> TimelineResult<Self> {
        let (min, max) = validate_interval("extrema", config.min, config.max)?;
        let (window_min, window_max) =
            validate_interval("window", config.window_min, config.window_max)?;
        let window_size = validate_size("window_size", config.window_size, Bounds::non_negative())?;
        let max_element_size = validate_size(
            "max_element_size",
            config.max_element_size,
            Bounds::positive(),
        )?;
        let resync_threshold_size = validate_size(
            "resync_threshold_size",
            config.resync_threshold_size,
            Bounds::non_negative(),
        )?;

        let mut axis = Self {
            min,
            max,
            window_min,
            window_max,
            window_size,
            max_element_size,
            resync_threshold_size,
            scroll_origin: min,
            scroll_pos: 0.0,
            scroll_size: 0.0,
            pixel_per_unit: 0.0,
            unit_per_pixel: 0.0,
            is_min_terminal: true,
            is_max_terminal: true,
        };
        let (window_min, window_max) = axis.clamp_window(window_min, window_max);
        axis.window_min = window_min;
        axis.window_max = window_max;
        axis.resync();
        Ok(axis)
    }

    #[must_use]
    pub fn state(&self) -> AxisState {
        AxisState {
            min: self.min,
            max: self.max,
            window_min: self.window_min,
            window_max: self.window_max,
            window_size: self.window_size,
            scroll_origin: self.scroll_origin,
            scroll_pos: self.scroll_pos,
            scroll_size: self.scroll_size,
            pixel_per_unit: self.pixel_per_unit,
            unit_per_pixel: self.unit_per_pixel,
            max_element_size: self.max_element_size,
            resync_threshold_size: self.resync_threshold_size,
            is_min_terminal: self.is_min_terminal,
            is_max_terminal: self.is_max_terminal,
        }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn window_min(&self) -> f64 {
        self.window_min
    }

    #[must_use]
    pub fn window_max(&self) -> f64 {
        self.window_max
    }

    #[must_use]
    pub fn window_range(&self) -> f64 {
        self.window_max - self.window_min
    }

    #[must_use]
    pub fn window_size(&self) -> f64 {
        self.window_size
    }

    #[must_use]
    pub fn scroll_pos(&self) -> f64 {
        self.scroll_pos
    }

    #[must_use]
    pub fn scroll_size(&self) -> f64 {
        self.scroll_size
    }

    #[must_use]
    pub fn scroll_origin(&self) -> f64 {
        self.scroll_origin
    }

    #[must_use]
    pub fn pixel_per_unit(&self) -> f64 {
        self.pixel_per_unit
    }

    #[must_use]
    pub fn unit_per_pixel(&self) -> f64 {
        self.unit_per_pixel
    }

    #[must_use]
    pub fn max_element_size(&self) -> f64 {
        self.max_element_size
    }

    #[must_use]
    pub fn resync_threshold_size(&self) -> f64 {
        self.resync_threshold_size
    }

    #[must_use]
    pub fn is_min_terminal(&self) -> bool {
        self.is_min_terminal
    }

    #[must_use]
    pub fn is_max_terminal(&self) -> bool {
        self.is_max_terminal
    }

    /// Pixel offset of `value` inside the materialized scroll region.
    #[must_use]
    pub fn get_pos(&self, value: f64) -> f64 {
        (value - self.scroll_origin) * self.pixel_per_unit
    }

    /// Inverse of [`Axis::get_pos`].
    #[must_use]
    pub fn get_value(&self, pos: f64) -> f64 {
        self.scroll_origin + pos * self.unit_per_pixel
    }

    /// Pixel offset of `value` relative to the visible viewport.
    #[must_use]
    pub fn get_window_pos(&self, value: f64) -> f64 {
        self.get_pos(value) - self.scroll_pos
    }

    /// Replaces the extrema.
    ///
    /// Re-clamps the window into the new extrema, then resyncs (scale, scroll
    /// origin, size and position).
    pub fn set_extrema(&mut self, min: f64, max: f64) -> TimelineResult<AxisChanges> {
        let (min, max) = validate_interval("extrema", min, max)?;
        if min == self.min && max == self.max {
            return Ok(AxisChanges::none());
        }
        self.min = min;
        self.max = max;

        let mut changes = AxisChanges::from_change(AxisChange::Extrema);
        let (window_min, window_max) = self.clamp_window(self.window_min, self.window_max);
        if window_min != self.window_min || window_max != self.window_max {
            self.window_min = window_min;
            self.window_max = window_max;
            changes = changes.with_change(AxisChange::Window);
        }
        Ok(changes.union(self.resync()))
    }

    /// Moves the window, clamped into the extrema.
    ///
    /// A range change resyncs. A pure shift only moves `scroll_pos`, unless
    /// the new position is non-integral or crosses the resync threshold.
    pub fn set_window_extrema(
        &mut self,
        window_min: f64,
        window_max: f64,
    ) -> TimelineResult<AxisChanges> {
        let (window_min, window_max) = validate_interval("window", window_min, window_max)?;
        let (window_min, window_max) = self.clamp_window(window_min, window_max);
        if window_min == self.window_min && window_max == self.window_max {
            return Ok(AxisChanges::none());
        }

        let previous_range = self.window_range();
        self.window_min = window_min;
        self.window_max = window_max;
        let changes = AxisChanges::from_change(AxisChange::Window);

        if !same_range(previous_range, self.window_range()) {
            return Ok(changes.union(self.resync()));
        }

        let target = (self.window_min - self.scroll_origin) * self.pixel_per_unit;
        if self.needs_resync(target) {
            return Ok(changes.union(self.resync()));
        }
        if target != self.scroll_pos {
            self.scroll_pos = target;
            return Ok(changes.with_change(AxisChange::ScrollPos));
        }
        Ok(changes)
    }

    /// Resizes the viewport, keeping the window value range.
    ///
    /// Recomputes scale and resyncs.
    pub fn set_window_size(&mut self, window_size: f64) -> TimelineResult<AxisChanges> {
        let window_size = validate_size("window_size", window_size, Bounds::non_negative())?;
        if window_size == self.window_size {
            return Ok(AxisChanges::none());
        }
        self.window_size = window_size;
        Ok(AxisChanges::from_change(AxisChange::WindowSize).union(self.resync()))
    }

    /// Resyncs with the new element size ceiling.
    pub fn set_max_element_size(&mut self, max_element_size: f64) -> TimelineResult<AxisChanges> {
        let max_element_size =
            validate_size("max_element_size", max_element_size, Bounds::positive())?;
        if max_element_size == self.max_element_size {
            return Ok(AxisChanges::none());
        }
        self.max_element_size = max_element_size;
        Ok(self.resync())
    }

    /// Resyncs with the new edge threshold.
    pub fn set_resync_threshold_size(
        &mut self,
        resync_threshold_size: f64,
    ) -> TimelineResult<AxisChanges> {
        let resync_threshold_size = validate_size(
            "resync_threshold_size",
            resync_threshold_size,
            Bounds::non_negative(),
        )?;
        if resync_threshold_size == self.resync_threshold_size {
            return Ok(AxisChanges::none());
        }
        self.resync_threshold_size = resync_threshold_size;
        Ok(self.resync())
    }

    /// Applies a scroll offset reported by the host.
    ///
    /// The offset is clamped to the scrollable range. The window is derived
    /// from `scroll_origin` directly so repeated scrolling never accumulates
    /// rounding error; near-edge or non-integral offsets resync.
    pub fn set_scroll_pos(&mut self, scroll_pos: f64) -> TimelineResult<AxisChanges> {
        let scroll_pos = validate_position(
            "scroll_pos",
            scroll_pos,
            Bounds::inclusive(f64::NEG_INFINITY, f64::INFINITY),
        )?;
        let max_pos = (self.scroll_size - self.window_size).max(0.0);
        let scroll_pos = scroll_pos.clamp(0.0, max_pos);
        if scroll_pos == self.scroll_pos {
            return Ok(AxisChanges::none());
        }

        let range = self.window_range();
        let derived_min = self.get_value(scroll_pos);
        let (window_min, window_max) = self.clamp_window(derived_min, derived_min + range);
        let mut changes = AxisChanges::from_change(AxisChange::ScrollPos);
        if window_min != self.window_min || window_max != self.window_max {
            changes = changes.with_change(AxisChange::Window);
        }
        self.window_min = window_min;
        self.window_max = window_max;
        self.scroll_pos = scroll_pos;

        if window_min != derived_min || self.needs_resync(scroll_pos) {
            changes = changes.union(self.resync());
        }
        Ok(changes)
    }

    /// Shifts the window by `delta` value units.
    pub fn pan_window(&mut self, delta: f64) -> TimelineResult<AxisChanges> {
        let delta = validate_position(
            "pan_delta",
            delta,
            Bounds::inclusive(f64::NEG_INFINITY, f64::INFINITY),
        )?;
        self.set_window_extrema(self.window_min + delta, self.window_max + delta)
    }

    /// Scales the window range by `1 / factor` keeping `anchor` fixed.
    ///
    /// `factor > 1.0` zooms in, `0.0 < factor < 1.0` zooms out.
    pub fn zoom_window(&mut self, anchor: f64, factor: f64) -> TimelineResult<AxisChanges> {
        let factor = validate_size("zoom_factor", factor, Bounds::positive())?;
        let anchor = validate_position(
            "zoom_anchor",
            anchor,
            Bounds::inclusive(f64::NEG_INFINITY, f64::INFINITY),
        )?;
        let range = self.window_range();
        let target = range / factor;
        let ratio = (anchor - self.window_min) / range;
        let window_min = anchor - ratio * target;
        let window_max = window_min + target;
        if window_min >= window_max {
            return Err(TimelineError::IntervalExtrema {
                name: "zoomed window".to_owned(),
                min: window_min,
                max: window_max,
            });
        }
        self.set_window_extrema(window_min, window_max)
    }

    fn clamp_window(&self, window_min: f64, window_max: f64) -> (f64, f64) {
        let range = window_max - window_min;
        if range >= self.max - self.min {
            (self.min, self.max)
        } else if window_min < self.min {
            (self.min, self.min + range)
        } else if window_max > self.max {
            (self.max - range, self.max)
        } else {
            (window_min, window_max)
        }
    }

    fn needs_resync(&self, scroll_pos: f64) -> bool {
        if self.pixel_per_unit == 0.0 {
            return true;
        }
        if (scroll_pos - scroll_pos.round()).abs() > INTEGRAL_TOLERANCE_PX {
            return true;
        }
        let window_end = scroll_pos + self.window_size;
        if scroll_pos < 0.0 || window_end > self.scroll_size {
            return true;
        }
        let near_min = scroll_pos < self.resync_threshold_size;
        let near_max = window_end > self.scroll_size - self.resync_threshold_size;
        (near_min && !self.is_min_terminal) || (near_max && !self.is_max_terminal)
    }

    /// Recomputes scale, scroll origin, size, position and terminal flags.
    fn resync(&mut self) -> AxisChanges {
        let previous = self.state();

        let range = self.window_range();
        if self.window_size > 0.0 && range > 0.0 {
            self.pixel_per_unit = self.window_size / range;
            self.unit_per_pixel = range / self.window_size;
        } else {
            self.pixel_per_unit = 0.0;
            self.unit_per_pixel = 0.0;
        }

        if self.pixel_per_unit == 0.0 {
            self.scroll_origin = self.window_min;
            self.scroll_size = 0.0;
            self.scroll_pos = 0.0;
            self.is_min_terminal = self.window_min <= self.min;
            self.is_max_terminal = self.window_max >= self.max;
        } else {
            let full_size = (self.max - self.min) * self.pixel_per_unit;
            let capped_size = self
                .max_element_size
                .max(self.window_size + 2.0 * self.resync_threshold_size);
            if full_size <= capped_size {
                self.scroll_origin = self.min;
                self.scroll_size = full_size;
                self.is_min_terminal = true;
                self.is_max_terminal = true;
            } else {
                self.scroll_size = capped_size;
                let margin = ((capped_size - self.window_size) / 2.0).floor();
                let region_range = capped_size * self.unit_per_pixel;
                let mut origin = self.window_min - margin * self.unit_per_pixel;
                self.is_min_terminal = false;
                self.is_max_terminal = false;
                if origin + region_range >= self.max {
                    origin = self.max - region_range;
                    self.is_max_terminal = true;
                }
                if origin <= self.min {
                    origin = self.min;
                    self.is_min_terminal = true;
                }
                self.scroll_origin = origin;
            }
            self.scroll_pos = (self.window_min - self.scroll_origin) * self.pixel_per_unit;
        }

        let mut changes = AxisChanges::none();
        if previous.pixel_per_unit != self.pixel_per_unit {
            changes = changes.with_change(AxisChange::Scale);
        }
        if previous.scroll_size != self.scroll_size {
            changes = changes.with_change(AxisChange::ScrollSize);
        }
        if previous.scroll_pos != self.scroll_pos || previous.scroll_origin != self.scroll_origin
        {
            changes = changes.with_change(AxisChange::ScrollPos);
        }
        tracing::trace!(
            scroll_origin = self.scroll_origin,
            scroll_pos = self.scroll_pos,
            scroll_size = self.scroll_size,
            min_terminal = self.is_min_terminal,
            max_terminal = self.is_max_terminal,
            "axis resync"
        );
        changes
    }
}

fn same_range(left: f64, right: f64) -> bool {
    (left - right).abs() <= f64::EPSILON * left.abs().max(right.abs()) * 4.0
}
