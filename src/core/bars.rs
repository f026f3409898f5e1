//! Leading/trailing bar allocation along one axis.
//!
//! An axis of `size` pixels is split into an optional start bar, an optional
//! end bar and the middle region in between. The middle region never drops
//! below `middle_min` while any bar has room to give.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::validation::{parse_string_option, validate_number, validate_size};
use crate::error::{Bounds, TimelineError, TimelineResult};

const SIZE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarSide {
    Start,
    End,
}

impl BarSide {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Per-bar bounds and the middle-region minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarConstraints {
    pub start_min: f64,
    pub start_max: f64,
    pub end_min: f64,
    pub end_max: f64,
    pub middle_min: f64,
}

impl Default for BarConstraints {
    fn default() -> Self {
        Self {
            start_min: 0.0,
            start_max: f64::INFINITY,
            end_min: 0.0,
            end_max: f64::INFINITY,
            middle_min: 0.0,
        }
    }
}

impl BarConstraints {
    #[must_use]
    pub fn with_start_extrema(mut self, min: f64, max: f64) -> Self {
        self.start_min = min;
        self.start_max = max;
        self
    }

    #[must_use]
    pub fn with_end_extrema(mut self, min: f64, max: f64) -> Self {
        self.end_min = min;
        self.end_max = max;
        self
    }

    #[must_use]
    pub fn with_middle_min(mut self, middle_min: f64) -> Self {
        self.middle_min = middle_min;
        self
    }

    fn validate(self) -> TimelineResult<Self> {
        validate_bar_extrema("start", self.start_min, self.start_max)?;
        validate_bar_extrema("end", self.end_min, self.end_max)?;
        validate_size("middle_min", self.middle_min, Bounds::non_negative())?;
        Ok(self)
    }
}

fn validate_bar_extrema(name: &str, min: f64, max: f64) -> TimelineResult<()> {
    validate_size(&format!("{name}_min"), min, Bounds::non_negative())?;
    let max = validate_number(&format!("{name}_max"), max)?;
    if max < min {
        return Err(TimelineError::SizeRange {
            name: format!("{name}_max"),
            value: max,
            bounds: Bounds::inclusive(min, f64::INFINITY),
        });
    }
    Ok(())
}

/// Full allocation state: total size, constraints and current bar sizes.
///
/// `None` means the bar is absent and takes no space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarState {
    pub size: f64,
    pub start_size: Option<f64>,
    pub end_size: Option<f64>,
    pub constraints: BarConstraints,
}

impl BarState {
    /// Space the two bars may share.
    #[must_use]
    pub fn available(&self) -> f64 {
        (self.size - self.constraints.middle_min).max(0.0)
    }

    #[must_use]
    pub fn middle_size(&self) -> f64 {
        self.size - self.start_size.unwrap_or(0.0) - self.end_size.unwrap_or(0.0)
    }

    #[must_use]
    pub fn bar_size(&self, side: BarSide) -> Option<f64> {
        match side {
            BarSide::Start => self.start_size,
            BarSide::End => self.end_size,
        }
    }

    #[must_use]
    pub fn bar_extrema(&self, side: BarSide) -> (f64, f64) {
        match side {
            BarSide::Start => (self.constraints.start_min, self.constraints.start_max),
            BarSide::End => (self.constraints.end_min, self.constraints.end_max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarSizes {
    pub start_size: Option<f64>,
    pub end_size: Option<f64>,
}

/// Result of resizing a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SideResize {
    pub bar_size: Option<f64>,
    pub other_bar_size: Option<f64>,
}

/// Input to [`BarResizeStrategy::resize`].
///
/// `current` carries the new size and constraints with the bar sizes from
/// before the change; `previous` is the full state before the change.
#[derive(Debug, Clone, Copy)]
pub struct BarResizeContext<'a> {
    pub previous: &'a BarState,
    pub current: &'a BarState,
}

/// Reallocates bars after the container size or a constraint changed.
pub trait BarResizeStrategy {
    fn name(&self) -> &str;
    fn resize(&self, context: &BarResizeContext<'_>) -> BarSizes;
}

/// Resolves a user-driven resize of one bar.
pub trait SideResizeStrategy {
    fn name(&self) -> &str;
    fn resize_side(&self, state: &BarState, side: BarSide, target: f64) -> SideResize;
}

/// Clamps into `[min, max]`; when `min > max` the maximum wins.
#[must_use]
pub fn clamp_max_wins(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Clamps requested sizes into their bounds and shrinks them until both bars
/// fit beside `middle_min`.
///
/// Space above each bar's minimum is given up first, proportionally. If the
/// minimums alone do not fit, the available space is split in proportion to
/// the minimums.
#[must_use]
pub fn fit_bars(state: &BarState, start: Option<f64>, end: Option<f64>) -> BarSizes {
    let available = state.available();
    let limits = state.constraints;
    let start = start.map(|size| {
        clamp_max_wins(size, limits.start_min, limits.start_max.min(available))
    });
    let end = end.map(|size| clamp_max_wins(size, limits.end_min, limits.end_max.min(available)));

    let mut start_value = start.unwrap_or(0.0);
    let mut end_value = end.unwrap_or(0.0);
    let overflow = start_value + end_value - available;
    if overflow <= 0.0 {
        return BarSizes {
            start_size: start,
            end_size: end,
        };
    }

    let start_slack = start.map_or(0.0, |size| (size - limits.start_min).max(0.0));
    let end_slack = end.map_or(0.0, |size| (size - limits.end_min).max(0.0));
    let total_slack = start_slack + end_slack;
    if total_slack > 0.0 && total_slack >= overflow {
        start_value -= overflow * start_slack / total_slack;
        end_value -= overflow * end_slack / total_slack;
    } else {
        let start_floor = start_value - start_slack;
        let end_floor = end_value - end_slack;
        let floors = start_floor + end_floor;
        if floors > 0.0 {
            start_value = available * start_floor / floors;
            end_value = available * end_floor / floors;
        } else {
            start_value = 0.0;
            end_value = 0.0;
        }
    }

    start_value = start_value.clamp(0.0, available);
    end_value = end_value.min(available - start_value).max(0.0);
    BarSizes {
        start_size: start.map(|_| start_value),
        end_size: end.map(|_| end_value),
    }
}

/// Built-in reallocation policies for container or constraint changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeStrategyKind {
    /// Keep the middle region's size; bars absorb the difference.
    PreserveMiddle,
    /// Keep both bar sizes; the middle absorbs the difference.
    #[default]
    PreserveSides,
    /// Scale bars and middle together.
    ScaleAll,
}

impl ResizeStrategyKind {
    const OPTIONS: &'static [&'static str] = &["preserve-middle", "preserve-sides", "scale-all"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreserveMiddle => "preserve-middle",
            Self::PreserveSides => "preserve-sides",
            Self::ScaleAll => "scale-all",
        }
    }
}

impl fmt::Display for ResizeStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeStrategyKind {
    type Err = TimelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_string_option(
            "resize_strategy",
            value,
            &[
                ("preserve-middle", Self::PreserveMiddle),
                ("preserve-sides", Self::PreserveSides),
                ("scale-all", Self::ScaleAll),
            ],
            Self::OPTIONS,
        )
    }
}

impl BarResizeStrategy for ResizeStrategyKind {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn resize(&self, context: &BarResizeContext<'_>) -> BarSizes {
        let previous = context.previous;
        let current = context.current;
        match self {
            Self::PreserveMiddle => {
                let middle = previous
                    .middle_size()
                    .max(current.constraints.middle_min);
                let bars_total = (current.size - middle).max(0.0);
                let (start, end) = split_proportionally(
                    bars_total,
                    previous.start_size,
                    previous.end_size,
                );
                fit_bars(current, start, end)
            }
            Self::PreserveSides => fit_bars(current, current.start_size, current.end_size),
            Self::ScaleAll => {
                let ratio = if previous.size > 0.0 {
                    current.size / previous.size
                } else {
                    1.0
                };
                fit_bars(
                    current,
                    current.start_size.map(|size| size * ratio),
                    current.end_size.map(|size| size * ratio),
                )
            }
        }
    }
}

fn split_proportionally(
    total: f64,
    start: Option<f64>,
    end: Option<f64>,
) -> (Option<f64>, Option<f64>) {
    match (start, end) {
        (Some(start), Some(end)) => {
            let sum = start + end;
            if sum > 0.0 {
                let start_share = total * start / sum;
                (Some(start_share), Some(total - start_share))
            } else {
                (Some(total / 2.0), Some(total / 2.0))
            }
        }
        (Some(_), None) => (Some(total), None),
        (None, Some(_)) => (None, Some(total)),
        (None, None) => (None, None),
    }
}

/// Built-in policies for a bar dragged past the available space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideResizeStrategyKind {
    /// Shrink the other bar toward its minimum before capping.
    #[default]
    Consume,
    /// Cap the resized bar; never touch the other one.
    Constrain,
}

impl SideResizeStrategyKind {
    const OPTIONS: &'static [&'static str] = &["consume", "constrain"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consume => "consume",
            Self::Constrain => "constrain",
        }
    }
}

impl fmt::Display for SideResizeStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SideResizeStrategyKind {
    type Err = TimelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_string_option(
            "side_resize_strategy",
            value,
            &[("consume", Self::Consume), ("constrain", Self::Constrain)],
            Self::OPTIONS,
        )
    }
}

impl SideResizeStrategy for SideResizeStrategyKind {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn resize_side(&self, state: &BarState, side: BarSide, target: f64) -> SideResize {
        let available = state.available();
        let (bar_min, bar_max) = state.bar_extrema(side);
        let other = state.bar_size(side.other());
        match self {
            Self::Constrain => {
                let room = (available - other.unwrap_or(0.0)).max(0.0);
                SideResize {
                    bar_size: Some(clamp_max_wins(target, bar_min, bar_max.min(room))),
                    other_bar_size: other,
                }
            }
            Self::Consume => {
                let mut bar = clamp_max_wins(target, bar_min, bar_max.min(available));
                let other = other.map(|other_size| {
                    if bar + other_size <= available {
                        return other_size;
                    }
                    let (other_min, _) = state.bar_extrema(side.other());
                    let shrunk = clamp_max_wins(available - bar, other_min, other_size);
                    bar = bar.min(available - shrunk).max(0.0);
                    shrunk
                });
                SideResize {
                    bar_size: Some(bar),
                    other_bar_size: other,
                }
            }
        }
    }
}

/// Owns a [`BarState`] and keeps it valid through every mutation.
pub struct BarAllocator {
    state: BarState,
    resize_strategy: Box<dyn BarResizeStrategy>,
    side_resize_strategy: Box<dyn SideResizeStrategy>,
}

impl fmt::Debug for BarAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarAllocator")
            .field("state", &self.state)
            .field("resize_strategy", &self.resize_strategy.name())
            .field("side_resize_strategy", &self.side_resize_strategy.name())
            .finish()
    }
}

impl BarAllocator {
    pub fn new(
        size: f64,
        constraints: BarConstraints,
        start_size: Option<f64>,
        end_size: Option<f64>,
    ) -> TimelineResult<Self> {
        let size = validate_size("size", size, Bounds::non_negative())?;
        let constraints = constraints.validate()?;
        for (name, value) in [("start_size", start_size), ("end_size", end_size)] {
            if let Some(value) = value {
                validate_size(name, value, Bounds::non_negative())?;
            }
        }

        let mut state = BarState {
            size,
            start_size,
            end_size,
            constraints,
        };
        let fitted = fit_bars(&state, start_size, end_size);
        state.start_size = fitted.start_size;
        state.end_size = fitted.end_size;
        Ok(Self {
            state,
            resize_strategy: Box::new(ResizeStrategyKind::default()),
            side_resize_strategy: Box::new(SideResizeStrategyKind::default()),
        })
    }

    #[must_use]
    pub fn with_resize_strategy(mut self, strategy: Box<dyn BarResizeStrategy>) -> Self {
        self.resize_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_side_resize_strategy(mut self, strategy: Box<dyn SideResizeStrategy>) -> Self {
        self.side_resize_strategy = strategy;
        self
    }

    pub fn set_resize_strategy(&mut self, strategy: Box<dyn BarResizeStrategy>) {
        self.resize_strategy = strategy;
    }

    pub fn set_side_resize_strategy(&mut self, strategy: Box<dyn SideResizeStrategy>) {
        self.side_resize_strategy = strategy;
    }

    #[must_use]
    pub fn state(&self) -> BarState {
        self.state
    }

    #[must_use]
    pub fn size(&self) -> f64 {
        self.state.size
    }

    #[must_use]
    pub fn start_size(&self) -> Option<f64> {
        self.state.start_size
    }

    #[must_use]
    pub fn end_size(&self) -> Option<f64> {
        self.state.end_size
    }

    #[must_use]
    pub fn middle_size(&self) -> f64 {
        self.state.middle_size()
    }

    pub fn set_size(&mut self, size: f64) -> TimelineResult<BarSizes> {
        let size = validate_size("size", size, Bounds::non_negative())?;
        self.reallocate(|state| state.size = size)
    }

    pub fn set_start_extrema(&mut self, min: f64, max: f64) -> TimelineResult<BarSizes> {
        validate_bar_extrema("start", min, max)?;
        self.reallocate(|state| {
            state.constraints.start_min = min;
            state.constraints.start_max = max;
        })
    }

    pub fn set_end_extrema(&mut self, min: f64, max: f64) -> TimelineResult<BarSizes> {
        validate_bar_extrema("end", min, max)?;
        self.reallocate(|state| {
            state.constraints.end_min = min;
            state.constraints.end_max = max;
        })
    }

    pub fn set_middle_min(&mut self, middle_min: f64) -> TimelineResult<BarSizes> {
        let middle_min = validate_size("middle_min", middle_min, Bounds::non_negative())?;
        self.reallocate(|state| state.constraints.middle_min = middle_min)
    }

    /// Sets or removes one bar.
    ///
    /// A request that fits after clamping to the bar's bounds is applied
    /// directly; otherwise the side resize strategy decides.
    pub fn set_bar_size(&mut self, side: BarSide, size: Option<f64>) -> TimelineResult<BarSizes> {
        let Some(target) = size else {
            match side {
                BarSide::Start => self.state.start_size = None,
                BarSide::End => self.state.end_size = None,
            }
            return Ok(self.sizes());
        };
        let target = validate_size(
            match side {
                BarSide::Start => "start_size",
                BarSide::End => "end_size",
            },
            target,
            Bounds::non_negative(),
        )?;

        let (bar_min, bar_max) = self.state.bar_extrema(side);
        let clamped = clamp_max_wins(target, bar_min, bar_max);
        let other = self.state.bar_size(side.other()).unwrap_or(0.0);
        let result = if clamped + other <= self.state.available() {
            SideResize {
                bar_size: Some(clamped),
                other_bar_size: self.state.bar_size(side.other()),
            }
        } else {
            let result = self
                .side_resize_strategy
                .resize_side(&self.state, side, target);
            tracing::debug!(
                strategy = self.side_resize_strategy.name(),
                ?side,
                target,
                bar_size = ?result.bar_size,
                other_bar_size = ?result.other_bar_size,
                "side resize strategy applied"
            );
            result
        };

        let sizes = match side {
            BarSide::Start => BarSizes {
                start_size: result.bar_size,
                end_size: result.other_bar_size,
            },
            BarSide::End => BarSizes {
                start_size: result.other_bar_size,
                end_size: result.bar_size,
            },
        };
        validate_allocation(self.side_resize_strategy.name(), &self.state, sizes)?;
        self.apply(sizes);
        Ok(sizes)
    }

    fn sizes(&self) -> BarSizes {
        BarSizes {
            start_size: self.state.start_size,
            end_size: self.state.end_size,
        }
    }

    fn apply(&mut self, sizes: BarSizes) {
        self.state.start_size = sizes.start_size;
        self.state.end_size = sizes.end_size;
    }

    fn reallocate(&mut self, update: impl FnOnce(&mut BarState)) -> TimelineResult<BarSizes> {
        let previous = self.state;
        let mut current = self.state;
        update(&mut current);
        if current == previous {
            return Ok(self.sizes());
        }

        let sizes = self.resize_strategy.resize(&BarResizeContext {
            previous: &previous,
            current: &current,
        });
        validate_allocation(self.resize_strategy.name(), &current, sizes)?;
        self.state = current;
        self.apply(sizes);
        Ok(sizes)
    }
}

/// Checks a strategy result against the state it will be applied to.
fn validate_allocation(strategy: &str, state: &BarState, sizes: BarSizes) -> TimelineResult<()> {
    let available = state.available();
    for (side, size) in [
        (BarSide::Start, sizes.start_size),
        (BarSide::End, sizes.end_size),
    ] {
        let Some(size) = size else {
            continue;
        };
        let name = format!(
            "{strategy} {}",
            match side {
                BarSide::Start => "start_size",
                BarSide::End => "end_size",
            }
        );
        let other = match side {
            BarSide::Start => sizes.end_size,
            BarSide::End => sizes.start_size,
        };
        let (bar_min, bar_max) = state.bar_extrema(side);
        let upper = bar_max.min(available);
        // Minimums may be given up only for space the other bar holds.
        let lower = bar_min
            .min(bar_max)
            .min((available - other.unwrap_or(0.0)).max(0.0));
        validate_size(
            &name,
            size,
            Bounds::inclusive(lower - SIZE_TOLERANCE, upper + SIZE_TOLERANCE),
        )?;
    }

    let total = sizes.start_size.unwrap_or(0.0) + sizes.end_size.unwrap_or(0.0);
    if total > available + SIZE_TOLERANCE {
        return Err(TimelineError::SizeRange {
            name: format!("{strategy} total bar size"),
            value: total,
            bounds: Bounds::inclusive(0.0, available),
        });
    }
    Ok(())
}
