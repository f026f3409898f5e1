use std::fmt;

use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

/// Permitted range reported by range errors.
///
/// Rendered with interval notation, e.g. `[0, inf)` or `(0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
}

impl Bounds {
    #[must_use]
    pub const fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    #[must_use]
    pub const fn non_negative() -> Self {
        Self::inclusive(0.0, f64::INFINITY)
    }

    #[must_use]
    pub const fn positive() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
            min_inclusive: false,
            max_inclusive: true,
        }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        let above_min = if self.min_inclusive {
            value >= self.min
        } else {
            value > self.min
        };
        let below_max = if self.max_inclusive {
            value <= self.max
        } else {
            value < self.max
        };
        above_min && below_max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_inclusive { '[' } else { '(' };
        let close = if self.max_inclusive && self.max.is_finite() {
            ']'
        } else {
            ')'
        };
        write!(f, "{open}{}, {}{close}", self.min, self.max)
    }
}

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("`{name}` must be a number, got {value}")]
    NotANumber { name: String, value: f64 },

    #[error("`{name}` must be a finite size, got {value}")]
    NotASize { name: String, value: f64 },

    #[error("`{name}` must be a finite position, got {value}")]
    NotAPosition { name: String, value: f64 },

    #[error("`{name}` size {value} is outside {bounds}")]
    SizeRange {
        name: String,
        value: f64,
        bounds: Bounds,
    },

    #[error("`{name}` position {value} is outside {bounds}")]
    PositionRange {
        name: String,
        value: f64,
        bounds: Bounds,
    },

    #[error("`{name}` minimum {min} must be less than maximum {max}")]
    IntervalExtrema { name: String, min: f64, max: f64 },

    #[error("`{name}` option `{value}` is not one of: {}", .options.join(", "))]
    UnknownStringOption {
        name: String,
        value: String,
        options: &'static [&'static str],
    },

    #[error("unknown item id {0}")]
    UnknownItem(u64),

    #[error("unknown group id {0}")]
    UnknownGroup(u64),

    #[error("observer with id `{0}` is already registered")]
    DuplicateObserver(String),

    #[error("invalid observer: {0}")]
    InvalidObserver(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
