use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u64);

impl GroupId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Which of the two axes a value or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    /// Time axis.
    Horizontal,
    /// Group stacking axis, in content pixels.
    Vertical,
}

/// Half-open `[start, end)` value interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn overlaps(self, min: f64, max: f64) -> bool {
        self.start < max && self.end > min
    }
}

/// A time interval placed in one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub group_id: GroupId,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub is_draggable: bool,
    #[serde(default)]
    pub is_start_resizable: bool,
    #[serde(default)]
    pub is_end_resizable: bool,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, group_id: GroupId, start_time: f64, end_time: f64) -> Self {
        Self {
            id,
            group_id,
            start_time,
            end_time,
            is_draggable: false,
            is_start_resizable: false,
            is_end_resizable: false,
        }
    }

    /// Builds an item whose bounds are Unix milliseconds.
    #[must_use]
    pub fn from_datetimes(
        id: ItemId,
        group_id: GroupId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self::new(
            id,
            group_id,
            start.timestamp_millis() as f64,
            end.timestamp_millis() as f64,
        )
    }

    #[must_use]
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.is_draggable = draggable;
        self
    }

    #[must_use]
    pub fn with_resizable(mut self, start: bool, end: bool) -> Self {
        self.is_start_resizable = start;
        self.is_end_resizable = end;
        self
    }

    #[must_use]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    #[must_use]
    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.start_time = range.start;
        self.end_time = range.end;
        self
    }
}

/// A stack of packed item rows. `line_size` overrides the index default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub line_size: Option<f64>,
}

impl Group {
    #[must_use]
    pub const fn new(id: GroupId) -> Self {
        Self {
            id,
            line_size: None,
        }
    }

    #[must_use]
    pub fn with_line_size(mut self, line_size: f64) -> Self {
        self.line_size = Some(line_size);
        self
    }
}
