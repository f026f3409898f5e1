use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{GroupId, Item, TimeRange};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Dragging,
    ResizingStart,
    ResizingEnd,
}

/// Which edge of an item a resize moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEdge {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemChangeKind {
    Drag,
    ResizeStart,
    ResizeEnd,
}

impl ItemChangeKind {
    #[must_use]
    pub const fn mode(self) -> InteractionMode {
        match self {
            Self::Drag => InteractionMode::Dragging,
            Self::ResizeStart => InteractionMode::ResizingStart,
            Self::ResizeEnd => InteractionMode::ResizingEnd,
        }
    }

    #[must_use]
    pub const fn is_resize(self) -> bool {
        matches!(self, Self::ResizeStart | Self::ResizeEnd)
    }
}

/// Committed result of a drag or resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemChange {
    pub kind: ItemChangeKind,
    pub original: Item,
    pub modified: Item,
}

/// Adjusts a raw drag proposal, e.g. to keep items aligned or in bounds.
pub trait DragValidator {
    fn validate_drag(&self, item: &Item, proposal: TimeRange) -> TimeRange;
}

impl<F> DragValidator for F
where
    F: Fn(&Item, TimeRange) -> TimeRange,
{
    fn validate_drag(&self, item: &Item, proposal: TimeRange) -> TimeRange {
        self(item, proposal)
    }
}

/// Adjusts a raw resize proposal for one edge.
pub trait ResizeValidator {
    fn validate_resize(&self, item: &Item, edge: ItemEdge, raw_time: f64) -> TimeRange;
}

impl<F> ResizeValidator for F
where
    F: Fn(&Item, ItemEdge, f64) -> TimeRange,
{
    fn validate_resize(&self, item: &Item, edge: ItemEdge, raw_time: f64) -> TimeRange {
        self(item, edge, raw_time)
    }
}

/// Moves dragged items so they start on the nearest UTC midnight.
///
/// Item times are read as Unix milliseconds; duration is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayAlignedDragValidator;

impl DragValidator for DayAlignedDragValidator {
    fn validate_drag(&self, _item: &Item, proposal: TimeRange) -> TimeRange {
        let start = nearest_utc_midnight_ms(proposal.start);
        TimeRange::new(start, start + proposal.duration())
    }
}

/// Snaps the moved edge to a fixed grid and keeps the item non-inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridResizeValidator {
    pub step: f64,
    pub origin: f64,
}

impl ResizeValidator for GridResizeValidator {
    fn validate_resize(&self, item: &Item, edge: ItemEdge, raw_time: f64) -> TimeRange {
        let snapped = snap_time(raw_time - self.origin, Some(self.step)) + self.origin;
        match edge {
            ItemEdge::Start => TimeRange::new(snapped.min(item.end_time), item.end_time),
            ItemEdge::End => TimeRange::new(item.start_time, snapped.max(item.start_time)),
        }
    }
}

/// Rounds `value` to the nearest multiple of `snap`; no-op without a snap.
#[must_use]
pub fn snap_time(value: f64, snap: Option<f64>) -> f64 {
    match snap {
        Some(step) if step > 0.0 => (value / step).round() * step,
        _ => value,
    }
}

fn nearest_utc_midnight_ms(value: f64) -> f64 {
    let Some(moment) = DateTime::<Utc>::from_timestamp_millis(value.round() as i64) else {
        return value;
    };
    let day_start = moment
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp_millis());
    let Some(day_start) = day_start else {
        return value;
    };
    let next_day_start = moment
        .date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(day_start + MILLIS_PER_DAY, |naive| {
            naive.and_utc().timestamp_millis()
        });
    if value - day_start as f64 <= next_day_start as f64 - value {
        day_start as f64
    } else {
        next_day_start as f64
    }
}

/// Transient state of the single active drag or resize.
///
/// Holds the committed item, the provisional one rendered in its place and
/// the last raw proposal so validators only run when it changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemChangeState {
    kind: ItemChangeKind,
    item_index: usize,
    original: Item,
    provisional: Item,
    pointer_origin: f64,
    last_raw: Option<TimeRange>,
}

impl ItemChangeState {
    #[must_use]
    pub fn new(
        kind: ItemChangeKind,
        item_index: usize,
        original: Item,
        pointer_origin: f64,
    ) -> Self {
        Self {
            kind,
            item_index,
            original,
            provisional: original,
            pointer_origin,
            last_raw: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ItemChangeKind {
        self.kind
    }

    #[must_use]
    pub fn item_index(&self) -> usize {
        self.item_index
    }

    #[must_use]
    pub fn original(&self) -> Item {
        self.original
    }

    #[must_use]
    pub fn provisional(&self) -> Item {
        self.provisional
    }

    #[must_use]
    pub fn pointer_origin(&self) -> f64 {
        self.pointer_origin
    }

    #[must_use]
    pub fn provisional_group(&self) -> GroupId {
        self.provisional.group_id
    }

    /// True when `raw` differs from the last proposal seen.
    #[must_use]
    pub fn is_new_proposal(&self, raw: TimeRange) -> bool {
        self.last_raw != Some(raw)
    }

    pub fn record_proposal(&mut self, raw: TimeRange) {
        self.last_raw = Some(raw);
    }

    /// Replaces the provisional item; returns whether anything changed.
    pub fn set_provisional(&mut self, item: Item) -> bool {
        if item == self.provisional {
            return false;
        }
        self.provisional = item;
        true
    }

    #[must_use]
    pub fn into_change(self) -> ItemChange {
        ItemChange {
            kind: self.kind,
            original: self.original,
            modified: self.provisional,
        }
    }
}
