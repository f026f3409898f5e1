use serde::{Deserialize, Serialize};

use crate::core::AxisKind;
use crate::interaction::{InteractionMode, ItemChange};

/// Read-only state snapshot passed to observer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverContext {
    pub horizontal_window: (f64, f64),
    pub vertical_window: (f64, f64),
    pub groups_len: usize,
    pub items_len: usize,
    pub interaction_mode: InteractionMode,
}

/// Notifications emitted by the virtualization index.
///
/// Geometry events carry the previous and the current value of the axis
/// they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    /// Visible output changed; the host should re-render.
    RenderRequest,
    WindowChange {
        axis: AxisKind,
        previous: (f64, f64),
        current: (f64, f64),
    },
    WindowSizeChange {
        axis: AxisKind,
        previous: f64,
        current: f64,
    },
    ScrollPosChange {
        axis: AxisKind,
        previous: f64,
        current: f64,
    },
    ScrollSizeChange {
        axis: AxisKind,
        previous: f64,
        current: f64,
    },
    ItemChangeCommitted(ItemChange),
    GroupIndexRebuilt {
        generation: u64,
        groups_len: usize,
        items_len: usize,
    },
}

/// Observer hook interface.
///
/// Observers read index context but cannot mutate index internals.
pub trait TimelineObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: TimelineEvent, context: ObserverContext);
}
