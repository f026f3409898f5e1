//! timeline-rs: virtualized timeline core.
//!
//! Packs time intervals into non-overlapping rows, maps time and content
//! pixels through precision-safe scroll axes, allocates side bars around a
//! central viewport and tracks which groups, lines and items a host has to
//! render for the current window.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod telemetry;

pub use api::{IndexSnapshot, RebuildPoll, TimelineConfig, VirtualizationIndex};
pub use error::{TimelineError, TimelineResult};
