//! Host-facing virtualization index.
//!
//! `VirtualizationIndex` is split across controller files, each adding one
//! `impl` block over the shared `IndexCore` state.

mod axis_controller;
mod data_controller;
mod group_index_rebuild;
mod index_core;
mod index_snapshot;
mod item_change_controller;
mod layout_cache;
mod observer_registry;
mod timeline_config;
mod virtualization_index;
mod visible_window_access;

pub use group_index_rebuild::RebuildPoll;
pub use index_snapshot::IndexSnapshot;
pub use layout_cache::{GroupLayout, PackedEntry};
pub use timeline_config::{
    DEFAULT_HORIZONTAL_OVERDRAW_RATIO, DEFAULT_INDEX_CHUNK_SIZE, DEFAULT_LINE_SIZE,
    DEFAULT_VERTICAL_OVERDRAW_PX, TimelineConfig,
};
pub use virtualization_index::VirtualizationIndex;
