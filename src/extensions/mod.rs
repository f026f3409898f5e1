//! Host-facing hooks that sit beside the core index.

pub mod observers;

pub use observers::{ObserverContext, TimelineEvent, TimelineObserver};
