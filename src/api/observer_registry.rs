use crate::error::{TimelineError, TimelineResult};
use crate::extensions::{ObserverContext, TimelineEvent, TimelineObserver};

use super::VirtualizationIndex;

impl VirtualizationIndex {
    /// Registers an observer with a unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn TimelineObserver>) -> TimelineResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(TimelineError::InvalidObserver(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(TimelineError::DuplicateObserver(observer_id));
        }
        self.core.runtime.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .core
            .runtime
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.core.runtime.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.core.runtime.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.core
            .runtime
            .observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    pub(super) fn observer_context(&self) -> ObserverContext {
        let horizontal = &self.core.horizontal;
        let vertical = &self.core.vertical;
        ObserverContext {
            horizontal_window: (horizontal.window_min(), horizontal.window_max()),
            vertical_window: (vertical.window_min(), vertical.window_max()),
            groups_len: self.core.model.groups.len(),
            items_len: self.core.model.items.len(),
            interaction_mode: self.interaction_mode(),
        }
    }

    pub(super) fn emit_event(&mut self, event: TimelineEvent) {
        let context = self.observer_context();
        for observer in &mut self.core.runtime.observers {
            observer.on_event(event, context);
        }
    }

    pub(super) fn emit_render_request(&mut self) {
        self.emit_event(TimelineEvent::RenderRequest);
    }
}
