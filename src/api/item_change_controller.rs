use tracing::{debug, trace};

use crate::core::validation::validate_position;
use crate::core::{Item, ItemId, TimeRange};
use crate::error::{Bounds, TimelineError, TimelineResult};
use crate::extensions::TimelineEvent;
use crate::interaction::{
    DragValidator, InteractionMode, ItemChange, ItemChangeKind, ItemChangeState, ItemEdge,
    ResizeValidator, snap_time,
};

use super::VirtualizationIndex;

impl VirtualizationIndex {
    pub fn set_drag_validator(&mut self, validator: Option<Box<dyn DragValidator>>) {
        self.core.interaction.drag_validator = validator;
    }

    pub fn set_resize_validator(&mut self, validator: Option<Box<dyn ResizeValidator>>) {
        self.core.interaction.resize_validator = validator;
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.core
            .interaction
            .change
            .map_or(InteractionMode::Idle, |state| state.kind().mode())
    }

    #[must_use]
    pub fn item_change_kind(&self) -> Option<ItemChangeKind> {
        self.core.interaction.change.map(|state| state.kind())
    }

    #[must_use]
    pub fn item_change_state(&self) -> Option<&ItemChangeState> {
        self.core.interaction.change.as_ref()
    }

    /// Provisional item of the active drag or resize.
    #[must_use]
    pub fn provisional_item(&self) -> Option<Item> {
        self.core.interaction.change.map(|state| state.provisional())
    }

    #[must_use]
    pub fn dragged_item(&self) -> Option<Item> {
        self.active_change(is_drag).map(|state| state.provisional())
    }

    #[must_use]
    pub fn resized_item(&self) -> Option<Item> {
        self.active_change(ItemChangeKind::is_resize)
            .map(|state| state.provisional())
    }

    /// Provisional start minus committed start of the dragged item.
    #[must_use]
    pub fn drag_offset(&self) -> Option<f64> {
        self.active_change(is_drag)
            .map(|state| state.provisional().start_time - state.original().start_time)
    }

    /// Movement of the resized edge since the resize started.
    #[must_use]
    pub fn resize_offset(&self) -> Option<f64> {
        let state = self.active_change(ItemChangeKind::is_resize)?;
        let (original, provisional) = (state.original(), state.provisional());
        Some(match resize_edge(state.kind())? {
            ItemEdge::Start => provisional.start_time - original.start_time,
            ItemEdge::End => provisional.end_time - original.end_time,
        })
    }

    /// Starts dragging `item_id`. `pointer_value` is the pointer's time.
    ///
    /// Returns `false` when the item is not draggable. Any change already in
    /// progress is cancelled first.
    pub fn item_drag_start(&mut self, item_id: ItemId, pointer_value: f64) -> TimelineResult<bool> {
        let pointer_value = validate_position("pointer_value", pointer_value, unbounded())?;
        let (slot, item) = self.lookup_item(item_id)?;
        if !item.is_draggable {
            debug!(item_id = item_id.raw(), "item is not draggable");
            return Ok(false);
        }
        self.cancel_active_change("drag started");
        self.core.interaction.change = Some(ItemChangeState::new(
            ItemChangeKind::Drag,
            slot,
            item,
            pointer_value,
        ));
        debug!(item_id = item_id.raw(), pointer_value, "item drag start");
        Ok(true)
    }

    /// Moves the dragged item with the pointer.
    ///
    /// `pointer_group_pos` is the pointer's vertical content pixel and picks
    /// the target group. No-op while no drag is active.
    pub fn item_drag(&mut self, pointer_value: f64, pointer_group_pos: f64) -> TimelineResult<()> {
        let pointer_value = validate_position("pointer_value", pointer_value, unbounded())?;
        let pointer_group_pos =
            validate_position("pointer_group_pos", pointer_group_pos, unbounded())?;
        let Some(mut state) = self.active_change(is_drag).copied() else {
            return Ok(());
        };

        let original = state.original();
        let start = snap_time(
            original.start_time + (pointer_value - state.pointer_origin()),
            self.core.config.time_snap,
        );
        let raw = TimeRange::new(start, start + original.range().duration());
        let range = if state.is_new_proposal(raw) {
            let validated = match &self.core.interaction.drag_validator {
                Some(validator) => {
                    validate_proposal("drag validator", validator.validate_drag(&original, raw))?
                }
                None => raw,
            };
            state.record_proposal(raw);
            validated
        } else {
            state.provisional().range()
        };

        let group_id = self
            .group_slot_at_pos(pointer_group_pos)
            .map_or(original.group_id, |slot| self.core.model.groups[slot].id);
        let mut modified = original.with_range(range);
        modified.group_id = group_id;
        self.apply_provisional(state, modified);
        Ok(())
    }

    /// Commits the drag; returns and emits the change.
    pub fn item_drag_end(&mut self) -> Option<ItemChange> {
        self.finish_item_change(is_drag, true)
    }

    pub fn item_drag_cancel(&mut self) -> bool {
        self.finish_item_change(is_drag, false).is_some()
    }

    /// Starts moving one edge of `item_id`.
    ///
    /// Returns `false` when that edge is not resizable.
    pub fn item_resize_start(
        &mut self,
        item_id: ItemId,
        edge: ItemEdge,
        pointer_value: f64,
    ) -> TimelineResult<bool> {
        let pointer_value = validate_position("pointer_value", pointer_value, unbounded())?;
        let (slot, item) = self.lookup_item(item_id)?;
        let (resizable, kind) = match edge {
            ItemEdge::Start => (item.is_start_resizable, ItemChangeKind::ResizeStart),
            ItemEdge::End => (item.is_end_resizable, ItemChangeKind::ResizeEnd),
        };
        if !resizable {
            debug!(item_id = item_id.raw(), ?edge, "item edge is not resizable");
            return Ok(false);
        }
        self.cancel_active_change("resize started");
        self.core.interaction.change =
            Some(ItemChangeState::new(kind, slot, item, pointer_value));
        debug!(item_id = item_id.raw(), ?edge, pointer_value, "item resize start");
        Ok(true)
    }

    /// Moves the resized edge with the pointer. The item never inverts
    /// unless a validator says so.
    pub fn item_resize(&mut self, pointer_value: f64) -> TimelineResult<()> {
        let pointer_value = validate_position("pointer_value", pointer_value, unbounded())?;
        let Some(mut state) = self.active_change(ItemChangeKind::is_resize).copied() else {
            return Ok(());
        };
        let Some(edge) = resize_edge(state.kind()) else {
            return Ok(());
        };

        let original = state.original();
        let edge_time = match edge {
            ItemEdge::Start => original.start_time,
            ItemEdge::End => original.end_time,
        };
        let raw_time = snap_time(
            edge_time + (pointer_value - state.pointer_origin()),
            self.core.config.time_snap,
        );
        let raw = match edge {
            ItemEdge::Start => TimeRange::new(raw_time, original.end_time),
            ItemEdge::End => TimeRange::new(original.start_time, raw_time),
        };
        let range = if state.is_new_proposal(raw) {
            let validated = match &self.core.interaction.resize_validator {
                Some(validator) => validate_proposal(
                    "resize validator",
                    validator.validate_resize(&original, edge, raw_time),
                )?,
                None => clamp_edge(raw, edge),
            };
            state.record_proposal(raw);
            validated
        } else {
            state.provisional().range()
        };

        self.apply_provisional(state, original.with_range(range));
        Ok(())
    }

    pub fn item_resize_end(&mut self) -> Option<ItemChange> {
        self.finish_item_change(ItemChangeKind::is_resize, true)
    }

    pub fn item_resize_cancel(&mut self) -> bool {
        self.finish_item_change(ItemChangeKind::is_resize, false)
            .is_some()
    }

    /// Drops an active change without notifying observers of a commit.
    pub(super) fn discard_item_change(&mut self, reason: &'static str) {
        if let Some(state) = self.core.interaction.change.take() {
            debug!(
                item_id = state.original().id.raw(),
                reason, "item change discarded"
            );
        }
    }

    fn cancel_active_change(&mut self, reason: &'static str) {
        if let Some(change) = self.finish_item_change(|_| true, false) {
            debug!(kind = ?change.kind, reason, "previous item change cancelled");
        }
    }

    fn active_change(&self, accepts: impl Fn(ItemChangeKind) -> bool) -> Option<&ItemChangeState> {
        self.core
            .interaction
            .change
            .as_ref()
            .filter(|state| accepts(state.kind()))
    }

    fn lookup_item(&self, item_id: ItemId) -> TimelineResult<(usize, Item)> {
        self.item_slot(item_id)
            .and_then(|slot| {
                self.core
                    .model
                    .items
                    .get(slot)
                    .map(|item| (slot, *item))
            })
            .ok_or(TimelineError::UnknownItem(item_id.raw()))
    }

    fn apply_provisional(&mut self, mut state: ItemChangeState, modified: Item) {
        let previous_group = state.provisional_group();
        let changed = state.set_provisional(modified);
        self.core.interaction.change = Some(state);
        if !changed {
            return;
        }
        trace!(
            item_id = modified.id.raw(),
            start_time = modified.start_time,
            end_time = modified.end_time,
            group_id = modified.group_id.raw(),
            "provisional item updated"
        );
        self.invalidate_group_id(previous_group);
        self.invalidate_group_id(modified.group_id);
        self.emit_render_request();
    }

    fn finish_item_change(
        &mut self,
        accepts: impl Fn(ItemChangeKind) -> bool,
        commit: bool,
    ) -> Option<ItemChange> {
        let state = self.active_change(accepts).copied()?;
        self.core.interaction.change = None;
        self.invalidate_group_id(state.original().group_id);
        self.invalidate_group_id(state.provisional_group());

        let change = state.into_change();
        if commit {
            debug!(
                kind = ?change.kind,
                item_id = change.original.id.raw(),
                start_time = change.modified.start_time,
                end_time = change.modified.end_time,
                "item change committed"
            );
            self.emit_event(TimelineEvent::ItemChangeCommitted(change));
        } else {
            debug!(
                kind = ?change.kind,
                item_id = change.original.id.raw(),
                "item change cancelled"
            );
        }
        self.emit_render_request();
        Some(change)
    }
}

fn is_drag(kind: ItemChangeKind) -> bool {
    kind == ItemChangeKind::Drag
}

/// Edge moved by a resize; drags move both edges.
fn resize_edge(kind: ItemChangeKind) -> Option<ItemEdge> {
    match kind {
        ItemChangeKind::Drag => None,
        ItemChangeKind::ResizeStart => Some(ItemEdge::Start),
        ItemChangeKind::ResizeEnd => Some(ItemEdge::End),
    }
}

fn clamp_edge(raw: TimeRange, edge: ItemEdge) -> TimeRange {
    match edge {
        ItemEdge::Start => TimeRange::new(raw.start.min(raw.end), raw.end),
        ItemEdge::End => TimeRange::new(raw.start, raw.end.max(raw.start)),
    }
}

fn unbounded() -> Bounds {
    Bounds::inclusive(f64::NEG_INFINITY, f64::INFINITY)
}

/// Rejects validator output that is non-finite or inverted.
fn validate_proposal(name: &str, proposal: TimeRange) -> TimelineResult<TimeRange> {
    validate_position(&format!("{name} start_time"), proposal.start, unbounded())?;
    validate_position(&format!("{name} end_time"), proposal.end, unbounded())?;
    if proposal.start > proposal.end {
        return Err(TimelineError::IntervalExtrema {
            name: name.to_owned(),
            min: proposal.start,
            max: proposal.end,
        });
    }
    Ok(proposal)
}
