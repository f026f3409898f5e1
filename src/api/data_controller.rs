use tracing::{debug, trace};

use crate::core::validation::validate_size;
use crate::core::{Group, GroupId, Item, ItemId};
use crate::error::{Bounds, TimelineResult};
use crate::extensions::TimelineEvent;

use super::group_index_rebuild::{GroupIndexRebuild, GroupItemIndex};
use super::{RebuildPoll, VirtualizationIndex};

impl VirtualizationIndex {
    /// Replaces the item list and starts a group index rebuild.
    ///
    /// Any drag or resize in progress is cancelled; its item slot no longer
    /// refers to the same item.
    pub fn set_items(&mut self, items: Vec<Item>) {
        debug!(count = items.len(), "set timeline items");
        self.discard_item_change("items replaced");
        self.core.model.items = items;
        self.start_group_index_rebuild();
    }

    /// Replaces the group list and starts a group index rebuild.
    pub fn set_groups(&mut self, groups: Vec<Group>) -> TimelineResult<()> {
        for group in &groups {
            if let Some(line_size) = group.line_size {
                validate_size("line_size", line_size, Bounds::non_negative())?;
            }
        }
        debug!(count = groups.len(), "set timeline groups");
        self.discard_item_change("groups replaced");

        let model = &mut self.core.model;
        model.group_slots.clear();
        for (slot, group) in groups.iter().enumerate() {
            model.group_slots.entry(group.id).or_insert(slot);
        }
        model.groups = groups;
        self.start_group_index_rebuild();
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.core.model.items
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.core.model.groups
    }

    #[must_use]
    pub fn items_len(&self) -> usize {
        self.core.model.items.len()
    }

    #[must_use]
    pub fn groups_len(&self) -> usize {
        self.core.model.groups.len()
    }

    #[must_use]
    pub fn group_slot(&self, group_id: GroupId) -> Option<usize> {
        self.core.model.group_slots.get(&group_id).copied()
    }

    /// Item list slots belonging to `group_id`, in item list order.
    ///
    /// Empty until the group index rebuild has completed.
    #[must_use]
    pub fn group_item_slots(&self, group_id: GroupId) -> &[usize] {
        self.core.model.group_index.items_in(group_id)
    }

    #[must_use]
    pub fn is_group_index_ready(&self) -> bool {
        self.core.model.group_index_ready
    }

    #[must_use]
    pub fn rebuild_generation(&self) -> u64 {
        self.core.runtime.rebuild_generation
    }

    /// Indexes the next chunk of at most `index_chunk_size` items.
    ///
    /// Hosts call this from their scheduler until it stops returning
    /// `Pending`. Completion installs the index, drops cached layouts and
    /// emits `GroupIndexRebuilt` followed by `RenderRequest`.
    pub fn poll_group_index(&mut self) -> RebuildPoll {
        let Some(mut task) = self.core.runtime.rebuild.take() else {
            return RebuildPoll::Idle;
        };
        let chunk_size = self.core.config.index_chunk_size;
        let total = self.core.model.items.len();
        if !task.step(&self.core.model.items, chunk_size) {
            let processed = task.processed();
            trace!(
                generation = task.generation(),
                processed,
                total,
                "group index rebuild progress"
            );
            self.core.runtime.rebuild = Some(task);
            return RebuildPoll::Pending { processed, total };
        }

        let generation = task.generation();
        let index = task.into_index();
        debug!(
            generation,
            groups = index.group_count(),
            items = total,
            "group index rebuild complete"
        );
        self.core.model.group_index = index;
        self.core.model.group_index_ready = true;
        self.core.layout.invalidate_layouts();
        self.emit_event(TimelineEvent::GroupIndexRebuilt {
            generation,
            groups_len: self.core.model.groups.len(),
            items_len: total,
        });
        self.emit_render_request();
        RebuildPoll::Ready { generation }
    }

    /// Drives the pending rebuild to completion.
    pub fn rebuild_group_index_now(&mut self) -> RebuildPoll {
        let mut poll = self.poll_group_index();
        while matches!(poll, RebuildPoll::Pending { .. }) {
            poll = self.poll_group_index();
        }
        poll
    }

    pub(super) fn item_slot(&self, item_id: ItemId) -> Option<usize> {
        if self.core.model.group_index_ready {
            return self.core.model.group_index.item_slot(item_id);
        }
        self.core.model.items.iter().position(|item| item.id == item_id)
    }

    fn start_group_index_rebuild(&mut self) {
        let runtime = &mut self.core.runtime;
        runtime.rebuild_generation += 1;
        let generation = runtime.rebuild_generation;
        if let Some(stale) = runtime.rebuild.replace(GroupIndexRebuild::new(generation)) {
            debug!(
                stale_generation = stale.generation(),
                processed = stale.processed(),
                generation,
                "superseding group index rebuild"
            );
        }
        self.core.model.group_index = GroupItemIndex::default();
        self.core.model.group_index_ready = false;
        self.core.layout.reset(self.core.model.groups.len());
    }
}
