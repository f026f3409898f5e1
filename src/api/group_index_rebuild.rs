use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{GroupId, Item, ItemId};

/// Outcome of one `poll_group_index` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebuildPoll {
    /// No rebuild is running.
    Idle,
    /// A chunk was indexed; more remain.
    Pending { processed: usize, total: usize },
    /// The rebuild tagged `generation` finished and its index is installed.
    Ready { generation: u64 },
}

/// Group membership and id lookup for the committed items.
///
/// Item references are slots into the item list so the index never clones
/// item payloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct GroupItemIndex {
    items_by_group: IndexMap<GroupId, Vec<usize>>,
    item_slots: HashMap<ItemId, usize>,
}

impl GroupItemIndex {
    #[must_use]
    pub(super) fn items_in(&self, group_id: GroupId) -> &[usize] {
        self.items_by_group
            .get(&group_id)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub(super) fn item_slot(&self, item_id: ItemId) -> Option<usize> {
        self.item_slots.get(&item_id).copied()
    }

    #[must_use]
    pub(super) fn group_count(&self) -> usize {
        self.items_by_group.len()
    }

    pub(super) fn group_item_counts(&self) -> impl Iterator<Item = (GroupId, usize)> + '_ {
        self.items_by_group
            .iter()
            .map(|(group_id, slots)| (*group_id, slots.len()))
    }

    fn insert(&mut self, slot: usize, item: &Item) {
        self.items_by_group
            .entry(item.group_id)
            .or_default()
            .push(slot);
        self.item_slots.entry(item.id).or_insert(slot);
    }
}

/// Cooperative group index build over one snapshot of the item list.
///
/// The owner replaces the task wholesale when the items change, so a
/// superseded task is simply dropped before its next chunk.
#[derive(Debug)]
pub(super) struct GroupIndexRebuild {
    generation: u64,
    cursor: usize,
    index: GroupItemIndex,
}

impl GroupIndexRebuild {
    #[must_use]
    pub(super) fn new(generation: u64) -> Self {
        Self {
            generation,
            cursor: 0,
            index: GroupItemIndex::default(),
        }
    }

    #[must_use]
    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub(super) fn processed(&self) -> usize {
        self.cursor
    }

    /// Indexes at most `chunk_size` further items. Returns `true` once every
    /// item has been indexed.
    pub(super) fn step(&mut self, items: &[Item], chunk_size: usize) -> bool {
        let end = self
            .cursor
            .saturating_add(chunk_size.max(1))
            .min(items.len());
        for (offset, item) in items[self.cursor..end].iter().enumerate() {
            self.index.insert(self.cursor + offset, item);
        }
        self.cursor = end;
        self.cursor == items.len()
    }

    #[must_use]
    pub(super) fn into_index(self) -> GroupItemIndex {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::GroupIndexRebuild;
    use crate::core::{GroupId, Item, ItemId};

    fn item(id: u64, group: u64) -> Item {
        Item::new(ItemId::new(id), GroupId::new(group), 0.0, 1.0)
    }

    #[test]
    fn step_processes_bounded_chunks() {
        let items: Vec<Item> = (0..5).map(|id| item(id, id % 2)).collect();
        let mut task = GroupIndexRebuild::new(1);

        assert!(!task.step(&items, 2));
        assert_eq!(task.processed(), 2);
        assert!(!task.step(&items, 2));
        assert!(task.step(&items, 2));
        assert_eq!(task.processed(), 5);

        let index = task.into_index();
        assert_eq!(index.items_in(GroupId::new(0)), &[0, 2, 4]);
        assert_eq!(index.items_in(GroupId::new(1)), &[1, 3]);
        assert!(index.items_in(GroupId::new(9)).is_empty());
        assert_eq!(index.item_slot(ItemId::new(3)), Some(3));
    }

    #[test]
    fn empty_item_list_finishes_immediately() {
        let mut task = GroupIndexRebuild::new(7);
        assert!(task.step(&[], 10));
        assert_eq!(task.generation(), 7);
        assert_eq!(task.into_index().group_count(), 0);
    }

    #[test]
    fn duplicate_item_ids_resolve_to_first_slot() {
        let items = vec![item(1, 0), item(1, 1)];
        let mut task = GroupIndexRebuild::new(1);
        assert!(task.step(&items, 100));
        assert_eq!(task.into_index().item_slot(ItemId::new(1)), Some(0));
    }
}
