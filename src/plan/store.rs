use slotmap::{Key, SecondaryMap, SlotMap};

/// Arena of plan items with a draw order.
///
/// Deleted items stay in the arena, flagged as discarded, so that ids
/// captured by undoable edits stay valid and a deleted item can be restored
/// at its former index. Discarded items are invisible to [`ItemStore::get`]
/// and [`ItemStore::get_mut`].
#[derive(Debug, Clone)]
pub struct ItemStore<K: Key, V> {
    arena: SlotMap<K, V>,
    order: Vec<K>,
    discarded: SecondaryMap<K, ()>,
}

impl<K: Key, V> Default for ItemStore<K, V> {
    fn default() -> Self {
        Self {
            arena: SlotMap::with_key(),
            order: Vec::new(),
            discarded: SecondaryMap::new(),
        }
    }
}

impl<K: Key, V> ItemStore<K, V> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item at the end of the draw order and returns its id.
    pub fn insert(&mut self, value: V) -> K {
        let id = self.arena.insert(value);
        self.order.push(id);
        id
    }

    /// Inserts an item in the arena only. Used for pieces owned by a group.
    pub fn insert_detached(&mut self, value: V) -> K {
        self.arena.insert(value)
    }

    /// Returns the data of an item of the plan, `None` once it's deleted.
    #[must_use]
    pub fn get(&self, id: K) -> Option<&V> {
        if self.discarded.contains_key(id) {
            return None;
        }
        self.arena.get(id)
    }

    /// Mutable access to the data of an item of the plan.
    pub fn get_mut(&mut self, id: K) -> Option<&mut V> {
        if self.discarded.contains_key(id) {
            return None;
        }
        self.arena.get_mut(id)
    }

    /// Returns the item data, deleted or not. Meant for undo only.
    #[must_use]
    pub fn get_detached(&self, id: K) -> Option<&V> {
        self.arena.get(id)
    }

    /// Returns `true` if the item was deleted and not restored since.
    #[must_use]
    pub fn is_discarded(&self, id: K) -> bool {
        self.discarded.contains_key(id)
    }

    /// Returns `true` if the item is part of the draw order.
    #[must_use]
    pub fn contains(&self, id: K) -> bool {
        self.order.contains(&id)
    }

    /// Removes an item from the draw order, discards it and returns its
    /// former index.
    pub fn remove(&mut self, id: K) -> Option<usize> {
        let index = self.index_of(id)?;
        self.order.remove(index);
        self.discarded.insert(id, ());
        Some(index)
    }

    /// Puts back an item removed with [`ItemStore::remove`] at `index`.
    ///
    /// Does nothing if the id is unknown or already in the draw order.
    pub fn restore(&mut self, id: K, index: usize) {
        if self.arena.contains_key(id) && !self.contains(id) {
            let index = index.min(self.order.len());
            self.order.insert(index, id);
            self.discarded.remove(id);
        }
    }

    /// Discards an item stored with [`ItemStore::insert_detached`].
    ///
    /// Returns `false` if the item is unknown, drawn or already discarded.
    pub fn discard_detached(&mut self, id: K) -> bool {
        if !self.arena.contains_key(id) || self.contains(id) || self.is_discarded(id) {
            return false;
        }
        self.discarded.insert(id, ());
        true
    }

    /// Brings back an item discarded with [`ItemStore::discard_detached`].
    pub fn revive_detached(&mut self, id: K) {
        if !self.contains(id) {
            self.discarded.remove(id);
        }
    }

    /// Moves an item of the draw order to `index`.
    pub fn reorder(&mut self, id: K, index: usize) {
        if let Some(current) = self.index_of(id) {
            self.order.remove(current);
            let index = index.min(self.order.len());
            self.order.insert(index, id);
        }
    }

    /// Ids of the items in draw order.
    #[must_use]
    pub fn ids(&self) -> &[K] {
        &self.order
    }

    /// Index of the item in the draw order.
    #[must_use]
    pub fn index_of(&self, id: K) -> Option<usize> {
        self.order.iter().position(|&k| k == id)
    }

    /// Items in draw order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (K, &V)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.arena.get(id).map(|value| (id, value)))
    }

    /// Number of items in the draw order.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the draw order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    slotmap::new_key_type! {
        struct TestId;
    }

    #[test]
    fn removed_items_keep_their_id() {
        let mut store: ItemStore<TestId, &str> = ItemStore::new();
        let a = store.insert("a");
        let b = store.insert("b");
        let c = store.insert("c");
        assert_eq!(store.remove(b), Some(1));
        assert!(!store.contains(b));
        assert_eq!(store.get(b), None);
        assert!(store.get_mut(b).is_none());
        assert_eq!(store.get_detached(b), Some(&"b"));
        assert_eq!(store.ids(), &[a, c]);
        store.restore(b, 1);
        assert_eq!(store.ids(), &[a, b, c]);
        assert_eq!(store.get(b), Some(&"b"));
        store.restore(b, 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn detached_items_are_not_drawn() {
        let mut store: ItemStore<TestId, u32> = ItemStore::new();
        let child = store.insert_detached(7);
        assert!(!store.contains(child));
        assert_eq!(store.get(child), Some(&7));
        assert!(store.is_empty());
        assert!(store.discard_detached(child));
        assert_eq!(store.get(child), None);
        assert!(!store.discard_detached(child));
        store.revive_detached(child);
        assert_eq!(store.get(child), Some(&7));
    }

    #[test]
    fn reordered_items_stay_visible() {
        let mut store: ItemStore<TestId, u32> = ItemStore::new();
        let a = store.insert(1);
        let b = store.insert(2);
        store.reorder(b, 0);
        assert_eq!(store.ids(), &[b, a]);
        assert_eq!(store.get(b), Some(&2));
    }
}
