use super::item::ItemId;

/// Ordered set of selected items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    items: Vec<ItemId>,
    all_levels: bool,
}

impl Selection {
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the selection may contain items of other levels
    /// than the selected one.
    #[must_use]
    pub fn is_all_levels(&self) -> bool {
        self.all_levels
    }

    /// Replaces the selected items, dropping duplicates while keeping the
    /// first occurrence of each.
    pub(crate) fn set_items(&mut self, items: Vec<ItemId>) {
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        self.items = unique;
    }

    pub(crate) fn set_all_levels(&mut self, all_levels: bool) {
        self.all_levels = all_levels;
    }

    /// Removes `item` and returns `true` if it was selected.
    pub(crate) fn remove(&mut self, item: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|&i| i != item);
        before != self.items.len()
    }
}
