use alloc::vec::Vec;

/// Owns the ordered item sequence.
///
/// The engine never copies or inspects items beyond handing references to the
/// render bridge. All index-taking operations are bounds-checked no-ops on bad
/// input: the engine is driven by asynchronous, possibly stale indices from
/// host callbacks, and a stale index must not panic.
#[derive(Clone, Debug, Default)]
pub(crate) struct ItemStore<T> {
    items: Vec<T>,
}

impl<T> ItemStore<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub(crate) fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Replaces the item at `index`. Returns `false` on out-of-range.
    pub(crate) fn set(&mut self, index: usize, item: T) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Inserts at `index` (`index == len` appends). Returns `false` on
    /// out-of-range.
    pub(crate) fn insert(&mut self, index: usize, item: T) -> bool {
        if index > self.items.len() {
            return false;
        }
        self.items.insert(index, item);
        true
    }

    /// Removes the item at `index`. Returns `false` on out-of-range.
    pub(crate) fn remove(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    pub(crate) fn append(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        let before = self.items.len();
        self.items.extend(items);
        self.items.len() - before
    }

    pub(crate) fn prepend(&mut self, items: Vec<T>) -> usize {
        let added = items.len();
        self.items.splice(0..0, items);
        added
    }
}
