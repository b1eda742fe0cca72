//! Map body with keys compared by value equality.

use super::stack_item::StackItem;

/// Entries are kept in insertion order so serialization is deterministic;
/// lookups ignore order.
#[derive(Clone, Default)]
pub struct StackMap {
    entries: Vec<(StackItem, StackItem)>,
}

impl StackMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &StackItem) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.equals(key))
    }

    pub fn get(&self, key: &StackItem) -> Option<&StackItem> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    pub fn contains_key(&self, key: &StackItem) -> bool {
        self.position(key).is_some()
    }

    /// Inserts or replaces; a replaced entry keeps its original slot.
    pub fn insert(&mut self, key: StackItem, value: StackItem) {
        match self.position(&key) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &StackItem) -> Option<StackItem> {
        self.position(key)
            .map(|index| self.entries.remove(index).1)
    }

    pub fn keys(&self) -> Vec<StackItem> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<StackItem> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (StackItem, StackItem)> {
        self.entries.iter()
    }
}
