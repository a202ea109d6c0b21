use thiserror::Error;
use tracing::debug;

use crate::item::{Item, ItemId, ItemInput};
use crate::storage::{ItemStorage, StorageError};
use crate::store::Store;

/// Every id up to `ItemId::MAX` has been handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no item ids left to assign")]
pub struct IdsExhausted;

/// The canonical in-memory item collection.
///
/// Holds the items in insertion order, the current selection and the id
/// assignment state. The registry never writes to storage on its own:
/// callers mirror each mutation through [`ItemStorage`], or write the whole
/// collection with [`Registry::flush`].
#[derive(Debug)]
pub struct Registry {
    items: Vec<Item>,
    current: Option<ItemId>,
    // None once the id space is used up.
    next_id: Option<ItemId>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            items: Vec::new(),
            current: None,
            next_id: Some(0),
        }
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry over an existing collection.
    ///
    /// Later items with an id already seen are dropped so that ids stay
    /// unique.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut registry = Registry::new();
        for item in items {
            if registry.get(item.id).is_some() {
                debug!(id = item.id, "dropping item with duplicate id");
                continue;
            }
            registry.next_id = registry
                .next_id
                .zip(item.id.checked_add(1))
                .map(|(next, after)| next.max(after));
            registry.items.push(item);
        }
        registry
    }

    /// Loads the registry from storage.
    pub fn load<S: Store>(storage: &ItemStorage<S>) -> Result<Self, StorageError<S::Error>> {
        Ok(Self::from_items(storage.load()?))
    }

    /// Writes the whole in-memory collection to storage.
    pub fn flush<S: Store>(&self, storage: &ItemStorage<S>) -> Result<(), StorageError<S::Error>> {
        storage.save(&self.items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a new item with a freshly assigned id and returns it.
    ///
    /// The id is one more than the largest id handed out since the registry
    /// was built or last cleared, or 0 for an empty collection. Deleting the
    /// newest item does not make its id available again until the registry
    /// is cleared or rebuilt from storage.
    ///
    /// Fails once an item with id `ItemId::MAX` has been seen.
    pub fn add(&mut self, input: ItemInput) -> Result<&Item, IdsExhausted> {
        let id = self.next_id.ok_or(IdsExhausted)?;
        self.next_id = id.checked_add(1);

        let (name, quantity) = input.into_parts();
        self.items.push(Item { id, name, quantity });
        debug!(id, "added item");
        Ok(&self.items[self.items.len() - 1])
    }

    /// Finds an item by id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Overwrites the name and quantity of the current item.
    ///
    /// Returns `None`, leaving the collection untouched, if nothing is
    /// selected or the selected item no longer exists.
    pub fn update(&mut self, input: ItemInput) -> Option<&Item> {
        let id = self.current?;
        let item = self.items.iter_mut().find(|item| item.id == id)?;

        let (name, quantity) = input.into_parts();
        item.name = name;
        item.quantity = quantity;
        debug!(id, "updated item");
        Some(&*item)
    }

    /// Removes the item with the given id. Missing ids are ignored.
    pub fn delete(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    /// Removes every item. The next added item gets id 0 again.
    pub fn clear_all(&mut self) {
        self.items.clear();
        self.current = None;
        self.next_id = Some(0);
    }

    /// Selects the item with the given id and returns it.
    ///
    /// Unknown ids leave the selection as it was.
    pub fn set_current(&mut self, id: ItemId) -> Option<&Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        self.current = Some(id);
        Some(&self.items[index])
    }

    /// Returns the selected item, if it still exists.
    pub fn current(&self) -> Option<&Item> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Sum of all quantities, recomputed on every call.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
