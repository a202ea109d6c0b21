use thiserror::Error;
use tracing::{debug, instrument};

use crate::item::{Item, ItemId};
use crate::store::Store;

/// Key the item collection is stored under unless configured otherwise.
pub const DEFAULT_ITEMS_KEY: &str = "items";

/// Error type for persistence operations.
#[derive(Debug, Error)]
pub enum StorageError<E: std::error::Error + 'static> {
    #[error("store error: {0}")]
    Store(#[source] E),
    #[error("corrupt persisted state under key {key:?}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode items: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Durable mirror of the whole item collection.
///
/// The collection is kept as one JSON array under a single key. There are no
/// partial updates: every mutation reads the full collection, changes it and
/// writes the full collection back, so each call is linear in the number of
/// stored items.
pub struct ItemStorage<S> {
    store: S,
    key: String,
}

impl<S: Store> ItemStorage<S> {
    /// Creates an adapter that uses [`DEFAULT_ITEMS_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_ITEMS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        ItemStorage {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the stored collection, or an empty one if nothing is stored.
    ///
    /// Bytes that do not decode as an item array are reported as
    /// [`StorageError::Corrupt`] rather than dropped.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Result<Vec<Item>, StorageError<S::Error>> {
        let Some(bytes) = self.store.get(&self.key).map_err(StorageError::Store)? else {
            debug!("no stored items");
            return Ok(Vec::new());
        };

        let items: Vec<Item> =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
                key: self.key.clone(),
                source,
            })?;
        debug!(count = items.len(), "loaded items");
        Ok(items)
    }

    /// Overwrites the stored collection with `items`.
    #[instrument(skip(self, items), fields(key = %self.key, count = items.len()))]
    pub fn save(&self, items: &[Item]) -> Result<(), StorageError<S::Error>> {
        let bytes = serde_json::to_vec(items).map_err(StorageError::Encode)?;
        self.store
            .put(&self.key, &bytes)
            .map_err(StorageError::Store)?;
        debug!(bytes = bytes.len(), "wrote items");
        Ok(())
    }

    /// Adds `item` to the end of the stored collection.
    pub fn append(&self, item: &Item) -> Result<(), StorageError<S::Error>> {
        let mut items = self.load()?;
        items.push(item.clone());
        self.save(&items)
    }

    /// Replaces the stored entry with the same id as `item`.
    ///
    /// If no entry matches, the collection is written back unchanged.
    pub fn replace(&self, item: &Item) -> Result<(), StorageError<S::Error>> {
        let mut items = self.load()?;
        if let Some(slot) = items.iter_mut().find(|stored| stored.id == item.id) {
            *slot = item.clone();
        } else {
            debug!(id = item.id, "replace found no stored item");
        }
        self.save(&items)
    }

    /// Drops the stored entry with the given id, if any.
    pub fn remove(&self, id: ItemId) -> Result<(), StorageError<S::Error>> {
        let mut items = self.load()?;
        items.retain(|stored| stored.id != id);
        self.save(&items)
    }

    /// Deletes the key entirely.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn clear(&self) -> Result<(), StorageError<S::Error>> {
        self.store.delete(&self.key).map_err(StorageError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn storage() -> ItemStorage<MemoryStore> {
        ItemStorage::new(MemoryStore::new())
    }

    #[test]
    fn load_empty_store() {
        let storage = storage();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load() {
        let storage = storage();
        let item = Item::new(0, "Eggs", 300);

        storage.append(&item).unwrap();

        assert_eq!(storage.load().unwrap(), vec![item]);
    }

    #[test]
    fn append_preserves_order() {
        let storage = storage();
        storage.append(&Item::new(0, "Steak Dinner", 1200)).unwrap();
        storage.append(&Item::new(1, "Cookie", 400)).unwrap();

        let names: Vec<_> = storage.load().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["Steak Dinner", "Cookie"]);
    }

    #[test]
    fn replace_matching_item() {
        let storage = storage();
        storage.append(&Item::new(0, "Eggs", 300)).unwrap();
        storage.append(&Item::new(1, "Cookie", 400)).unwrap();

        storage.replace(&Item::new(0, "Scrambled Eggs", 350)).unwrap();

        let items = storage.load().unwrap();
        assert_eq!(items[0], Item::new(0, "Scrambled Eggs", 350));
        assert_eq!(items[1], Item::new(1, "Cookie", 400));
    }

    #[test]
    fn replace_unknown_id_leaves_collection() {
        let storage = storage();
        storage.append(&Item::new(0, "Eggs", 300)).unwrap();

        storage.replace(&Item::new(9, "Ghost", 1)).unwrap();

        assert_eq!(storage.load().unwrap(), vec![Item::new(0, "Eggs", 300)]);
    }

    #[test]
    fn remove_item() {
        let storage = storage();
        storage.append(&Item::new(0, "Eggs", 300)).unwrap();
        storage.append(&Item::new(1, "Cookie", 400)).unwrap();

        storage.remove(0).unwrap();

        let items = storage.load().unwrap();
        assert_eq!(items, vec![Item::new(1, "Cookie", 400)]);
    }

    #[test]
    fn clear_removes_key() {
        let storage = storage();
        storage.append(&Item::new(0, "Eggs", 300)).unwrap();

        storage.clear().unwrap();

        assert!(!storage.store().has(DEFAULT_ITEMS_KEY).unwrap());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_data_is_reported() {
        let storage = storage();
        storage.store().put(DEFAULT_ITEMS_KEY, b"{not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "items"));
    }

    #[test]
    fn custom_key() {
        let store = MemoryStore::new();
        let storage = ItemStorage::with_key(&store, "meals");

        storage.append(&Item::new(0, "Eggs", 300)).unwrap();

        assert!(store.has("meals").unwrap());
        assert!(!store.has(DEFAULT_ITEMS_KEY).unwrap());
    }
}
