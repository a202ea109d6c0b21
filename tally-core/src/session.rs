use thiserror::Error;
use tracing::debug;

use crate::item::{InputError, Item, ItemId, ItemInput};
use crate::registry::{IdsExhausted, Registry};
use crate::storage::{ItemStorage, StorageError};
use crate::store::Store;

/// Error type for session operations.
#[derive(Debug, Error)]
pub enum SessionError<E: std::error::Error + 'static> {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error(transparent)]
    IdsExhausted(#[from] IdsExhausted),
    #[error("failed to mirror change to storage: {0}")]
    Storage(#[from] StorageError<E>),
}

/// Whether the front end is adding new items or editing a selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Add,
    Edit(ItemId),
}

/// Pairs a [`Registry`] with the [`ItemStorage`] it mirrors to.
///
/// Each method is one user intent: it validates raw input, mutates the
/// registry, then mirrors the change to storage. Rejected input comes back as
/// [`SessionError::Input`] before anything is touched; `Ok(None)` means there
/// was nothing to act on.
pub struct Session<S: Store> {
    registry: Registry,
    storage: ItemStorage<S>,
    mode: Mode,
}

impl<S: Store> Session<S> {
    /// Loads the registry from `storage` and starts in add mode.
    pub fn open(storage: ItemStorage<S>) -> Result<Self, SessionError<S::Error>> {
        let registry = Registry::load(&storage)?;
        debug!(count = registry.len(), "session opened");
        Ok(Session {
            registry,
            storage,
            mode: Mode::Add,
        })
    }

    /// Read access to the underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The storage every change is mirrored to.
    pub fn storage(&self) -> &ItemStorage<S> {
        &self.storage
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[Item] {
        self.registry.items()
    }

    /// Sum of all quantities.
    pub fn total(&self) -> i64 {
        self.registry.total_quantity()
    }

    /// Whether an item is being edited.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The item being edited, if any.
    pub fn current(&self) -> Option<&Item> {
        self.registry.current()
    }

    /// Records a new item and appends it to storage.
    pub fn submit_add(
        &mut self,
        name: &str,
        quantity_text: &str,
    ) -> Result<Item, SessionError<S::Error>> {
        let input = ItemInput::parse(name, quantity_text)?;

        let item = self.registry.add(input)?.clone();
        self.storage.append(&item)?;
        Ok(item)
    }

    /// Selects `id` for editing. Unknown ids leave the session unchanged.
    pub fn begin_edit(&mut self, id: ItemId) -> Option<Item> {
        let item = self.registry.set_current(id)?.clone();
        self.mode = Mode::Edit(id);
        Some(item)
    }

    /// Applies new input to the item being edited, then returns to add mode.
    ///
    /// Outside edit mode nothing changes and `Ok(None)` is returned. Invalid
    /// input is returned as an error and the edit stays open.
    pub fn submit_update(
        &mut self,
        name: &str,
        quantity_text: &str,
    ) -> Result<Option<Item>, SessionError<S::Error>> {
        if self.mode == Mode::Add {
            debug!("update requested with nothing selected");
            return Ok(None);
        }
        let input = ItemInput::parse(name, quantity_text)?;

        let Some(item) = self.registry.update(input).cloned() else {
            self.end_edit();
            return Ok(None);
        };
        self.end_edit();
        self.storage.replace(&item)?;
        Ok(Some(item))
    }

    /// Deletes the item being edited, then returns to add mode.
    pub fn submit_delete(&mut self) -> Result<Option<Item>, SessionError<S::Error>> {
        let Some(item) = self.registry.current().cloned() else {
            debug!("delete requested with nothing selected");
            self.end_edit();
            return Ok(None);
        };

        self.registry.delete(item.id);
        self.end_edit();
        self.storage.remove(item.id)?;
        Ok(Some(item))
    }

    /// Leaves edit mode without changing anything.
    pub fn back(&mut self) {
        self.end_edit();
    }

    /// Removes every item and deletes the stored collection.
    pub fn clear_all(&mut self) -> Result<(), SessionError<S::Error>> {
        self.registry.clear_all();
        self.mode = Mode::Add;
        self.storage.clear()?;
        Ok(())
    }

    fn end_edit(&mut self) {
        self.registry.clear_current();
        self.mode = Mode::Add;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session() -> Session<MemoryStore> {
        Session::open(ItemStorage::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn add_mirrors_to_storage() {
        let mut session = session();

        let item = session.submit_add("Eggs", "300").unwrap();

        assert_eq!(item, Item::new(0, "Eggs", 300));
        assert_eq!(session.storage().load().unwrap(), vec![item]);
        assert_eq!(session.total(), 300);
    }

    #[test]
    fn invalid_add_is_rejected() {
        let mut session = session();

        assert!(matches!(
            session.submit_add("", "300"),
            Err(SessionError::Input(InputError::EmptyName))
        ));
        assert!(matches!(
            session.submit_add("Eggs", "abc"),
            Err(SessionError::Input(InputError::InvalidQuantity(_)))
        ));

        assert!(session.items().is_empty());
        assert!(!session.storage().store().has("items").unwrap());
    }

    #[test]
    fn edit_then_update() {
        let mut session = session();
        session.submit_add("Cookie", "400").unwrap();

        let selected = session.begin_edit(0).unwrap();
        assert_eq!(selected.name, "Cookie");
        assert_eq!(session.mode(), Mode::Edit(0));

        let updated = session.submit_update("Cookies", "800").unwrap().unwrap();
        assert_eq!(updated, Item::new(0, "Cookies", 800));
        assert_eq!(session.mode(), Mode::Add);
        assert!(session.current().is_none());
        assert_eq!(session.storage().load().unwrap(), vec![updated]);
    }

    #[test]
    fn invalid_update_keeps_edit_state() {
        let mut session = session();
        session.submit_add("Cookie", "400").unwrap();
        session.begin_edit(0).unwrap();

        assert!(matches!(
            session.submit_update("Cookie", ""),
            Err(SessionError::Input(InputError::EmptyQuantity))
        ));

        assert_eq!(session.mode(), Mode::Edit(0));
        assert_eq!(session.items()[0].quantity, 400);
    }

    #[test]
    fn update_in_add_mode_is_ignored() {
        let mut session = session();
        session.submit_add("Cookie", "400").unwrap();

        assert!(session.submit_update("Cake", "900").unwrap().is_none());
        assert_eq!(session.items()[0].name, "Cookie");
    }

    #[test]
    fn begin_edit_unknown_id() {
        let mut session = session();
        assert!(session.begin_edit(7).is_none());
        assert_eq!(session.mode(), Mode::Add);
    }

    #[test]
    fn delete_current() {
        let mut session = session();
        session.submit_add("Steak Dinner", "1200").unwrap();
        session.submit_add("Cookie", "400").unwrap();
        session.begin_edit(1).unwrap();

        let deleted = session.submit_delete().unwrap().unwrap();

        assert_eq!(deleted.id, 1);
        assert_eq!(session.total(), 1200);
        assert_eq!(session.mode(), Mode::Add);
        assert_eq!(session.storage().load().unwrap().len(), 1);
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut session = session();
        session.submit_add("Cookie", "400").unwrap();

        assert!(session.submit_delete().unwrap().is_none());
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn back_clears_selection() {
        let mut session = session();
        session.submit_add("Cookie", "400").unwrap();
        session.begin_edit(0).unwrap();

        session.back();

        assert_eq!(session.mode(), Mode::Add);
        assert!(session.current().is_none());
    }

    #[test]
    fn clear_all_empties_both_copies() {
        let mut session = session();
        session.submit_add("Cookie", "400").unwrap();
        session.begin_edit(0).unwrap();

        session.clear_all().unwrap();

        assert!(session.items().is_empty());
        assert_eq!(session.total(), 0);
        assert_eq!(session.mode(), Mode::Add);
        assert!(session.storage().load().unwrap().is_empty());
    }

    #[test]
    fn add_with_exhausted_ids_leaves_storage() {
        let store = MemoryStore::new();
        ItemStorage::new(&store)
            .save(&[Item::new(ItemId::MAX, "Max", 1)])
            .unwrap();
        let mut session = Session::open(ItemStorage::new(&store)).unwrap();

        assert!(matches!(
            session.submit_add("Eggs", "300"),
            Err(SessionError::IdsExhausted(_))
        ));
        assert_eq!(session.storage().load().unwrap().len(), 1);
    }

    #[test]
    fn add_after_clear_starts_at_zero() {
        let mut session = session();
        session.submit_add("Cookie", "400").unwrap();
        session.submit_add("Cake", "900").unwrap();

        session.clear_all().unwrap();
        let item = session.submit_add("Eggs", "300").unwrap();

        assert_eq!(item.id, 0);
        assert_eq!(session.storage().load().unwrap(), vec![item]);
    }

    #[test]
    fn reopen_restores_items() {
        let store = MemoryStore::new();
        {
            let mut session = Session::open(ItemStorage::new(&store)).unwrap();
            session.submit_add("Eggs", "300").unwrap();
            session.submit_add("Cookie", "400").unwrap();
        }

        let session = Session::open(ItemStorage::new(&store)).unwrap();
        assert_eq!(session.items().len(), 2);
        assert_eq!(session.total(), 700);
    }
}
