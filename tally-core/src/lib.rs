//! Tally keeps a running list of meals and their calorie counts.
//!
//! Core concepts:
//! - **Item**: one recorded entry (id, name, quantity)
//! - **Store**: a byte-oriented key-value backend
//! - **ItemStorage**: mirrors the whole item collection under a single store key
//! - **Registry**: the canonical in-memory collection, selection and total
//! - **Session**: pairs a registry with its storage and tracks add/edit mode
//!
//! # Example
//!
//! ```
//! use tally_core::{ItemInput, ItemStorage, MemoryStore, Registry};
//!
//! let storage = ItemStorage::new(MemoryStore::new());
//! let mut registry = Registry::load(&storage).unwrap();
//!
//! let item = registry.add(ItemInput::parse("Eggs", "300").unwrap()).unwrap().clone();
//! storage.append(&item).unwrap();
//!
//! assert_eq!(item.id, 0);
//! assert_eq!(registry.total_quantity(), 300);
//! ```
//!
//! # Concurrency
//!
//! Every mutation rewrites the whole stored collection. Two processes sharing
//! one store each work from the snapshot they loaded at startup, and the last
//! writer wins.

mod item;
mod registry;
mod session;
mod storage;
mod store;

pub use item::{InputError, Item, ItemId, ItemInput};
pub use registry::{IdsExhausted, Registry};
pub use session::{Mode, Session, SessionError};
pub use storage::{DEFAULT_ITEMS_KEY, ItemStorage, StorageError};
pub use store::{MemoryStore, Store};
