use tally_core::{ItemId, SessionError};
use thiserror::Error;

use crate::store::AnyStoreError;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] AnyStoreError),

    #[error(transparent)]
    Session(#[from] SessionError<AnyStoreError>),

    #[error("Meal not found: #{0}")]
    ItemNotFound(ItemId),
}
