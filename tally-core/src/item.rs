use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of an item, unique within a live collection.
pub type ItemId = u64;

/// A single recorded entry: a meal name and its calorie count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: i64,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, quantity: i64) -> Self {
        Item {
            id,
            name: name.into(),
            quantity,
        }
    }
}

/// Error type for rejected form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("quantity must not be empty")]
    EmptyQuantity,
    #[error("quantity is not a whole number: {0:?}")]
    InvalidQuantity(String),
}

/// Validated `{name, quantity}` input for adding or updating an item.
///
/// The only way to build one is [`ItemInput::parse`], so an invalid name or
/// quantity never reaches the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    name: String,
    quantity: i64,
}

impl ItemInput {
    /// Parses raw form text. Both fields are trimmed first.
    pub fn parse(name: &str, quantity_text: &str) -> Result<Self, InputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InputError::EmptyName);
        }

        let quantity_text = quantity_text.trim();
        if quantity_text.is_empty() {
            return Err(InputError::EmptyQuantity);
        }
        let quantity = quantity_text
            .parse::<i64>()
            .map_err(|_| InputError::InvalidQuantity(quantity_text.to_string()))?;

        Ok(ItemInput {
            name: name.to_string(),
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub(crate) fn into_parts(self) -> (String, i64) {
        (self.name, self.quantity)
    }
}
