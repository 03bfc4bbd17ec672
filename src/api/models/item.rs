use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Payload accepted by the create and update routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BaseItem {
    pub name: String,
    /// Price in minor currency units (e.g. cents).
    pub price: i64,
    pub description: String,
    pub image: String,
}

/// A stored item: the base payload plus its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: String,
    #[serde(flatten)]
    pub base: BaseItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("price must not be negative (got {0})")]
    NegativePrice(i64),
}

impl BaseItem {
    pub fn new(
        name: impl Into<String>,
        price: i64,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            description: description.into(),
            image: image.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if self.price < 0 {
            return Err(ItemValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}

impl Item {
    pub fn new(id: impl Into<String>, base: BaseItem) -> Self {
        Self {
            id: id.into(),
            base,
        }
    }

    /// Build an item with a freshly generated identifier.
    pub fn with_generated_id(base: BaseItem) -> Self {
        Self::new(Uuid::new_v4().to_string(), base)
    }
}
