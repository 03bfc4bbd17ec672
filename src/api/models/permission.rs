use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation tags guarding the mutating item routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemPermission {
    #[serde(rename = "create:items")]
    CreateItems,
    #[serde(rename = "update:items")]
    UpdateItems,
    #[serde(rename = "delete:items")]
    DeleteItems,
}

impl ItemPermission {
    pub const ALL: [ItemPermission; 3] = [
        ItemPermission::CreateItems,
        ItemPermission::UpdateItems,
        ItemPermission::DeleteItems,
    ];

    /// The permission string carried in access tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemPermission::CreateItems => "create:items",
            ItemPermission::UpdateItems => "update:items",
            ItemPermission::DeleteItems => "delete:items",
        }
    }
}

impl fmt::Display for ItemPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
