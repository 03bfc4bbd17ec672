// Models module - contains Item, BaseItem, the permission tags and the request principal

pub mod item;
pub mod permission;
pub mod principal;

pub use item::{BaseItem, Item, ItemValidationError};
pub use permission::ItemPermission;
pub use principal::Principal;
