//! Item catalog wiring.
//!
//! This module holds the typed view over the host's item catalog: identity
//! newtypes, the item/slot records the engine reads and mutates, role
//! membership queries, and the per-pass derived indexes (clone edges,
//! caliber groups). Everything downstream consumes the catalog through
//! these types.

pub mod identity;
pub mod index;
pub mod model;
pub mod roles;

pub use identity::{Caliber, ItemId, ItemOrigin, ItemRole, SlotName};
pub use index::{CaliberIndex, CloneIndex};
pub use model::{
    Item, ItemCatalog, ORIGINAL_RESOURCE_PREFIX, Slot, SlotKind, load_catalog_from_path,
    origin_of,
};
pub use roles::{RoleProvider, StaticRoles};
