//! Role membership queries.
//!
//! The host classifies items polymorphically (an item can be both a weapon
//! and a magazine); the engine only ever asks membership questions, so the
//! seam is a single-method trait. `StaticRoles` is the table-backed
//! implementation for hosts that precompute membership and for tests.

use crate::catalog::identity::{ItemId, ItemRole};
use std::collections::{BTreeMap, BTreeSet};

pub trait RoleProvider {
    /// Returns true when the item carries the given role tag.
    fn has_role(&self, id: &ItemId, role: &ItemRole) -> bool;
}

/// Precomputed role table.
#[derive(Debug, Default)]
pub struct StaticRoles {
    roles: BTreeMap<ItemId, BTreeSet<ItemRole>>,
}

impl StaticRoles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, id: ItemId, role: ItemRole) {
        self.roles.entry(id).or_default().insert(role);
    }

    pub fn grant_all<I>(&mut self, id: ItemId, roles: I)
    where
        I: IntoIterator<Item = ItemRole>,
    {
        self.roles.entry(id).or_default().extend(roles);
    }
}

impl RoleProvider for StaticRoles {
    fn has_role(&self, id: &ItemId, role: &ItemRole) -> bool {
        self.roles.get(id).is_some_and(|set| set.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_per_item_and_per_role() {
        let mut roles = StaticRoles::new();
        let mag = ItemId("mag_a".to_string());
        roles.grant_all(mag.clone(), [ItemRole::Weapon, ItemRole::Magazine]);

        assert!(roles.has_role(&mag, &ItemRole::Magazine));
        assert!(roles.has_role(&mag, &ItemRole::Weapon));
        assert!(!roles.has_role(&mag, &ItemRole::Ammunition));
        assert!(!roles.has_role(&ItemId("other".to_string()), &ItemRole::Weapon));
    }
}
