//! Derived indexes rebuilt at the start of every pass.
//!
//! Clone edges and caliber groups are views over the catalog's *current*
//! state. They are never cached across passes: pass 2 must see the filters
//! and conflicts pass 1 wrote. Both indexes use id-ordered maps so rebuilds
//! over identical state produce identical iteration.

use crate::catalog::identity::{Caliber, ItemId, ItemRole};
use crate::catalog::model::ItemCatalog;
use crate::catalog::roles::RoleProvider;
use std::collections::BTreeMap;

/// Clone edges inferred by exact name equality.
///
/// A Foreign item has at most one Original base; an Original may have any
/// number of Foreign clones. When several Originals share a name, the first
/// in catalog id order wins — deterministic, and deliberately left as the
/// original first-match behavior.
#[derive(Debug, Default)]
pub struct CloneIndex {
    item_to_base: BTreeMap<ItemId, ItemId>,
    base_to_clones: BTreeMap<ItemId, Vec<ItemId>>,
}

impl CloneIndex {
    /// Resolve clone edges for every Foreign weapon, attachment, and round.
    pub fn build(catalog: &ItemCatalog, roles: &dyn RoleProvider) -> Self {
        let mut originals_by_name: BTreeMap<&str, &ItemId> = BTreeMap::new();
        for (id, item) in catalog {
            if item.is_original() && !item.name.is_empty() {
                originals_by_name.entry(item.name.as_str()).or_insert(id);
            }
        }

        let mut index = Self::default();
        for (id, item) in catalog {
            if item.is_original() {
                continue;
            }
            let eligible = roles.has_role(id, &ItemRole::Weapon)
                || roles.has_role(id, &ItemRole::Attachment)
                || roles.has_role(id, &ItemRole::Ammunition);
            if !eligible {
                continue;
            }
            let Some(base) = originals_by_name.get(item.name.as_str()) else {
                continue;
            };
            index.item_to_base.insert(id.clone(), (*base).clone());
            let clones = index.base_to_clones.entry((*base).clone()).or_default();
            if !clones.contains(id) {
                clones.push(id.clone());
            }
        }
        index
    }

    /// The Original an item is presumed to replace, if resolved.
    pub fn base_of(&self, id: &ItemId) -> Option<&ItemId> {
        self.item_to_base.get(id)
    }

    /// Foreign clones of an Original item; empty for everything else.
    pub fn clones_of(&self, id: &ItemId) -> &[ItemId] {
        self.base_to_clones.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All `(foreign, base)` edges in foreign-id order.
    pub fn edges(&self) -> impl Iterator<Item = (&ItemId, &ItemId)> {
        self.item_to_base.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.item_to_base.is_empty()
    }
}

/// Ammunition grouped by caliber key, Original and Foreign alike.
#[derive(Debug, Default)]
pub struct CaliberIndex {
    by_caliber: BTreeMap<Caliber, Vec<ItemId>>,
}

impl CaliberIndex {
    pub fn build(catalog: &ItemCatalog, roles: &dyn RoleProvider) -> Self {
        let mut index = Self::default();
        for (id, item) in catalog {
            if !roles.has_role(id, &ItemRole::Ammunition) {
                continue;
            }
            let Some(caliber) = item.round_caliber() else {
                continue;
            };
            let rounds = index.by_caliber.entry(caliber.clone()).or_default();
            if !rounds.contains(id) {
                rounds.push(id.clone());
            }
        }
        index
    }

    /// Rounds of a caliber in catalog id order; empty when unknown.
    pub fn rounds(&self, caliber: &Caliber) -> &[ItemId] {
        self.by_caliber.get(caliber).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Item;
    use crate::catalog::roles::StaticRoles;

    fn id(raw: &str) -> ItemId {
        ItemId(raw.to_string())
    }

    fn original(name: &str) -> Item {
        Item {
            name: name.to_string(),
            resource_path: Some(format!("assets/content/{name}.bundle")),
            ..Item::default()
        }
    }

    fn foreign(name: &str) -> Item {
        Item {
            name: name.to_string(),
            resource_path: Some(format!("mods/{name}.bundle")),
            ..Item::default()
        }
    }

    #[test]
    fn clone_edges_match_by_exact_name() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(id("base_sight"), original("holo_sight"));
        catalog.insert(id("mod_sight_x"), foreign("holo_sight"));
        catalog.insert(id("mod_unrelated"), foreign("space_laser"));

        let mut roles = StaticRoles::new();
        roles.grant(id("mod_sight_x"), ItemRole::Attachment);
        roles.grant(id("mod_unrelated"), ItemRole::Attachment);

        let clones = CloneIndex::build(&catalog, &roles);
        assert_eq!(clones.base_of(&id("mod_sight_x")), Some(&id("base_sight")));
        assert_eq!(clones.clones_of(&id("base_sight")), &[id("mod_sight_x")]);
        // No original is named space_laser, so the item resolves nowhere.
        assert_eq!(clones.base_of(&id("mod_unrelated")), None);
    }

    #[test]
    fn name_collision_resolves_to_first_original_in_id_order() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(id("b_second"), original("shared_name"));
        catalog.insert(id("a_first"), original("shared_name"));
        catalog.insert(id("clone"), foreign("shared_name"));

        let mut roles = StaticRoles::new();
        roles.grant(id("clone"), ItemRole::Weapon);

        let clones = CloneIndex::build(&catalog, &roles);
        assert_eq!(clones.base_of(&id("clone")), Some(&id("a_first")));
    }

    #[test]
    fn items_without_eligible_roles_resolve_nowhere() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(id("base"), original("stock"));
        catalog.insert(id("clone"), foreign("stock"));

        let roles = StaticRoles::new();
        let clones = CloneIndex::build(&catalog, &roles);
        assert!(clones.is_empty());
    }

    #[test]
    fn caliber_groups_cover_both_origins_without_duplicates() {
        let mut catalog = ItemCatalog::new();
        let mut base_round = original("ball_round");
        base_round.caliber = Some(Caliber("Caliber762x39".to_string()));
        let mut mod_round = foreign("ap_round");
        // Authored against the weapon-side field only.
        mod_round.ammo_caliber = Some(Caliber("Caliber762x39".to_string()));
        catalog.insert(id("round_base"), base_round);
        catalog.insert(id("round_mod"), mod_round);

        let mut roles = StaticRoles::new();
        roles.grant(id("round_base"), ItemRole::Ammunition);
        roles.grant(id("round_mod"), ItemRole::Ammunition);

        let calibers = CaliberIndex::build(&catalog, &roles);
        let rounds = calibers.rounds(&Caliber("Caliber762x39".to_string()));
        assert_eq!(rounds, &[id("round_base"), id("round_mod")]);
        assert!(calibers.rounds(&Caliber("Caliber9x19".to_string())).is_empty());
    }
}
