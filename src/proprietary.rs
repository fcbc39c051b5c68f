//! Closed-slot detection and the deny set derived from it.
//!
//! A filter that accepts nothing, or nothing Original, marks a slot as
//! proprietary: it was authored for one content pack's items and must not
//! receive automatic grants. Items offered *only* through such slots form
//! the [`ProprietarySet`], which the grant rules refuse to broadcast into
//! other filters. The whitelist exempts slot owners at grant time; it does
//! not participate in the set computation.

use crate::catalog::identity::{ItemId, ItemOrigin};
use crate::catalog::model::{ItemCatalog, origin_of};
use std::collections::BTreeSet;

/// A filter is proprietary when it is empty or every id in it is Foreign.
///
/// Ids that resolve to no catalog entry count as Foreign, so a filter full
/// of dangling references stays closed.
pub fn is_proprietary_filter(catalog: &ItemCatalog, filter: &[ItemId]) -> bool {
    filter.is_empty()
        || filter
            .iter()
            .all(|id| origin_of(catalog, id) == ItemOrigin::Foreign)
}

/// Foreign items reachable only through closed slots.
#[derive(Debug, Default)]
pub struct ProprietarySet {
    ids: BTreeSet<ItemId>,
}

impl ProprietarySet {
    /// Two-stage computation over the given slotted items.
    ///
    /// Stage one collects every id a proprietary slot accepts; stage two
    /// removes anything an open slot elsewhere also accepts. An item that is
    /// legitimately reachable through any open slot is safe to propagate.
    pub fn build(catalog: &ItemCatalog, slotted: &[ItemId]) -> Self {
        let mut candidates: BTreeSet<ItemId> = BTreeSet::new();
        let mut openly_accepted: BTreeSet<ItemId> = BTreeSet::new();

        for owner in slotted {
            let Some(item) = catalog.get(owner) else {
                continue;
            };
            for (_kind, slots) in item.slot_groups() {
                for slot in slots {
                    if is_proprietary_filter(catalog, &slot.filter) {
                        candidates.extend(slot.filter.iter().cloned());
                    } else {
                        openly_accepted.extend(slot.filter.iter().cloned());
                    }
                }
            }
        }

        Self {
            ids: candidates.difference(&openly_accepted).cloned().collect(),
        }
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Members in id order, for diagnostics.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::identity::SlotName;
    use crate::catalog::model::{Item, Slot};

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

    fn slot(name: &str, filter: &[&str]) -> Slot {
        Slot {
            name: SlotName(name.to_string()),
            filter: filter.iter().map(|raw| id(raw)).collect(),
        }
    }

    #[test]
    fn empty_and_foreign_only_filters_are_proprietary() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(id("base_part"), original("part"));
        catalog.insert(id("mod_part"), foreign("part_x"));

        assert!(is_proprietary_filter(&catalog, &[]));
        assert!(is_proprietary_filter(&catalog, &[id("mod_part")]));
        assert!(is_proprietary_filter(&catalog, &[id("dangling")]));
        assert!(!is_proprietary_filter(&catalog, &[id("mod_part"), id("base_part")]));
    }

    #[test]
    fn openly_accepted_items_escape_the_set() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(id("base_part"), original("part"));
        catalog.insert(id("mod_only"), foreign("closed_part"));
        catalog.insert(id("mod_shared"), foreign("shared_part"));

        let mut closed_owner = foreign("closed_gun");
        closed_owner.slots = vec![slot("mod_stock", &["mod_only", "mod_shared"])];
        catalog.insert(id("gun_closed"), closed_owner);

        let mut open_owner = original("open_gun");
        open_owner.slots = vec![slot("mod_stock", &["base_part", "mod_shared"])];
        catalog.insert(id("gun_open"), open_owner);

        let slotted = vec![id("gun_closed"), id("gun_open")];
        let set = ProprietarySet::build(&catalog, &slotted);

        // mod_only is offered nowhere else; mod_shared also sits in an open slot.
        assert!(set.contains(&id("mod_only")));
        assert!(!set.contains(&id("mod_shared")));
        assert!(!set.contains(&id("base_part")));
    }

    #[test]
    fn owners_missing_from_catalog_are_skipped() {
        let catalog = ItemCatalog::new();
        let set = ProprietarySet::build(&catalog, &[id("ghost")]);
        assert!(set.is_empty());
    }
}
