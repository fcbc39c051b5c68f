//! Shared fixtures for the integration suite.
//!
//! `World` assembles the three things a host hands the engine — catalog,
//! role table, locale text — and keeps assertions readable by exposing
//! filters and conflict lists as plain string vectors.

use kitbash::{
    Caliber, EngineConfig, Item, ItemCatalog, ItemId, ItemRole, LocaleText, RunSummary, Slot,
    SlotKind, SlotName, StaticRoles,
};

pub fn id(raw: &str) -> ItemId {
    ItemId(raw.to_string())
}

pub fn caliber(raw: &str) -> Caliber {
    Caliber(raw.to_string())
}

pub fn slot(name: &str, filter: &[&str]) -> Slot {
    Slot {
        name: SlotName(name.to_string()),
        filter: filter.iter().map(|raw| id(raw)).collect(),
    }
}

/// Item shipped with the base application.
pub fn original(name: &str) -> Item {
    Item {
        name: name.to_string(),
        resource_path: Some(format!("assets/content/items/{name}.bundle")),
        ..Item::default()
    }
}

/// Item introduced by external content.
pub fn foreign(name: &str) -> Item {
    Item {
        name: name.to_string(),
        resource_path: Some(format!("user/mods/{name}.bundle")),
        ..Item::default()
    }
}

pub struct World {
    pub catalog: ItemCatalog,
    pub roles: StaticRoles,
    pub locale: LocaleText,
}

impl World {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            catalog: ItemCatalog::new(),
            roles: StaticRoles::new(),
            locale: LocaleText::default(),
        }
    }

    pub fn add(&mut self, raw_id: &str, item: Item, roles: &[ItemRole]) {
        let item_id = id(raw_id);
        self.locale.set_name(&item_id, &item.name);
        self.roles.grant_all(item_id.clone(), roles.iter().cloned());
        self.catalog.insert(item_id, item);
    }

    pub fn run(&mut self, config: &EngineConfig) -> RunSummary {
        kitbash::run(&mut self.catalog, &self.roles, &self.locale, config)
    }

    /// Filter contents of a named slot, as raw id strings.
    pub fn filter_of(&self, owner: &str, kind: SlotKind, slot_name: &str) -> Vec<String> {
        let item = self.catalog.get(&id(owner)).expect("owner in catalog");
        let slot = item
            .slot_list(kind)
            .iter()
            .find(|slot| slot.name.as_str() == slot_name)
            .expect("slot on owner");
        slot.filter.iter().map(|entry| entry.0.clone()).collect()
    }

    pub fn conflicts_of(&self, owner: &str) -> Vec<String> {
        let item = self.catalog.get(&id(owner)).expect("owner in catalog");
        item.conflicting_items.iter().map(|entry| entry.0.clone()).collect()
    }
}
