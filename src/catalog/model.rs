//! Deserializable representation of the item catalog handed over by the host.
//!
//! The types mirror the fields the engine reads: names for clone detection,
//! resource paths for origin classification, slot filters, calibers, and
//! conflict lists. Anything else the host stores on an item is none of the
//! engine's business and is not modeled. All fields default so partial host
//! records degrade to empty lists rather than parse errors.

use crate::catalog::identity::{Caliber, ItemId, ItemOrigin, SlotName};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Resource paths under this prefix mark items shipped with the base
/// application; everything else is external content.
pub const ORIGINAL_RESOURCE_PREFIX: &str = "assets/content/";

/// Item catalog keyed by id.
///
/// Iteration order is id order, which keeps clone resolution, caliber
/// grouping, and every grant rule deterministic across runs.
pub type ItemCatalog = BTreeMap<ItemId, Item>;

/// The three slot collections an item may carry.
///
/// Chambers and cartridges exist only on weapons and magazines and accept
/// ammunition; general slots accept attachments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotKind {
    General,
    Chamber,
    Cartridge,
}

impl SlotKind {
    pub const ALL: [SlotKind; 3] = [SlotKind::General, SlotKind::Chamber, SlotKind::Cartridge];

    /// Short label used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::General => "slot",
            SlotKind::Chamber => "chamber",
            SlotKind::Cartridge => "cartridge",
        }
    }
}

/// Named attachment point holding an ordered, duplicate-free accepted-id list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Slot {
    pub name: SlotName,
    #[serde(default)]
    pub filter: Vec<ItemId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
/// One catalog entry. The id lives in the catalog key, not on the record.
pub struct Item {
    pub name: String,
    pub resource_path: Option<String>,
    /// Caliber declared on ammunition.
    pub caliber: Option<Caliber>,
    /// Caliber a weapon chambers; some ammunition is authored against this
    /// field instead of `caliber`.
    pub ammo_caliber: Option<Caliber>,
    pub slots: Vec<Slot>,
    pub chambers: Vec<Slot>,
    pub cartridges: Vec<Slot>,
    pub conflicting_items: Vec<ItemId>,
}

impl Item {
    /// Origin classification is a pure function of the resource path; a
    /// missing path classifies as Foreign.
    pub fn origin(&self) -> ItemOrigin {
        match &self.resource_path {
            Some(path) if path.starts_with(ORIGINAL_RESOURCE_PREFIX) => ItemOrigin::Original,
            _ => ItemOrigin::Foreign,
        }
    }

    pub fn is_original(&self) -> bool {
        self.origin() == ItemOrigin::Original
    }

    /// Caliber grouping key for a round, falling back to the weapon-side
    /// field when the round was authored against it.
    pub fn round_caliber(&self) -> Option<&Caliber> {
        self.caliber.as_ref().or(self.ammo_caliber.as_ref())
    }

    pub fn slot_list(&self, kind: SlotKind) -> &[Slot] {
        match kind {
            SlotKind::General => &self.slots,
            SlotKind::Chamber => &self.chambers,
            SlotKind::Cartridge => &self.cartridges,
        }
    }

    pub fn slot_list_mut(&mut self, kind: SlotKind) -> &mut Vec<Slot> {
        match kind {
            SlotKind::General => &mut self.slots,
            SlotKind::Chamber => &mut self.chambers,
            SlotKind::Cartridge => &mut self.cartridges,
        }
    }

    /// All slot collections in a fixed order: general, chambers, cartridges.
    pub fn slot_groups(&self) -> impl Iterator<Item = (SlotKind, &[Slot])> {
        SlotKind::ALL.into_iter().map(|kind| (kind, self.slot_list(kind)))
    }
}

/// Origin of a referenced id; ids that resolve to no catalog entry count as
/// Foreign, so dangling references never open a slot.
pub fn origin_of(catalog: &ItemCatalog, id: &ItemId) -> ItemOrigin {
    catalog.get(id).map(Item::origin).unwrap_or(ItemOrigin::Foreign)
}

/// Read and parse an item catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<ItemCatalog> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let catalog: ItemCatalog = serde_json::from_str(&data)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(catalog)
}
