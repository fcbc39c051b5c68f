//! Compatibility inference and propagation engine for game item catalogs.
//!
//! Items added by external content packs only interoperate with items from
//! the same pack, because slot filters and conflict lists are authored
//! against a closed id set. This crate infers the relationships nobody
//! declared — clone edges by exact name match, caliber groups, closed-slot
//! protection — and propagates grants and restrictions across them, mutating
//! the caller's catalog in place over at most two passes.
//!
//! The host supplies the catalog, a role-membership query, reference text
//! for diagnostics, and a configuration value; [`engine::run`] returns the
//! per-pass and total edit counters. The engine itself never fails and
//! performs no I/O; the `load_*_from_path` helpers exist for hosts that keep
//! these documents on disk.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod locale;
pub mod manual;
pub mod propagate;
pub mod proprietary;

pub use catalog::{
    Caliber, CaliberIndex, CloneIndex, Item, ItemCatalog, ItemId, ItemOrigin, ItemRole,
    ORIGINAL_RESOURCE_PREFIX, RoleProvider, Slot, SlotKind, SlotName, StaticRoles,
    load_catalog_from_path, origin_of,
};
pub use config::{EngineConfig, ManualAddEntry, load_config_from_path};
pub use engine::{PassOutcome, RunSummary, run};
pub use locale::{LocaleText, UNKNOWN_NAME};
pub use propagate::{GrantCounters, PassContext};
pub use proprietary::{ProprietarySet, is_proprietary_filter};
