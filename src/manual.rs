//! Manual override application.
//!
//! Configured attachment/target pairs are applied unconditionally, in order,
//! after the automatic rules. Every rejection is classified and non-fatal:
//! malformed entries and missing lookups warn, ordinary skips trace at debug
//! level, and processing always continues with the next entry.

use crate::catalog::identity::{ItemId, ItemRole, SlotName};
use crate::catalog::model::{ItemCatalog, SlotKind};
use crate::config::ManualAddEntry;
use crate::propagate::{GrantCounters, PassContext};
use crate::proprietary::is_proprietary_filter;
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Role tags consulted when an attachment declares no slots of its own.
const KNOWN_MOD_TYPES: &[&str] = &[
    "mod_foregrip",
    "mod_sight",
    "mod_magazine",
    "mod_muzzle",
    "mod_stock",
    "mod_barrel",
    "mod_handguard",
];

pub fn apply_manual_overrides(
    catalog: &mut ItemCatalog,
    ctx: &PassContext<'_>,
    counters: &mut GrantCounters,
    modified: &mut BTreeSet<ItemId>,
) {
    for entry in &ctx.config.manual_add {
        apply_entry(catalog, ctx, entry, counters, modified);
    }
}

fn apply_entry(
    catalog: &mut ItemCatalog,
    ctx: &PassContext<'_>,
    entry: &ManualAddEntry,
    counters: &mut GrantCounters,
    modified: &mut BTreeSet<ItemId>,
) {
    let pass = ctx.pass;
    let attachment_id = &entry.attachment_id;
    let target_id = &entry.target_item_id;

    if attachment_id.as_str().is_empty() || target_id.as_str().is_empty() {
        warn!("pass {pass}: manual add entry with an empty id rejected");
        return;
    }
    if !catalog.contains_key(attachment_id) {
        warn!("pass {pass}: manual add attachment {attachment_id} not found in catalog");
        return;
    }
    if !catalog.contains_key(target_id) {
        warn!("pass {pass}: manual add target {target_id} not found in catalog");
        return;
    }
    if !ctx.roles.has_role(attachment_id, &ItemRole::Attachment) {
        warn!(
            "pass {pass}: manual add attachment {attachment_id} ({}) is not an attachment",
            ctx.name_of(attachment_id)
        );
        return;
    }
    if ctx.config.blacklist.contains(attachment_id) || ctx.config.blacklist.contains(target_id) {
        if ctx.config.verbose_logging {
            debug!("pass {pass}: skipped manual add {attachment_id} -> {target_id}: blacklisted");
        }
        return;
    }

    let Some(mod_type) = infer_mod_type(catalog, ctx, attachment_id) else {
        warn!(
            "pass {pass}: could not determine mod type for attachment {attachment_id} ({})",
            ctx.name_of(attachment_id)
        );
        return;
    };

    let Some((kind, idx)) = find_named_slot(catalog, target_id, &mod_type) else {
        warn!(
            "pass {pass}: target {target_id} ({}) has no {} slot",
            ctx.name_of(target_id),
            mod_type.as_str()
        );
        return;
    };

    {
        let Some(target) = catalog.get(target_id) else {
            return;
        };
        let slot = &target.slot_list(kind)[idx];
        if is_proprietary_filter(catalog, &slot.filter)
            && !ctx.config.whitelist.contains(target_id)
        {
            if ctx.config.verbose_logging {
                debug!(
                    "pass {pass}: skipped manual add {attachment_id} to {target_id} slot {}: proprietary",
                    mod_type.as_str()
                );
            }
            return;
        }
        if slot.filter.contains(attachment_id) {
            if ctx.config.verbose_logging {
                debug!(
                    "pass {pass}: skipped manual add {attachment_id} to {target_id} slot {}: already accepted",
                    mod_type.as_str()
                );
            }
            return;
        }
    }

    let Some(target) = catalog.get_mut(target_id) else {
        return;
    };
    target.slot_list_mut(kind)[idx].filter.push(attachment_id.clone());
    modified.insert(target_id.clone());
    counters.manual_additions += 1;
    if ctx.config.verbose_logging {
        info!(
            "pass {pass}: manually added attachment {attachment_id} ({}) to {target_id} ({}) slot {}",
            ctx.name_of(attachment_id),
            ctx.name_of(target_id),
            mod_type.as_str()
        );
    }
}

/// The slot name a manual attachment should land in: its own first declared
/// slot, else the first known mod-type tag it carries as a role.
fn infer_mod_type(
    catalog: &ItemCatalog,
    ctx: &PassContext<'_>,
    attachment_id: &ItemId,
) -> Option<SlotName> {
    if let Some(first) = catalog.get(attachment_id).and_then(|item| item.slots.first()) {
        return Some(first.name.clone());
    }
    KNOWN_MOD_TYPES
        .iter()
        .find(|tag| ctx.roles.has_role(attachment_id, &ItemRole::Other((**tag).to_string())))
        .map(|tag| SlotName((*tag).to_string()))
}

fn find_named_slot(
    catalog: &ItemCatalog,
    target_id: &ItemId,
    name: &SlotName,
) -> Option<(SlotKind, usize)> {
    let target = catalog.get(target_id)?;
    for (kind, slots) in target.slot_groups() {
        if let Some(idx) = slots.iter().position(|slot| &slot.name == name) {
            return Some((kind, idx));
        }
    }
    None
}
