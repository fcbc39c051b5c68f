//! Automatic compatibility propagation.
//!
//! Three rule families run in order each pass: caliber-matched round grants
//! into chambers and cartridges, clone grants into attachment slots, and
//! conflict-list inheritance along clone edges. All three only ever append;
//! existing filter and conflict entries are never removed or reordered, and
//! no id is appended twice. Rules read proprietariness from the live catalog,
//! so each grant is planned against an immutable view and applied afterwards.

use crate::catalog::identity::{ItemId, ItemOrigin, ItemRole, SlotName};
use crate::catalog::index::{CaliberIndex, CloneIndex};
use crate::catalog::model::{ItemCatalog, SlotKind, origin_of};
use crate::catalog::roles::RoleProvider;
use crate::config::EngineConfig;
use crate::locale::LocaleText;
use crate::proprietary::{ProprietarySet, is_proprietary_filter};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;

/// Counts of every edit category a pass can make.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct GrantCounters {
    pub ammo_to_chambers: usize,
    pub ammo_to_cartridges: usize,
    pub attachments_to_slots: usize,
    pub base_conflicts_inherited: usize,
    pub clone_conflicts_inherited: usize,
    pub conflicts_voided: usize,
    pub manual_additions: usize,
}

impl GrantCounters {
    /// Fold another pass's counts into this one.
    pub fn absorb(&mut self, other: GrantCounters) {
        self.ammo_to_chambers += other.ammo_to_chambers;
        self.ammo_to_cartridges += other.ammo_to_cartridges;
        self.attachments_to_slots += other.attachments_to_slots;
        self.base_conflicts_inherited += other.base_conflicts_inherited;
        self.clone_conflicts_inherited += other.clone_conflicts_inherited;
        self.conflicts_voided += other.conflicts_voided;
        self.manual_additions += other.manual_additions;
    }

    pub fn is_empty(&self) -> bool {
        *self == GrantCounters::default()
    }
}

/// Everything one pass's rules consume: configuration, host collaborators,
/// the indexes rebuilt for this pass, and the pass's iteration targets
/// (already restricted to pass 1's modified items when this is pass 2).
pub struct PassContext<'a> {
    pub pass: u8,
    pub roles: &'a dyn RoleProvider,
    pub locale: &'a LocaleText,
    pub config: &'a EngineConfig,
    pub clones: CloneIndex,
    pub calibers: CaliberIndex,
    pub proprietary: ProprietarySet,
    pub weapon_targets: Vec<ItemId>,
    pub slotted_targets: Vec<ItemId>,
    pub conflict_edges: Vec<(ItemId, ItemId)>,
}

impl PassContext<'_> {
    pub(crate) fn name_of(&self, id: &ItemId) -> &str {
        self.locale.display_name(id)
    }
}

/// Append caliber-matching Foreign rounds to open chambers, and to open
/// cartridge slots when the owner is also a magazine.
pub fn grant_caliber_rounds(
    catalog: &mut ItemCatalog,
    ctx: &PassContext<'_>,
    counters: &mut GrantCounters,
    modified: &mut BTreeSet<ItemId>,
) {
    for weapon_id in &ctx.weapon_targets {
        if ctx.config.blacklist.contains(weapon_id) {
            continue;
        }
        let Some(caliber) = catalog.get(weapon_id).and_then(|w| w.ammo_caliber.clone()) else {
            continue;
        };
        let rounds: Vec<ItemId> = ctx
            .calibers
            .rounds(&caliber)
            .iter()
            .filter(|round| origin_of(catalog, round) == ItemOrigin::Foreign)
            .filter(|round| !ctx.config.blacklist.contains(*round))
            .filter(|round| !ctx.proprietary.contains(round))
            .cloned()
            .collect();
        if rounds.is_empty() {
            continue;
        }

        let whitelisted = ctx.config.whitelist.contains(weapon_id);
        append_rounds(catalog, ctx, weapon_id, SlotKind::Chamber, &rounds, whitelisted, counters, modified);
        if ctx.roles.has_role(weapon_id, &ItemRole::Magazine) {
            append_rounds(catalog, ctx, weapon_id, SlotKind::Cartridge, &rounds, whitelisted, counters, modified);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn append_rounds(
    catalog: &mut ItemCatalog,
    ctx: &PassContext<'_>,
    owner: &ItemId,
    kind: SlotKind,
    rounds: &[ItemId],
    whitelisted: bool,
    counters: &mut GrantCounters,
    modified: &mut BTreeSet<ItemId>,
) {
    let mut planned: Vec<(usize, Vec<ItemId>)> = Vec::new();
    {
        let Some(item) = catalog.get(owner) else {
            return;
        };
        for (idx, slot) in item.slot_list(kind).iter().enumerate() {
            if is_proprietary_filter(catalog, &slot.filter) && !whitelisted {
                continue;
            }
            let mut additions = Vec::new();
            for round in rounds {
                if slot.filter.contains(round) {
                    if ctx.config.verbose_logging {
                        debug!(
                            "pass {}: skipped round {} ({}) for {} ({}) {}: already accepted",
                            ctx.pass,
                            round,
                            ctx.name_of(round),
                            owner,
                            ctx.name_of(owner),
                            kind.as_str()
                        );
                    }
                } else {
                    additions.push(round.clone());
                }
            }
            if !additions.is_empty() {
                planned.push((idx, additions));
            }
        }
    }
    if planned.is_empty() {
        return;
    }

    let Some(item) = catalog.get_mut(owner) else {
        return;
    };
    for (idx, additions) in planned {
        for round in additions {
            if ctx.config.verbose_logging {
                info!(
                    "pass {}: added round {} ({}) to {} ({}) {}",
                    ctx.pass,
                    round,
                    ctx.name_of(&round),
                    owner,
                    ctx.name_of(owner),
                    kind.as_str()
                );
            }
            match kind {
                SlotKind::Chamber => counters.ammo_to_chambers += 1,
                SlotKind::Cartridge => counters.ammo_to_cartridges += 1,
                SlotKind::General => {}
            }
            item.slot_list_mut(kind)[idx].filter.push(round);
        }
        modified.insert(owner.clone());
    }
}

/// Append Foreign clones of every accepted id to open slots.
///
/// This is the rule that makes a new attachment slot into anything the item
/// it imitates slots into.
pub fn grant_clone_attachments(
    catalog: &mut ItemCatalog,
    ctx: &PassContext<'_>,
    counters: &mut GrantCounters,
    modified: &mut BTreeSet<ItemId>,
) {
    for owner in &ctx.slotted_targets {
        if ctx.config.blacklist.contains(owner) {
            continue;
        }
        let whitelisted = ctx.config.whitelist.contains(owner);

        let mut planned: Vec<(SlotKind, usize, SlotName, Vec<ItemId>)> = Vec::new();
        {
            let Some(item) = catalog.get(owner) else {
                continue;
            };
            for (kind, slots) in item.slot_groups() {
                for (idx, slot) in slots.iter().enumerate() {
                    if is_proprietary_filter(catalog, &slot.filter) && !whitelisted {
                        continue;
                    }
                    let mut additions: Vec<ItemId> = Vec::new();
                    for accepted in &slot.filter {
                        for clone in ctx.clones.clones_of(accepted) {
                            if ctx.config.blacklist.contains(clone)
                                || ctx.proprietary.contains(clone)
                            {
                                continue;
                            }
                            if slot.filter.contains(clone) || additions.contains(clone) {
                                continue;
                            }
                            additions.push(clone.clone());
                        }
                    }
                    if additions.is_empty() {
                        if ctx.config.verbose_logging && !slot.filter.is_empty() {
                            debug!(
                                "pass {}: no new attachments for {} ({}) slot {}: every known clone already accepted",
                                ctx.pass,
                                owner,
                                ctx.name_of(owner),
                                slot.name.as_str()
                            );
                        }
                    } else {
                        planned.push((kind, idx, slot.name.clone(), additions));
                    }
                }
            }
        }
        if planned.is_empty() {
            continue;
        }

        let Some(item) = catalog.get_mut(owner) else {
            continue;
        };
        for (kind, idx, slot_name, additions) in planned {
            for attachment in additions {
                if ctx.config.verbose_logging {
                    info!(
                        "pass {}: added attachment {} ({}) to {} ({}) slot {}",
                        ctx.pass,
                        attachment,
                        ctx.name_of(&attachment),
                        owner,
                        ctx.name_of(owner),
                        slot_name.as_str()
                    );
                }
                counters.attachments_to_slots += 1;
                item.slot_list_mut(kind)[idx].filter.push(attachment);
            }
            modified.insert(owner.clone());
        }
    }
}

enum ConflictSource {
    Base,
    Clone,
}

impl ConflictSource {
    fn as_str(&self) -> &'static str {
        match self {
            ConflictSource::Base => "base",
            ConflictSource::Clone => "clone",
        }
    }
}

/// Copy conflict entries from each clone edge's base onto the Foreign item.
///
/// Base entries first, then Foreign clones of those entries, both into the
/// same list. Either half can be disabled independently.
pub fn inherit_conflicts(
    catalog: &mut ItemCatalog,
    ctx: &PassContext<'_>,
    counters: &mut GrantCounters,
    modified: &mut BTreeSet<ItemId>,
) {
    for (foreign_id, base_id) in &ctx.conflict_edges {
        if ctx.config.blacklist.contains(foreign_id) {
            continue;
        }
        let base_conflicts: Vec<ItemId> = catalog
            .get(base_id)
            .map(|base| base.conflicting_items.clone())
            .unwrap_or_default();

        if ctx.config.inherit_base_conflicts {
            for conflict in &base_conflicts {
                if ctx.config.void_conflicts.contains(conflict) {
                    if ctx.config.verbose_logging {
                        debug!(
                            "pass {}: skipped base conflict {} ({}) for {} ({}): void-listed",
                            ctx.pass,
                            conflict,
                            ctx.name_of(conflict),
                            foreign_id,
                            ctx.name_of(foreign_id)
                        );
                    }
                    counters.conflicts_voided += 1;
                    continue;
                }
                if ctx.config.blacklist.contains(conflict) {
                    if ctx.config.verbose_logging {
                        debug!(
                            "pass {}: skipped base conflict {} for {}: blacklisted",
                            ctx.pass, conflict, foreign_id
                        );
                    }
                    continue;
                }
                append_conflict(catalog, ctx, foreign_id, conflict, ConflictSource::Base, counters, modified);
            }
        } else if ctx.config.verbose_logging {
            debug!("pass {}: base conflict inheritance disabled", ctx.pass);
        }

        if ctx.config.inherit_clone_conflicts {
            for conflict in &base_conflicts {
                for clone in ctx.clones.clones_of(conflict) {
                    if ctx.config.blacklist.contains(clone) {
                        continue;
                    }
                    if ctx.config.void_conflicts.contains(clone) {
                        if ctx.config.verbose_logging {
                            debug!(
                                "pass {}: skipped clone conflict {} ({}) for {} ({}): void-listed",
                                ctx.pass,
                                clone,
                                ctx.name_of(clone),
                                foreign_id,
                                ctx.name_of(foreign_id)
                            );
                        }
                        counters.conflicts_voided += 1;
                        continue;
                    }
                    append_conflict(catalog, ctx, foreign_id, clone, ConflictSource::Clone, counters, modified);
                }
            }
        } else if ctx.config.verbose_logging {
            debug!("pass {}: clone conflict inheritance disabled", ctx.pass);
        }
    }
}

fn append_conflict(
    catalog: &mut ItemCatalog,
    ctx: &PassContext<'_>,
    owner: &ItemId,
    conflict: &ItemId,
    source: ConflictSource,
    counters: &mut GrantCounters,
    modified: &mut BTreeSet<ItemId>,
) {
    let Some(item) = catalog.get_mut(owner) else {
        return;
    };
    if item.conflicting_items.contains(conflict) {
        if ctx.config.verbose_logging {
            debug!(
                "pass {}: skipped {} conflict {} for {}: already present",
                ctx.pass,
                source.as_str(),
                conflict,
                owner
            );
        }
        return;
    }
    item.conflicting_items.push(conflict.clone());
    modified.insert(owner.clone());
    match source {
        ConflictSource::Base => counters.base_conflicts_inherited += 1,
        ConflictSource::Clone => counters.clone_conflicts_inherited += 1,
    }
    if ctx.config.verbose_logging {
        info!(
            "pass {}: added {} conflict {} ({}) to {} ({})",
            ctx.pass,
            source.as_str(),
            conflict,
            ctx.name_of(conflict),
            owner,
            ctx.name_of(owner)
        );
    }
}
