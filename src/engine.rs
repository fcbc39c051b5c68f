//! Pass orchestration for the compatibility engine.
//!
//! `run` is the single entry point: it takes exclusive write access to the
//! caller's catalog for the duration of the call, runs at most two
//! propagation passes, and returns the summed counters. Pass 2 rebuilds
//! every derived index against the mutated catalog but only revisits items
//! pass 1 touched — a fixed-depth approximation of transitive closure, not a
//! fixpoint loop.

use crate::catalog::identity::{ItemId, ItemRole};
use crate::catalog::index::{CaliberIndex, CloneIndex};
use crate::catalog::model::ItemCatalog;
use crate::catalog::roles::RoleProvider;
use crate::config::EngineConfig;
use crate::locale::LocaleText;
use crate::manual::apply_manual_overrides;
use crate::propagate::{
    GrantCounters, PassContext, grant_caliber_rounds, grant_clone_attachments, inherit_conflicts,
};
use crate::proprietary::ProprietarySet;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;

/// What one pass did: its counters and every item id it mutated.
#[derive(Clone, Debug, Serialize)]
pub struct PassOutcome {
    pub pass: u8,
    pub counters: GrantCounters,
    pub modified: BTreeSet<ItemId>,
}

/// Result of a full run; empty when the engine is disabled.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    pub passes: Vec<PassOutcome>,
    pub totals: GrantCounters,
}

impl RunSummary {
    fn push(&mut self, outcome: PassOutcome) {
        self.totals.absorb(outcome.counters);
        self.passes.push(outcome);
    }

    /// Ids mutated across all passes.
    pub fn modified_items(&self) -> BTreeSet<ItemId> {
        self.passes
            .iter()
            .flat_map(|outcome| outcome.modified.iter().cloned())
            .collect()
    }
}

/// Run the engine against a caller-owned catalog.
///
/// Never fails: malformed inputs degrade to skipped operations with
/// classified diagnostics, and the returned summary is always complete.
/// With `enabled` off this is a no-op.
pub fn run(
    catalog: &mut ItemCatalog,
    roles: &dyn RoleProvider,
    locale: &LocaleText,
    config: &EngineConfig,
) -> RunSummary {
    let mut summary = RunSummary::default();
    if !config.enabled {
        debug!("compatibility engine disabled; catalog left untouched");
        return summary;
    }

    let first = run_pass(catalog, roles, locale, config, 1, None);
    let first_modified = first.modified.clone();
    summary.push(first);

    if config.second_pass && !first_modified.is_empty() {
        if config.verbose_logging {
            debug!("pass 2: revisiting {} modified items", first_modified.len());
        }
        summary.push(run_pass(catalog, roles, locale, config, 2, Some(&first_modified)));
    } else if config.verbose_logging {
        debug!(
            "pass 2 skipped: second_pass={}, modified items={}",
            config.second_pass,
            first_modified.len()
        );
    }

    if config.second_pass && !config.verbose_logging {
        log_summary("total summary", &summary.totals);
    }
    info!("item cross-compatibility applied");
    summary
}

fn run_pass(
    catalog: &mut ItemCatalog,
    roles: &dyn RoleProvider,
    locale: &LocaleText,
    config: &EngineConfig,
    pass: u8,
    restrict: Option<&BTreeSet<ItemId>>,
) -> PassOutcome {
    let mut weapons = Vec::new();
    let mut slotted = Vec::new();
    for id in catalog.keys() {
        let is_weapon = roles.has_role(id, &ItemRole::Weapon);
        if is_weapon {
            weapons.push(id.clone());
        }
        if is_weapon || roles.has_role(id, &ItemRole::Attachment) {
            slotted.push(id.clone());
        }
    }

    let clones = CloneIndex::build(catalog, roles);
    let calibers = CaliberIndex::build(catalog, roles);
    // The deny set always covers the full slotted population; the pass
    // restriction applies to iteration targets only.
    let proprietary = ProprietarySet::build(catalog, &slotted);
    if config.verbose_logging && !proprietary.is_empty() {
        let listed: Vec<&str> = proprietary.ids().map(ItemId::as_str).collect();
        debug!("pass {pass}: proprietary attachments: {}", listed.join(", "));
    }

    let keep = |ids: &[ItemId]| -> Vec<ItemId> {
        match restrict {
            Some(touched) => ids.iter().filter(|id| touched.contains(*id)).cloned().collect(),
            None => ids.to_vec(),
        }
    };
    let weapon_targets = keep(&weapons);
    let slotted_targets = keep(&slotted);
    let conflict_edges: Vec<(ItemId, ItemId)> = clones
        .edges()
        .filter(|(foreign, _)| restrict.is_none_or(|touched| touched.contains(*foreign)))
        .map(|(foreign, base)| (foreign.clone(), base.clone()))
        .collect();

    let ctx = PassContext {
        pass,
        roles,
        locale,
        config,
        clones,
        calibers,
        proprietary,
        weapon_targets,
        slotted_targets,
        conflict_edges,
    };

    let mut counters = GrantCounters::default();
    let mut modified = BTreeSet::new();
    grant_caliber_rounds(catalog, &ctx, &mut counters, &mut modified);
    grant_clone_attachments(catalog, &ctx, &mut counters, &mut modified);
    inherit_conflicts(catalog, &ctx, &mut counters, &mut modified);
    apply_manual_overrides(catalog, &ctx, &mut counters, &mut modified);

    if !config.verbose_logging {
        log_summary(&format!("pass {pass} summary"), &counters);
    } else if counters.is_empty() {
        debug!("pass {pass}: no new compatibilities, conflicts, or manual additions");
    }

    PassOutcome { pass, counters, modified }
}

fn log_summary(heading: &str, counters: &GrantCounters) {
    info!("{heading}:");
    info!("- added {} rounds to chambers", counters.ammo_to_chambers);
    info!("- added {} rounds to cartridges", counters.ammo_to_cartridges);
    info!("- added {} attachments to slots", counters.attachments_to_slots);
    info!("- inherited {} base conflicts", counters.base_conflicts_inherited);
    info!("- inherited {} clone conflicts", counters.clone_conflicts_inherited);
    info!("- voided {} conflicts", counters.conflicts_voided);
    info!("- applied {} manual additions", counters.manual_additions);
}
