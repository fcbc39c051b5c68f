//! Engine configuration as read from the host's static config document.
//!
//! Field spellings follow the document the host ships (camelCase switches,
//! `VoidConflicts` and `ManualAdd` capitalized); every field defaults so a
//! partial document still parses. The configuration is a plain value handed
//! to [`crate::engine::run`] — there is no process-wide state.

use crate::catalog::identity::ItemId;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Gates the whole run; disabled means the engine does no work at all.
    pub enabled: bool,
    /// Per-event messages when on, per-pass summaries when off.
    pub verbose_logging: bool,
    pub second_pass: bool,
    pub inherit_base_conflicts: bool,
    pub inherit_clone_conflicts: bool,
    /// Ids excluded from all grants and edits, as owner or as granted id.
    pub blacklist: BTreeSet<ItemId>,
    /// Owners exempted from proprietary-slot protection.
    pub whitelist: BTreeSet<ItemId>,
    /// Ids that must never be inherited as conflicts.
    #[serde(rename = "VoidConflicts")]
    pub void_conflicts: BTreeSet<ItemId>,
    /// Ordered attachment/target pairs applied after the automatic rules.
    #[serde(rename = "ManualAdd")]
    pub manual_add: Vec<ManualAddEntry>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verbose_logging: false,
            second_pass: true,
            inherit_base_conflicts: true,
            inherit_clone_conflicts: true,
            blacklist: BTreeSet::new(),
            whitelist: BTreeSet::new(),
            void_conflicts: BTreeSet::new(),
            manual_add: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One configured attachment/target pair.
///
/// Missing ids parse as empty strings rather than failing the whole
/// document; the engine rejects such entries with a warning at run time.
pub struct ManualAddEntry {
    #[serde(default = "empty_id")]
    pub attachment_id: ItemId,
    #[serde(default = "empty_id")]
    pub target_item_id: ItemId,
}

fn empty_id() -> ItemId {
    ItemId(String::new())
}

/// Read and parse a configuration document from disk.
pub fn load_config_from_path(path: &Path) -> Result<EngineConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_enable_everything_but_verbosity() {
        let config = EngineConfig::default();
        assert!(config.enabled);
        assert!(!config.verbose_logging);
        assert!(config.second_pass);
        assert!(config.inherit_base_conflicts);
        assert!(config.inherit_clone_conflicts);
        assert!(config.blacklist.is_empty());
        assert!(config.manual_add.is_empty());
    }

    #[test]
    fn parses_host_document_spellings() {
        let config: EngineConfig = serde_json::from_value(json!({
            "enabled": true,
            "verboseLogging": true,
            "secondPass": false,
            "inheritBaseConflicts": false,
            "inheritCloneConflicts": true,
            "blacklist": ["item_a"],
            "whitelist": ["item_b"],
            "VoidConflicts": ["item_c"],
            "ManualAdd": [{"attachmentId": "item_d", "targetItemId": "item_e"}]
        }))
        .unwrap();

        assert!(config.verbose_logging);
        assert!(!config.second_pass);
        assert!(!config.inherit_base_conflicts);
        assert!(config.blacklist.contains(&ItemId("item_a".to_string())));
        assert!(config.void_conflicts.contains(&ItemId("item_c".to_string())));
        assert_eq!(config.manual_add.len(), 1);
        assert_eq!(config.manual_add[0].attachment_id.as_str(), "item_d");
        assert_eq!(config.manual_add[0].target_item_id.as_str(), "item_e");
    }

    #[test]
    fn partial_document_parses_with_defaults() {
        let config: EngineConfig = serde_json::from_value(json!({"enabled": false})).unwrap();
        assert!(!config.enabled);
        assert!(config.second_pass);
    }

    #[test]
    fn malformed_manual_entry_parses_as_empty_ids() {
        let config: EngineConfig = serde_json::from_value(json!({
            "ManualAdd": [{"targetItemId": "item_e"}]
        }))
        .unwrap();
        assert_eq!(config.manual_add[0].attachment_id.as_str(), "");
        assert_eq!(config.manual_add[0].target_item_id.as_str(), "item_e");
    }

    #[test]
    fn load_config_round_trips_through_disk() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{}", json!({"verboseLogging": true, "blacklist": ["x"]}))
            .expect("write fixture");

        let config = load_config_from_path(file.path()).expect("load config");
        assert!(config.verbose_logging);
        assert!(config.blacklist.contains(&ItemId("x".to_string())));
    }
}
