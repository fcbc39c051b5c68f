//! Display-name lookup used only for human-readable diagnostics.

use crate::catalog::identity::ItemId;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Placeholder for items the locale table does not cover.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Locale strings as shipped by the host, keyed `<item id> Name`.
///
/// Lookups never fail; an absent entry degrades to [`UNKNOWN_NAME`] so
/// diagnostics stay readable for items without reference text.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct LocaleText(BTreeMap<String, String>);

impl LocaleText {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    /// Register the display name for an item id.
    pub fn set_name(&mut self, id: &ItemId, name: &str) {
        self.0.insert(format!("{} Name", id.as_str()), name.to_string());
    }

    pub fn display_name(&self, id: &ItemId) -> &str {
        self.0
            .get(&format!("{} Name", id.as_str()))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_NAME)
    }
}
