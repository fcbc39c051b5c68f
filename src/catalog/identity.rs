use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Stable identifier for a catalog item (weapon, attachment, round, magazine).
///
/// Ids are opaque strings owned by the host catalog; the engine never parses
/// or synthesizes them, only compares and copies them between lists.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an attachment point on an item (e.g. `mod_sight`).
///
/// Chamber and cartridge slots carry names too; the manual-override rules
/// match attachments to targets by this name.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotName(pub String);

impl SlotName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Caliber key grouping interchangeable ammunition.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Caliber(pub String);

impl Caliber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether an item ships with the base application or arrived through
/// external content. Derived from the item's resource path, never stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ItemOrigin {
    Original,
    Foreign,
}

/// Polymorphic role tag queried through the host's classification service.
///
/// Known variants keep the engine's role checks allocation-free; `Other`
/// carries host-defined tags (the manual-override fallback matches a fixed
/// list of mod-type tags through it).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ItemRole {
    Weapon,
    Attachment,
    Ammunition,
    Magazine,
    Other(String),
}

impl Serialize for ItemRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl ItemRole {
    pub fn as_str(&self) -> &str {
        match self {
            ItemRole::Weapon => "weapon",
            ItemRole::Attachment => "attachment",
            ItemRole::Ammunition => "ammunition",
            ItemRole::Magazine => "magazine",
            ItemRole::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "weapon" => ItemRole::Weapon,
            "attachment" => ItemRole::Attachment,
            "ammunition" => ItemRole::Ammunition,
            "magazine" => ItemRole::Magazine,
            other => ItemRole::Other(other.to_string()),
        }
    }
}
