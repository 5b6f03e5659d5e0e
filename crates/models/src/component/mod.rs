mod status;

pub use status::{ComponentStatus, TransitionPolicy};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The six kinds of hardware tracked by the inventory. Every catalog document,
/// inventory table and API selector is keyed by one of these.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumString,
    EnumIter,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComponentType {
    Cpu,
    Ram,
    Motherboard,
    Storage,
    Caddy,
    Nic,
}

impl ComponentType {
    /// Name of the table holding inventory records of this type.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu_inventory",
            Self::Ram => "ram_inventory",
            Self::Motherboard => "motherboard_inventory",
            Self::Storage => "storage_inventory",
            Self::Caddy => "caddy_inventory",
            Self::Nic => "nic_inventory",
        }
    }

    /// File name of the catalog document for this type, relative to the
    /// configured catalog directory.
    pub fn catalog_file_name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu.json",
            Self::Ram => "ram.json",
            Self::Motherboard => "motherboard.json",
            Self::Storage => "storage.json",
            Self::Caddy => "caddy.json",
            Self::Nic => "nic.json",
        }
    }

    /// Only NICs carry MAC/IP/network columns.
    pub fn has_network_fields(self) -> bool {
        matches!(self, Self::Nic)
    }

    /// Types that may be entered by hand without a catalog entry.
    pub fn supports_custom_specification(self) -> bool {
        matches!(self, Self::Ram | Self::Storage | Self::Caddy)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Ram => "RAM",
            Self::Motherboard => "Motherboard",
            Self::Storage => "Storage",
            Self::Caddy => "Caddy",
            Self::Nic => "NIC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_every_selector() {
        for ty in ComponentType::iter() {
            assert_eq!(ComponentType::from_str(&ty.to_string()).ok(), Some(ty));
        }
        assert_eq!(ComponentType::iter().count(), 6);
    }

    #[test]
    fn rejects_unknown_selector() {
        assert!(ComponentType::from_str("gpu").is_err());
        assert!(ComponentType::from_str("").is_err());
        assert!(ComponentType::from_str("CPU ").is_err());
    }

    #[test]
    fn table_names_are_distinct() {
        let mut names: Vec<_> = ComponentType::iter().map(|t| t.table_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn serde_uses_lowercase_selectors() {
        let json = serde_json::to_string(&ComponentType::Motherboard).unwrap();
        assert_eq!(json, "\"motherboard\"");
        let parsed: ComponentType = serde_json::from_str("\"nic\"").unwrap();
        assert_eq!(parsed, ComponentType::Nic);
    }
}
