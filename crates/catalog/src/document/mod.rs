//! Per-type catalog document schemas.
//!
//! Every component type ships its catalog in a differently shaped JSON
//! document. Each shape gets its own statically typed schema and its own
//! normalization function; [`CatalogDocument`] is the tagged union over them.

mod caddy;
mod cpu;
mod nested;
mod ram;
mod storage;

pub use caddy::{CaddyDocument, CaddyModel};
pub use cpu::{CpuBrand, CpuModel, CpuSeries};
pub use nested::{BoardModel, NicModel, SeriesNode};
pub use ram::{RamDocument, RamModule};
pub use storage::{StorageDevice, StorageDocument};

use models::{Attributes, CatalogEntry, ComponentType};
use serde_json::Value;

use crate::identity::is_identifier_shaped;

/// A parsed catalog document, one variant per component type.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogDocument {
    /// Brands, each with nested series, each with nested models.
    Cpu(Vec<CpuBrand>),
    /// Object with a named `modules` list.
    Ram(RamDocument),
    /// Brand/series nodes with nested models.
    Motherboard(Vec<SeriesNode<BoardModel>>),
    /// Object with a named `devices` list.
    Storage(StorageDocument),
    /// Object keyed by form factor category.
    Caddy(CaddyDocument),
    /// Brand/series nodes with nested models.
    Nic(Vec<SeriesNode<NicModel>>),
}

impl CatalogDocument {
    pub fn parse(component: ComponentType, raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match component {
            ComponentType::Cpu => Self::Cpu(serde_json::from_str(raw)?),
            ComponentType::Ram => Self::Ram(serde_json::from_str(raw)?),
            ComponentType::Motherboard => Self::Motherboard(serde_json::from_str(raw)?),
            ComponentType::Storage => Self::Storage(serde_json::from_str(raw)?),
            ComponentType::Caddy => Self::Caddy(serde_json::from_str(raw)?),
            ComponentType::Nic => Self::Nic(serde_json::from_str(raw)?),
        })
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::Cpu(_) => ComponentType::Cpu,
            Self::Ram(_) => ComponentType::Ram,
            Self::Motherboard(_) => ComponentType::Motherboard,
            Self::Storage(_) => ComponentType::Storage,
            Self::Caddy(_) => ComponentType::Caddy,
            Self::Nic(_) => ComponentType::Nic,
        }
    }

    /// Flattens the document into catalog entries, in document order. Models
    /// without a brand or a model name are dropped.
    pub fn normalize(self) -> Vec<CatalogEntry> {
        match self {
            Self::Cpu(brands) => cpu::normalize(brands),
            Self::Ram(doc) => ram::normalize(doc),
            Self::Motherboard(nodes) => nested::normalize(ComponentType::Motherboard, nodes),
            Self::Storage(doc) => storage::normalize(doc),
            Self::Caddy(doc) => caddy::normalize(doc),
            Self::Nic(nodes) => nested::normalize(ComponentType::Nic, nodes),
        }
    }
}

/// Trimmed, non-empty text or nothing.
pub(crate) fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

pub(crate) fn push_attr(attrs: &mut Attributes, key: &str, value: Option<impl Into<Value>>) {
    if let Some(v) = value {
        let v = v.into();
        if !v.is_null() {
            attrs.insert(key.to_owned(), v);
        }
    }
}

/// Builds an entry when both brand and model are present.
pub(crate) fn entry(
    component: ComponentType,
    brand: Option<&str>,
    series: Option<&str>,
    model: Option<&str>,
    identifier: Option<&str>,
    attributes: Attributes,
) -> Option<CatalogEntry> {
    let brand = clean(brand)?;
    let model = clean(model)?;
    let series = clean(series).unwrap_or_default();

    let identifier = clean(identifier).filter(|id| {
        let shaped = is_identifier_shaped(id);
        if !shaped {
            tracing::warn!("ignoring malformed catalog identifier `{id}` of {brand} {model}");
        }
        shaped
    });

    let mut entry = CatalogEntry::new(component, brand, series, model).with_identifier(identifier);
    entry.attributes = attributes;
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_document_of_wrong_shape() {
        // a ram-style object is not a cpu brand list
        let raw = r#"{"modules": []}"#;
        assert!(CatalogDocument::parse(ComponentType::Cpu, raw).is_err());
        assert!(CatalogDocument::parse(ComponentType::Ram, raw).is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(CatalogDocument::parse(ComponentType::Nic, "[{").is_err());
    }

    #[test]
    fn entry_requires_brand_and_model() {
        let attrs = Attributes::new();
        assert!(entry(ComponentType::Cpu, None, Some("s"), Some("m"), None, attrs.clone()).is_none());
        assert!(entry(ComponentType::Cpu, Some(" "), Some("s"), Some("m"), None, attrs.clone()).is_none());
        assert!(entry(ComponentType::Cpu, Some("b"), None, Some(""), None, attrs.clone()).is_none());

        let e = entry(ComponentType::Cpu, Some(" b "), None, Some("m"), Some(""), attrs).unwrap();
        assert_eq!(e.brand, "b");
        assert_eq!(e.series, "");
        assert_eq!(e.identifier, None);
    }

    #[test]
    fn malformed_native_identifiers_are_dropped() {
        let with_id = |id: &str| {
            entry(ComponentType::Nic, Some("Intel"), Some("X710"), Some("DA2"), Some(id), Attributes::new())
                .unwrap()
                .identifier
        };

        assert_eq!(with_id("abc"), None);
        assert_eq!(with_id("1d6f2a0e0c3c4d1a8d440d7c9e2b9a10"), None);
        assert_eq!(
            with_id(" 1d6f2a0e-0c3c-4d1a-8d44-0d7c9e2b9a10 ").as_deref(),
            Some("1d6f2a0e-0c3c-4d1a-8d44-0d7c9e2b9a10")
        );
    }

    #[test]
    fn push_attr_skips_missing_and_null() {
        let mut attrs = Attributes::new();
        push_attr(&mut attrs, "a", None::<u32>);
        push_attr(&mut attrs, "b", Some(Value::Null));
        push_attr(&mut attrs, "c", Some(4u32));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["c"], 4);
    }
}
